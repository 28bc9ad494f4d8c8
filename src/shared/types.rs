use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON envelope shared by every endpoint. Payloads always sit under `data`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_keeps_data_key() {
        let body = serde_json::to_value(ApiResponse::success(Some(Vec::<u8>::new()), None))
            .unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": [] }));
    }

    #[test]
    fn test_error_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error(
            Some("Invalid bounds".to_string()),
            None,
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Invalid bounds" })
        );
    }
}
