use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    /// RBAC permissions the identity provider attaches to access tokens
    #[serde(default)]
    permissions: Vec<String>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        Ok(AuthenticatedUser {
            sub: claims.sub,
            permissions: claims.permissions,
        })
    }
}
