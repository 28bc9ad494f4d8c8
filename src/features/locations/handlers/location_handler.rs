use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::CanAddLocation;
use crate::features::locations::dtos::{
    CreateLocationDto, CreatedLocationDto, LocationResponseDto, SearchLocationsQuery,
};
use crate::features::locations::services::LocationService;
use crate::shared::types::ApiResponse;

/// Report a new rubbish location
///
/// Requires the `add:location` permission.
#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocationDto,
    responses(
        (status = 200, description = "Location created", body = ApiResponse<CreatedLocationDto>),
        (status = 400, description = "Invalid body or geometry"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing add:location permission"),
        (status = 500, description = "Storage error")
    ),
    security(("bearer_auth" = [])),
    tag = "locations"
)]
pub async fn create_location(
    CanAddLocation(user): CanAddLocation,
    State(service): State<Arc<LocationService>>,
    AppJson(dto): AppJson<CreateLocationDto>,
) -> Result<Json<ApiResponse<CreatedLocationDto>>> {
    tracing::debug!("Location submitted by {}", user.sub);
    let id = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(CreatedLocationDto { id }), None)))
}

/// Get a rubbish location by id
///
/// Responds with an empty 404 when the id is unknown.
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(
        ("id" = String, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location found", body = ApiResponse<LocationResponseDto>),
        (status = 404, description = "Location not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(service): State<Arc<LocationService>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let response = match service.get_by_id(&id).await? {
        Some(location) => Json(ApiResponse::success(
            Some(LocationResponseDto::from(location)),
            None,
        ))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };
    Ok(response)
}

/// Search locations inside a map viewport
///
/// Returns every stored location within `bounds` whose id is not listed in
/// `notIn`. A malformed `notIn` is treated as an empty list.
#[utoipa::path(
    post,
    path = "/api/locations/search",
    params(SearchLocationsQuery),
    responses(
        (status = 200, description = "Locations in the viewport", body = ApiResponse<Vec<LocationResponseDto>>),
        (status = 400, description = "Missing or invalid bounds"),
        (status = 500, description = "Storage error")
    ),
    tag = "locations"
)]
pub async fn search_locations(
    State(service): State<Arc<LocationService>>,
    Query(query): Query<SearchLocationsQuery>,
) -> Result<Json<ApiResponse<Vec<LocationResponseDto>>>> {
    let locations = service
        .search(query.bounds.as_deref(), query.not_in.as_deref())
        .await?;
    let dtos: Vec<LocationResponseDto> = locations.into_iter().map(|l| l.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::locations::routes;
    use crate::features::locations::stores::InMemoryLocationStore;
    use crate::shared::test_helpers::{
        create_reporter_user, create_viewer_user, point_feature, with_user,
    };
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    const SYDNEY_BOUNDS: &str = r#"{"north":-33,"south":-35,"east":152,"west":150}"#;

    fn service() -> Arc<LocationService> {
        Arc::new(LocationService::new(
            Arc::new(InMemoryLocationStore::new()),
            Duration::from_secs(2),
        ))
    }

    fn server_for(service: Arc<LocationService>, user: Option<AuthenticatedUser>) -> TestServer {
        let protected = routes::protected_routes(Arc::clone(&service));
        let protected = match user {
            Some(user) => with_user(protected, user),
            None => protected,
        };
        let app = Router::new()
            .merge(protected)
            .merge(routes::public_routes(service));
        TestServer::new(app).unwrap()
    }

    async fn create(server: &TestServer, geojson: Value) -> String {
        let response = server
            .post("/api/locations")
            .json(&json!({ "geojson": geojson }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let server = server_for(service(), Some(create_reporter_user()));

        let response = server
            .post("/api/locations")
            .json(&json!({
                "geojson": point_feature(151.0, -34.0),
                "log": [{ "description": "Shopping trolley in the creek" }]
            }))
            .await;
        response.assert_status_ok();
        let id = response.json::<Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let fetched = server.get(&format!("/api/locations/{}", id)).await;
        fetched.assert_status_ok();
        let body = fetched.json::<Value>();
        assert_eq!(body["data"]["id"], json!(id));
        assert_eq!(body["data"]["geojson"], point_feature(151.0, -34.0));
        assert_eq!(
            body["data"]["log"],
            json!([{ "description": "Shopping trolley in the creek" }])
        );
    }

    #[tokio::test]
    async fn test_create_defaults_log() {
        let server = server_for(service(), Some(create_reporter_user()));
        let id = create(&server, point_feature(151.0, -34.0)).await;

        let body = server
            .get(&format!("/api/locations/{}", id))
            .await
            .json::<Value>();
        assert_eq!(body["data"]["log"], json!([]));
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let server = server_for(service(), None);
        let response = server
            .post("/api/locations")
            .json(&json!({ "geojson": point_feature(151.0, -34.0) }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_requires_permission() {
        let server = server_for(service(), Some(create_viewer_user()));
        let response = server
            .post("/api/locations")
            .json(&json!({ "geojson": point_feature(151.0, -34.0) }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_geojson() {
        let server = server_for(service(), Some(create_reporter_user()));
        let response = server
            .post("/api/locations")
            .json(&json!({ "log": [] }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_id_is_bare_404() {
        let server = server_for(service(), None);
        let response = server.get("/api/locations/does-not-exist").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().is_empty());
    }

    #[tokio::test]
    async fn test_search_scenario() {
        let server = server_for(service(), Some(create_reporter_user()));
        let id = create(&server, point_feature(151.0, -34.0)).await;
        create(&server, point_feature(-0.12, 51.5)).await;

        let response = server
            .post("/api/locations/search")
            .add_query_param("bounds", SYDNEY_BOUNDS)
            .add_query_param("notIn", "[]")
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], json!(id));

        let response = server
            .post("/api/locations/search")
            .add_query_param("bounds", SYDNEY_BOUNDS)
            .add_query_param("notIn", format!("[\"{}\"]", id))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }

    #[tokio::test]
    async fn test_search_with_malformed_not_in() {
        let server = server_for(service(), Some(create_reporter_user()));
        create(&server, point_feature(151.0, -34.0)).await;

        let response = server
            .post("/api/locations/search")
            .add_query_param("bounds", SYDNEY_BOUNDS)
            .add_query_param("notIn", "[oops")
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_without_bounds_is_400() {
        let server = server_for(service(), None);

        let response = server.post("/api/locations/search").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/locations/search")
            .add_query_param("bounds", "not json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty_data() {
        let server = server_for(service(), None);
        let response = server
            .post("/api/locations/search")
            .add_query_param("bounds", SYDNEY_BOUNDS)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }
}
