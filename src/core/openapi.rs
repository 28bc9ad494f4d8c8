use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::locations::{
    dtos as locations_dtos, handlers as locations_handlers, models as locations_models,
};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Locations
        locations_handlers::create_location,
        locations_handlers::get_location,
        locations_handlers::search_locations,
    ),
    components(
        schemas(
            // Locations
            locations_models::LogEntry,
            locations_models::Bounds,
            locations_dtos::CreateLocationDto,
            locations_dtos::CreatedLocationDto,
            locations_dtos::LocationResponseDto,
            ApiResponse<locations_dtos::CreatedLocationDto>,
            ApiResponse<locations_dtos::LocationResponseDto>,
            ApiResponse<Vec<locations_dtos::LocationResponseDto>>,
        )
    ),
    tags(
        (name = "locations", description = "Crowdsourced rubbish locations and viewport search"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Rubbish Map API",
        version = "0.1.0",
        description = "API documentation for Rubbish Map",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
