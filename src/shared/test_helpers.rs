#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::PERMISSION_ADD_LOCATION;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_reporter_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "auth0|reporter".to_string(),
        permissions: vec![PERMISSION_ADD_LOCATION.to_string()],
    }
}

#[cfg(test)]
pub fn create_viewer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "auth0|viewer".to_string(),
        permissions: vec![],
    }
}

/// Stand in for the JWT middleware by injecting a fixed user
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

/// A small polygon around (151.0, -34.0), Sydney
#[cfg(test)]
pub fn sydney_feature() -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [150.9, -34.1], [150.9, -33.9], [151.1, -33.9], [151.1, -34.1], [150.9, -34.1]
            ]]
        }
    })
}

#[cfg(test)]
pub fn point_feature(lon: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {},
        "geometry": { "type": "Point", "coordinates": [lon, lat] }
    })
}
