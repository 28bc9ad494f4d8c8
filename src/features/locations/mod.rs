//! Crowdsourced rubbish locations.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/locations` | `add:location` | Report a location |
//! | GET | `/api/locations/{id}` | No | Fetch one location |
//! | POST | `/api/locations/search` | No | Locations inside a viewport, minus known ids |

pub mod dtos;
pub mod geometry;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::LocationService;
pub use stores::{InMemoryLocationStore, LocationStore, PgLocationStore};
