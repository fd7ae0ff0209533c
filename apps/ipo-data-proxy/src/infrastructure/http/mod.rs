//! Public HTTP API (Driver Adapter)
//!
//! Axum router delegating to the application services.

pub mod error;
mod request_id;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use routes::{
    AddWatchlistRequest, AppState, FavoriteResponse, IpoListResponse, ProxyQuery,
    WatchlistResponse, create_router,
};
