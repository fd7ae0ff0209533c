//! HTTP Routes
//!
//! Axum router for the public API.
//!
//! # Endpoints
//!
//! - `GET /api/market-data-proxy?endpoint=..&symbol=..` - cached upstream passthrough
//! - `GET /api/ipos` - filtered IPO calendar
//! - `GET /api/watchlist` - list watchlist
//! - `POST /api/watchlist` - add an entry
//! - `DELETE /api/watchlist/{id}` - remove an entry
//! - `POST /api/watchlist/{id}/favorite` - toggle favorite

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::request_id::request_id_middleware;
use crate::application::services::{IpoCalendarService, MarketDataService, ProxyRequest};
use crate::domain::listing::{IpoListing, ListingQuery};
use crate::domain::watchlist::{WatchlistItem, WatchlistStore};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Caching proxy.
    pub market_data: Arc<MarketDataService>,
    /// IPO calendar view over the proxy.
    pub calendar: IpoCalendarService,
    /// Process-wide watchlist.
    pub watchlist: Arc<WatchlistStore>,
}

impl AppState {
    /// Build state around a proxy service with an empty watchlist.
    #[must_use]
    pub fn new(market_data: Arc<MarketDataService>) -> Self {
        Self {
            calendar: IpoCalendarService::new(Arc::clone(&market_data)),
            market_data,
            watchlist: Arc::new(WatchlistStore::new()),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/market-data-proxy", get(market_data_proxy))
        .route("/api/ipos", get(list_ipos))
        .route("/api/watchlist", get(list_watchlist).post(add_to_watchlist))
        .route("/api/watchlist/{id}", delete(remove_from_watchlist))
        .route("/api/watchlist/{id}/favorite", post(toggle_favorite))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

// =============================================================================
// Market Data Proxy
// =============================================================================

/// Query parameters for the proxy endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    /// Upstream path suffix.
    pub endpoint: Option<String>,
    /// Optional ticker symbol.
    pub symbol: Option<String>,
}

async fn market_data_proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let payload = state
        .market_data
        .fetch(ProxyRequest {
            endpoint: query.endpoint,
            symbol: query.symbol,
        })
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload.get().to_string(),
    )
        .into_response())
}

// =============================================================================
// IPO Calendar
// =============================================================================

/// Filtered IPO calendar response.
#[derive(Debug, Serialize, Deserialize)]
pub struct IpoListResponse {
    /// Matching listings.
    pub ipos: Vec<IpoListing>,
    /// Number of matching listings.
    pub total: usize,
}

async fn list_ipos(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<IpoListResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let ipos = state.calendar.listings(&query).await?;
    Ok(Json(IpoListResponse {
        total: ipos.len(),
        ipos,
    }))
}

// =============================================================================
// Watchlist
// =============================================================================

/// Watchlist contents.
#[derive(Debug, Serialize, Deserialize)]
pub struct WatchlistResponse {
    /// Entries in insertion order.
    pub items: Vec<WatchlistItem>,
}

/// Request to add a watchlist entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddWatchlistRequest {
    /// Identifier, usually the ticker.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Favorite toggle result.
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteResponse {
    /// Identifier.
    pub id: String,
    /// New favorite flag.
    pub favorite: bool,
}

async fn list_watchlist(State(state): State<AppState>) -> Json<WatchlistResponse> {
    Json(WatchlistResponse {
        items: state.watchlist.items(),
    })
}

async fn add_to_watchlist(
    State(state): State<AppState>,
    body: Result<Json<AddWatchlistRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WatchlistItem>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = request.id.trim();
    if id.is_empty() {
        return Err(ApiError::bad_request("Watchlist id is required"));
    }

    let added = state.watchlist.add(id, request.name);
    let item = state
        .watchlist
        .get(id)
        .ok_or_else(|| ApiError::not_found(format!("{id} is not on the watchlist")))?;

    if added {
        tracing::info!(id = %item.id, "Added to watchlist");
        Ok((StatusCode::CREATED, Json(item)))
    } else {
        Ok((StatusCode::OK, Json(item)))
    }
}

async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.watchlist.remove(&id) {
        tracing::info!(id = %id, "Removed from watchlist");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("{id} is not on the watchlist")))
    }
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let favorite = state
        .watchlist
        .toggle_favorite(&id)
        .ok_or_else(|| ApiError::not_found(format!("{id} is not on the watchlist")))?;
    Ok(Json(FavoriteResponse { id, favorite }))
}
