//! IPO Calendar Service
//!
//! Reads the upstream IPO calendar through [`MarketDataService`], so it
//! shares the cache entry and error handling with the raw proxy endpoint,
//! then decodes it into [`IpoListing`]s and applies a [`ListingQuery`].

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Deserialize;

use super::market_data::{MarketDataService, ProxyError, ProxyRequest};
use crate::domain::listing::{IpoListing, IpoStatus, ListingQuery, PriceRange};

/// Upstream endpoint for the IPO calendar.
pub const IPO_CALENDAR_ENDPOINT: &str = "/calendar/ipo";

#[derive(Debug, Deserialize)]
struct CalendarPayload {
    #[serde(rename = "ipoCalendar", default)]
    ipo_calendar: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarRow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    number_of_shares: Option<f64>,
    #[serde(default)]
    price: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    total_shares_value: Option<f64>,
}

impl CalendarRow {
    fn into_listing(self) -> Option<IpoListing> {
        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;

        let price_range = match self.price {
            Some(serde_json::Value::String(s)) => s.parse::<PriceRange>().ok(),
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .and_then(Decimal::from_f64)
                .map(|p| PriceRange { low: p, high: p }),
            _ => None,
        };

        Some(IpoListing {
            symbol: self.symbol.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            exchange: self.exchange.unwrap_or_default(),
            date,
            status: self
                .status
                .as_deref()
                .map_or(IpoStatus::Unknown, IpoStatus::from_str_case_insensitive),
            price_range,
            shares_offered: self
                .number_of_shares
                .and_then(Decimal::from_f64)
                .and_then(|d| d.trunc().to_u64()),
            total_value: self.total_shares_value.and_then(Decimal::from_f64),
        })
    }
}

/// Filtered view over the upstream IPO calendar.
#[derive(Debug, Clone)]
pub struct IpoCalendarService {
    market_data: Arc<MarketDataService>,
}

impl IpoCalendarService {
    /// Create a calendar service on top of the proxy.
    #[must_use]
    pub const fn new(market_data: Arc<MarketDataService>) -> Self {
        Self { market_data }
    }

    /// Fetch the calendar and apply `query`.
    pub async fn listings(&self, query: &ListingQuery) -> Result<Vec<IpoListing>, ProxyError> {
        let listings = self
            .market_data
            .fetch_map(ProxyRequest::new(IPO_CALENDAR_ENDPOINT, None), |payload| {
                decode_calendar(payload.get())
            })
            .await?;
        Ok(query.apply(&listings))
    }
}

/// Decode an upstream calendar payload.
///
/// A missing or null `ipoCalendar` is an empty calendar. Rows that fail to
/// decode or lack a usable date are skipped.
pub fn decode_calendar(json: &str) -> Result<Vec<IpoListing>, ProxyError> {
    let payload: CalendarPayload = serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, "IPO calendar payload has unexpected shape");
        ProxyError::Unexpected(e.to_string())
    })?;

    let rows = payload.ipo_calendar.unwrap_or_default();
    let total = rows.len();
    let listings: Vec<IpoListing> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<CalendarRow>(row) {
            Ok(row) => row.into_listing(),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed IPO calendar row");
                None
            }
        })
        .collect();

    if listings.len() < total {
        tracing::debug!(
            skipped = total - listings.len(),
            "Skipped unusable IPO calendar rows"
        );
    }

    Ok(listings)
}
