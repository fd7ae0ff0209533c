//! Application Services
//!
//! - `MarketDataService`: credential check, cache lookup and upstream fetch
//! - `IpoCalendarService`: filtered IPO calendar built on the proxy

mod ipo_calendar;
mod market_data;

pub use ipo_calendar::{IPO_CALENDAR_ENDPOINT, IpoCalendarService, decode_calendar};
pub use market_data::{MarketDataService, ProxyError, ProxyRequest};
