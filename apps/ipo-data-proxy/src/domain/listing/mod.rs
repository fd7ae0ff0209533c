//! IPO Listing Types
//!
//! Domain types for IPO calendar entries and the filter/sort query applied
//! to them. Filtering is a pure function of the listings and the query.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Lifecycle status of an IPO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoStatus {
    /// Scheduled, not yet priced.
    Expected,
    /// Offer price set.
    Priced,
    /// Registration filed.
    Filed,
    /// Offering pulled.
    Withdrawn,
    /// Upstream sent a status we don't recognise.
    Unknown,
}

impl IpoStatus {
    /// Parse an upstream status string. Unrecognised values map to `Unknown`.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "expected" => Self::Expected,
            "priced" => Self::Priced,
            "filed" => Self::Filed,
            "withdrawn" => Self::Withdrawn,
            _ => Self::Unknown,
        }
    }

    /// Status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expected => "expected",
            Self::Priced => "priced",
            Self::Filed => "filed",
            Self::Withdrawn => "withdrawn",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IpoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offer price range. A single quoted price has `low == high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound.
    pub low: Decimal,
    /// Upper bound.
    pub high: Decimal,
}

impl PriceRange {
    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(&self) -> Decimal {
        (self.low + self.high) / Decimal::from(2)
    }
}

impl FromStr for PriceRange {
    type Err = rust_decimal::Error;

    /// Parses `"14.00"` or `"14.00-16.00"`; bounds are reordered if reversed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = match s.split_once('-') {
            Some((low, high)) => (low.trim().parse()?, high.trim().parse()?),
            None => {
                let price: Decimal = s.trim().parse()?;
                (price, price)
            }
        };
        Ok(if low <= high {
            Self { low, high }
        } else {
            Self {
                low: high,
                high: low,
            }
        })
    }
}

/// A single IPO calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoListing {
    /// Ticker symbol (may be empty before one is assigned).
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Listing exchange.
    pub exchange: String,
    /// Expected or actual listing date.
    pub date: NaiveDate,
    /// Lifecycle status.
    pub status: IpoStatus,
    /// Offer price range, when announced.
    pub price_range: Option<PriceRange>,
    /// Shares offered, when announced.
    pub shares_offered: Option<u64>,
    /// Total deal value, when announced.
    pub total_value: Option<Decimal>,
}

// =============================================================================
// Query
// =============================================================================

/// Field to sort listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Listing date.
    #[default]
    Date,
    /// Company name.
    Name,
    /// Total deal value.
    Value,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Filter and sort configuration for a listing view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against name and symbol.
    pub search: Option<String>,
    /// Exact status match.
    pub status: Option<IpoStatus>,
    /// Case-insensitive substring matched against the exchange.
    pub exchange: Option<String>,
    /// Sort field.
    pub sort: SortKey,
    /// Sort direction.
    pub order: SortOrder,
}

impl ListingQuery {
    /// Whether a listing passes the filters of this query.
    #[must_use]
    pub fn matches(&self, listing: &IpoListing) -> bool {
        if let Some(status) = self.status
            && listing.status != status
        {
            return false;
        }

        if let Some(exchange) = non_blank(self.exchange.as_deref())
            && !contains_ignore_case(&listing.exchange, exchange)
        {
            return false;
        }

        non_blank(self.search.as_deref()).is_none_or(|needle| {
            contains_ignore_case(&listing.name, needle)
                || contains_ignore_case(&listing.symbol, needle)
        })
    }

    /// Filter and sort `listings` into a new vector.
    #[must_use]
    pub fn apply(&self, listings: &[IpoListing]) -> Vec<IpoListing> {
        let mut out: Vec<IpoListing> = listings
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    fn compare(&self, a: &IpoListing, b: &IpoListing) -> Ordering {
        let primary = match self.sort {
            SortKey::Date => self.directed(a.date.cmp(&b.date)),
            SortKey::Name => self.directed(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            // Listings without a value go last regardless of direction
            SortKey::Value => match (a.total_value, b.total_value) {
                (Some(x), Some(y)) => self.directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        primary.then_with(|| a.symbol.cmp(&b.symbol))
    }

    const fn directed(&self, ordering: Ordering) -> Ordering {
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(symbol: &str, name: &str, date: &str, value: Option<i64>) -> IpoListing {
        IpoListing {
            symbol: symbol.to_string(),
            name: name.to_string(),
            exchange: "NASDAQ Global".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            status: IpoStatus::Expected,
            price_range: None,
            shares_offered: None,
            total_value: value.map(Decimal::from),
        }
    }

    fn sample() -> Vec<IpoListing> {
        let mut withdrawn = listing("BIRK", "Birkenstock Holding", "2023-10-11", Some(1_480_000_000));
        withdrawn.status = IpoStatus::Withdrawn;
        withdrawn.exchange = "NYSE".to_string();
        vec![
            listing("RDDT", "Reddit Inc", "2024-03-21", Some(748_000_000)),
            listing("ARM", "Arm Holdings", "2023-09-14", Some(4_870_000_000)),
            withdrawn,
            listing("", "Unnamed Biotech", "2024-05-01", None),
        ]
    }

    #[test]
    fn status_parsing() {
        assert_eq!(IpoStatus::from_str_case_insensitive("priced"), IpoStatus::Priced);
        assert_eq!(IpoStatus::from_str_case_insensitive("EXPECTED"), IpoStatus::Expected);
        assert_eq!(IpoStatus::from_str_case_insensitive("postponed"), IpoStatus::Unknown);
    }

    #[test]
    fn price_range_parsing() {
        let range: PriceRange = "31.00-34.00".parse().unwrap();
        assert_eq!(range.low, Decimal::new(3100, 2));
        assert_eq!(range.high, Decimal::new(3400, 2));
        assert_eq!(range.midpoint(), Decimal::new(3250, 2));

        let single: PriceRange = "51".parse().unwrap();
        assert_eq!(single.low, single.high);

        let reversed: PriceRange = "20-18".parse().unwrap();
        assert_eq!(reversed.low, Decimal::from(18));

        assert!("TBD".parse::<PriceRange>().is_err());
    }

    #[test]
    fn default_query_sorts_by_date_ascending() {
        let out = ListingQuery::default().apply(&sample());
        let symbols: Vec<&str> = out.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ARM", "BIRK", "RDDT", ""]);
    }

    #[test]
    fn search_matches_name_or_symbol() {
        let query = ListingQuery {
            search: Some("rddt".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(query.apply(&sample()).len(), 1);

        let query = ListingQuery {
            search: Some("holding".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(query.apply(&sample()).len(), 2);
    }

    #[test]
    fn blank_search_matches_everything() {
        let query = ListingQuery {
            search: Some("   ".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(query.apply(&sample()).len(), 4);
    }

    #[test]
    fn status_and_exchange_filters() {
        let query = ListingQuery {
            status: Some(IpoStatus::Withdrawn),
            ..ListingQuery::default()
        };
        let out = query.apply(&sample());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "BIRK");

        let query = ListingQuery {
            exchange: Some("nasdaq".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(query.apply(&sample()).len(), 3);
    }

    #[test]
    fn value_sort_puts_missing_last() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let query = ListingQuery {
                sort: SortKey::Value,
                order,
                ..ListingQuery::default()
            };
            let out = query.apply(&sample());
            assert_eq!(out.last().unwrap().name, "Unnamed Biotech");
        }
    }

    #[test]
    fn value_sort_descending() {
        let query = ListingQuery {
            sort: SortKey::Value,
            order: SortOrder::Desc,
            ..ListingQuery::default()
        };
        let out = query.apply(&sample());
        assert_eq!(out[0].symbol, "ARM");
        assert_eq!(out[1].symbol, "BIRK");
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut listings = sample();
        listings.push(listing("ZZZ", "anchor Corp", "2024-01-01", None));
        let query = ListingQuery {
            sort: SortKey::Name,
            ..ListingQuery::default()
        };
        let out = query.apply(&listings);
        assert_eq!(out[0].name, "anchor Corp");
        assert_eq!(out[1].name, "Arm Holdings");
    }
}
