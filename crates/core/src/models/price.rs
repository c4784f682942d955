use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped price observation for a card.
///
/// Ticks are append-only and stored in arrival order, which is not
/// necessarily timestamp order — every consumer deriving "latest",
/// "oldest", "min" or "max" must sort first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub id: u32,
    pub card_id: u32,
    pub price: f64,
    pub timestamp: DateTime<Utc>,

    /// Where the observation came from (e.g., "tcgplayer", "price update").
    pub source: Option<String>,

    /// Absolute delta vs. the previous tick, if known at insert time.
    /// Appending a tick never recomputes the deltas of sibling ticks.
    pub market_change: Option<f64>,

    /// Relative delta vs. the previous tick, in percent.
    pub percent_change: Option<f64>,
}

impl PriceTick {
    /// Absolute change, reading a missing delta as 0.
    pub fn market_change_or_zero(&self) -> f64 {
        self.market_change.unwrap_or(0.0)
    }

    /// Percent change, reading a missing delta as 0.
    pub fn percent_change_or_zero(&self) -> f64 {
        self.percent_change.unwrap_or(0.0)
    }
}

/// Payload for appending a tick; the store assigns the id and defaults a
/// missing timestamp to "now".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPriceTick {
    pub card_id: u32,
    pub price: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub market_change: Option<f64>,
    #[serde(default)]
    pub percent_change: Option<f64>,
}
