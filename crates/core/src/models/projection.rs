use serde::{Deserialize, Serialize};

use super::card::Card;
use super::category::CardCategory;
use super::price::PriceTick;

/// Read-optimized view of a card: the card itself plus its latest price
/// and resolved category. Assembled at query time, never stored.
///
/// A card with no ticks projects with price/change fields of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWithPrice {
    #[serde(flatten)]
    pub card: Card,
    pub current_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub category: CardCategory,
}

/// Full detail view: `CardWithPrice` plus the (time-windowed) price
/// history and min/max/average statistics over that window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWithDetails {
    #[serde(flatten)]
    pub summary: CardWithPrice,
    pub price_history: Vec<PriceTick>,
    pub highest_price: PriceTick,
    pub lowest_price: PriceTick,
    pub average_price: f64,
}

/// One row of a market ranking (gainers, fallers, most viewed).
/// `view_count` is only populated by the most-viewed ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub card_id: u32,
    pub name: String,
    pub category_id: u32,
    pub category_name: String,
    pub current_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u32>,
}
