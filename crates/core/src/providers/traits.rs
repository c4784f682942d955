use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::card::{CardAttributes, NewCard};

/// One fetched upstream record, normalized to the store's card shape.
///
/// `price` is the best available upstream price after the source-specific
/// fallback chain; `None` means the source had no usable price for this
/// card and no history will be synthesized.
#[derive(Debug, Clone)]
pub struct SourceCard {
    pub name: String,
    pub set_name: Option<String>,
    pub rarity_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub card_type: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub illustrator: Option<String>,
    pub attributes: Option<CardAttributes>,
    pub price: Option<f64>,
}

impl SourceCard {
    /// Convert into a store insert payload for the given category.
    pub fn into_new_card(self, category_id: u32) -> NewCard {
        NewCard {
            name: self.name,
            category_id,
            set_name: self.set_name,
            rarity_name: self.rarity_name,
            card_number: self.card_number,
            image_url: self.image_url,
            card_type: self.card_type,
            release_date: self.release_date,
            description: self.description,
            illustrator: self.illustrator,
            attributes: self.attributes,
        }
    }
}

/// Trait abstraction for all card ingestion sources.
///
/// Each upstream feed (Pokémon TCG API, YGOPRODeck, synthetic sample
/// sets) implements this trait. If an API stops working or changes, only
/// that one implementation is replaced — the ingestion pipeline is
/// untouched.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Human-readable name of this source (used as the price tick's
    /// source tag and in logs/errors).
    fn name(&self) -> &str;

    /// Code of the category this source populates (e.g., "pokemon").
    fn category_code(&self) -> &str;

    /// Fetch one batch of upstream records.
    async fn fetch_cards(&self) -> Result<Vec<SourceCard>, CoreError>;
}
