use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::{CardSource, SourceCard};
use crate::errors::CoreError;
use crate::models::card::CardAttributes;

const BASE_URL: &str = "https://db.ygoprodeck.com/api/v7";

/// Number of cards fetched per ingestion run.
const BATCH_SIZE: u32 = 20;

/// YGOPRODeck API source for Yu-Gi-Oh! cards.
///
/// - **Free**: no API key.
/// - **Prices**: vendor fields arrive as strings; the fallback chain is
///   Amazon → TCGplayer → eBay, first value that parses above zero.
/// - The API does not expose per-set release dates.
pub struct YgoProDeckSource {
    client: Client,
}

impl YgoProDeckSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for YgoProDeckSource {
    fn default() -> Self {
        Self::new()
    }
}

// ── YGOPRODeck API response types ───────────────────────────────────

#[derive(Deserialize)]
struct CardInfoResponse {
    data: Vec<ApiCard>,
}

#[derive(Deserialize)]
struct ApiCard {
    name: String,
    #[serde(rename = "type")]
    card_type: Option<String>,
    desc: Option<String>,
    atk: Option<i32>,
    def: Option<i32>,
    level: Option<u8>,
    attribute: Option<String>,
    race: Option<String>,
    #[serde(default)]
    card_sets: Vec<ApiCardSet>,
    #[serde(default)]
    card_images: Vec<ApiCardImage>,
    #[serde(default)]
    card_prices: Vec<ApiCardPrices>,
}

#[derive(Deserialize)]
struct ApiCardSet {
    set_name: Option<String>,
    set_rarity: Option<String>,
    set_code: Option<String>,
}

#[derive(Deserialize)]
struct ApiCardImage {
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct ApiCardPrices {
    amazon_price: Option<String>,
    tcgplayer_price: Option<String>,
    ebay_price: Option<String>,
}

impl ApiCardPrices {
    /// First vendor price that parses to a positive number.
    fn best(&self) -> Option<f64> {
        [&self.amazon_price, &self.tcgplayer_price, &self.ebay_price]
            .into_iter()
            .flatten()
            .filter_map(|raw| raw.parse::<f64>().ok())
            .find(|p| *p > 0.0)
    }
}

#[async_trait]
impl CardSource for YgoProDeckSource {
    fn name(&self) -> &str {
        "yugioh api"
    }

    fn category_code(&self) -> &str {
        "yugioh"
    }

    async fn fetch_cards(&self) -> Result<Vec<SourceCard>, CoreError> {
        let url = format!("{BASE_URL}/cardinfo.php?sort=name&num={BATCH_SIZE}&offset=0");

        let resp: CardInfoResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                source_name: "YGOPRODeck".into(),
                message: format!("Failed to parse card list: {e}"),
            })?;

        let cards = resp
            .data
            .into_iter()
            .map(|card| {
                let price = card.card_prices.first().and_then(ApiCardPrices::best);
                let first_set = card.card_sets.into_iter().next();
                SourceCard {
                    name: card.name,
                    set_name: first_set.as_ref().and_then(|s| s.set_name.clone()),
                    rarity_name: first_set.as_ref().and_then(|s| s.set_rarity.clone()),
                    card_number: first_set.and_then(|s| s.set_code),
                    image_url: card.card_images.into_iter().next().and_then(|i| i.image_url),
                    card_type: card.card_type,
                    release_date: None,
                    description: card.desc,
                    illustrator: None,
                    attributes: Some(CardAttributes::Yugioh {
                        attack: card.atk,
                        defense: card.def,
                        level: card.level,
                        attribute: card.attribute,
                        race: card.race,
                    }),
                    price,
                }
            })
            .collect();

        Ok(cards)
    }
}
