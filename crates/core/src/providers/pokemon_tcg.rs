use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::{CardSource, SourceCard};
use crate::errors::CoreError;
use crate::models::card::CardAttributes;

const BASE_URL: &str = "https://api.pokemontcg.io/v2";

/// Number of cards fetched per ingestion run.
const PAGE_SIZE: u32 = 20;

/// Pokémon TCG API source (pokemontcg.io).
///
/// - **API key**: optional (`X-Api-Key` header); without one the API
///   applies a lower rate limit.
/// - **Ordering**: newest sets first.
/// - **Prices**: TCGplayer blocks per printing; the fallback chain is
///   holofoil → normal → reverse holofoil, market price before mid.
pub struct PokemonTcgSource {
    client: Client,
    api_key: Option<String>,
}

impl PokemonTcgSource {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }
}

// ── Pokémon TCG API response types ──────────────────────────────────

#[derive(Deserialize)]
struct CardsResponse {
    data: Vec<ApiCard>,
}

#[derive(Deserialize)]
struct ApiCard {
    name: String,
    hp: Option<String>,
    #[serde(default)]
    subtypes: Vec<String>,
    #[serde(rename = "evolvesFrom")]
    evolves_from: Option<String>,
    rarity: Option<String>,
    number: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    artist: Option<String>,
    #[serde(rename = "flavorText")]
    flavor_text: Option<String>,
    set: Option<ApiSet>,
    images: Option<ApiImages>,
    tcgplayer: Option<ApiTcgplayer>,
}

#[derive(Deserialize)]
struct ApiSet {
    name: Option<String>,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
}

#[derive(Deserialize)]
struct ApiImages {
    large: Option<String>,
}

#[derive(Deserialize)]
struct ApiTcgplayer {
    prices: Option<ApiPrices>,
}

#[derive(Deserialize)]
struct ApiPrices {
    holofoil: Option<ApiPriceVariant>,
    normal: Option<ApiPriceVariant>,
    #[serde(rename = "reverseHolofoil")]
    reverse_holofoil: Option<ApiPriceVariant>,
}

#[derive(Deserialize)]
struct ApiPriceVariant {
    market: Option<f64>,
    mid: Option<f64>,
}

impl ApiPriceVariant {
    fn best(&self) -> Option<f64> {
        self.market.or(self.mid)
    }
}

impl ApiCard {
    fn best_price(&self) -> Option<f64> {
        let prices = self.tcgplayer.as_ref()?.prices.as_ref()?;
        prices
            .holofoil
            .as_ref()
            .and_then(ApiPriceVariant::best)
            .or_else(|| prices.normal.as_ref().and_then(ApiPriceVariant::best))
            .or_else(|| {
                prices
                    .reverse_holofoil
                    .as_ref()
                    .and_then(ApiPriceVariant::best)
            })
    }
}

// Set release dates come back as "2021/03/19".
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

#[async_trait]
impl CardSource for PokemonTcgSource {
    fn name(&self) -> &str {
        "tcgplayer"
    }

    fn category_code(&self) -> &str {
        "pokemon"
    }

    async fn fetch_cards(&self) -> Result<Vec<SourceCard>, CoreError> {
        let url = format!(
            "{BASE_URL}/cards?pageSize={PAGE_SIZE}&orderBy=-set.releaseDate"
        );

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let resp: CardsResponse = request
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                source_name: "Pokémon TCG".into(),
                message: format!("Failed to parse card list: {e}"),
            })?;

        let cards = resp
            .data
            .into_iter()
            .map(|card| {
                let price = card.best_price();
                SourceCard {
                    set_name: card.set.as_ref().and_then(|s| s.name.clone()),
                    release_date: card
                        .set
                        .as_ref()
                        .and_then(|s| s.release_date.as_deref())
                        .and_then(parse_release_date),
                    rarity_name: card.rarity,
                    card_number: card.number,
                    image_url: card.images.and_then(|i| i.large),
                    card_type: card.types.first().cloned(),
                    description: card.flavor_text,
                    illustrator: card.artist,
                    attributes: Some(CardAttributes::Pokemon {
                        hp: card.hp,
                        subtypes: card.subtypes,
                        evolves_from: card.evolves_from,
                    }),
                    price,
                    name: card.name,
                }
            })
            .collect();

        Ok(cards)
    }
}
