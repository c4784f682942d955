use async_trait::async_trait;

use super::traits::{CardSource, SourceCard};
use crate::errors::CoreError;

/// Synthetic card source backed by a fixed record set.
///
/// Stands in for franchises without a freely usable upstream API: the
/// "tcg" category gets a small Magic: The Gathering set and "topps" gets
/// vintage baseball cards. Records carry realistic prices so the
/// backfill/refresh pipeline behaves like it does for live sources.
pub struct SampleSource {
    name: &'static str,
    category_code: &'static str,
    cards: Vec<SourceCard>,
}

impl SampleSource {
    /// Sample Magic: The Gathering cards for the "tcg" category.
    pub fn mtg() -> Self {
        Self {
            name: "simulated data",
            category_code: "tcg",
            cards: vec![
                sample_card(
                    "Black Lotus",
                    "Alpha",
                    "Mythic Rare",
                    "001",
                    "https://gatherer.wizards.com/Handlers/Image.ashx?multiverseid=382866&type=card",
                    "Artifact",
                    "Tap, Sacrifice Black Lotus: Add three mana of any one color.",
                    45_500.0,
                ),
                sample_card(
                    "Force of Will",
                    "Alliances",
                    "Rare",
                    "105",
                    "https://gatherer.wizards.com/Handlers/Image.ashx?multiverseid=413591&type=card",
                    "Instant",
                    "You may pay 1 life and exile a blue card from your hand rather than pay this spell's mana cost.",
                    498.30,
                ),
            ],
        }
    }

    /// Sample vintage baseball cards for the "topps" category.
    pub fn topps() -> Self {
        Self {
            name: "simulated data",
            category_code: "topps",
            cards: vec![
                sample_card(
                    "Mickey Mantle",
                    "1952 Topps",
                    "Rare",
                    "#311",
                    "https://example.com/mickey-mantle.jpg",
                    "Baseball",
                    "New York Yankees centerfielder, Hall of Fame member",
                    5_820.0,
                ),
                sample_card(
                    "Babe Ruth",
                    "1933 Goudey",
                    "Rare",
                    "#53",
                    "https://example.com/babe-ruth.jpg",
                    "Baseball",
                    "New York Yankees outfielder and pitcher, Hall of Fame member",
                    3_250.0,
                ),
            ],
        }
    }

    /// Build a source from arbitrary records (used by tests).
    pub fn with_cards(
        name: &'static str,
        category_code: &'static str,
        cards: Vec<SourceCard>,
    ) -> Self {
        Self {
            name,
            category_code,
            cards,
        }
    }
}

fn sample_card(
    name: &str,
    set_name: &str,
    rarity_name: &str,
    card_number: &str,
    image_url: &str,
    card_type: &str,
    description: &str,
    price: f64,
) -> SourceCard {
    SourceCard {
        name: name.to_string(),
        set_name: Some(set_name.to_string()),
        rarity_name: Some(rarity_name.to_string()),
        card_number: Some(card_number.to_string()),
        image_url: Some(image_url.to_string()),
        card_type: Some(card_type.to_string()),
        release_date: None,
        description: Some(description.to_string()),
        illustrator: None,
        attributes: None,
        price: Some(price),
    }
}

#[async_trait]
impl CardSource for SampleSource {
    fn name(&self) -> &str {
        self.name
    }

    fn category_code(&self) -> &str {
        self.category_code
    }

    async fn fetch_cards(&self) -> Result<Vec<SourceCard>, CoreError> {
        Ok(self.cards.clone())
    }
}
