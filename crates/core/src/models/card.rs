use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Franchise-specific card attributes.
///
/// The upstream APIs expose these as loose key/value blobs; modelling them
/// as a tagged enum keeps each franchise's fields typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "franchise", rename_all = "snake_case")]
pub enum CardAttributes {
    Pokemon {
        hp: Option<String>,
        #[serde(default)]
        subtypes: Vec<String>,
        evolves_from: Option<String>,
    },
    Yugioh {
        attack: Option<i32>,
        defense: Option<i32>,
        level: Option<u8>,
        attribute: Option<String>,
        race: Option<String>,
    },
}

/// A single collectible card.
///
/// `category_id` references a `CardCategory` by convention only — the store
/// does not validate it at insert; a dangling reference surfaces later as a
/// lookup failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub name: String,
    pub category_id: u32,
    pub set_name: Option<String>,
    pub rarity_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub card_type: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub illustrator: Option<String>,
    #[serde(default)]
    pub attributes: Option<CardAttributes>,
}

/// Payload for creating a card; the store assigns the id and defaults
/// absent optional fields to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub name: String,
    pub category_id: u32,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub rarity_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub illustrator: Option<String>,
    #[serde(default)]
    pub attributes: Option<CardAttributes>,
}

/// Partial update for an existing card. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPatch {
    pub name: Option<String>,
    pub set_name: Option<String>,
    pub rarity_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}
