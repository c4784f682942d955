use serde::{Deserialize, Serialize};

/// A card franchise grouping. Four are seeded at store construction
/// ("pokemon", "yugioh", "tcg", "topps") and are immutable in practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCategory {
    pub id: u32,

    /// Unique full name (e.g., "Pokémon").
    pub name: String,

    /// Unique short code used in URLs and chat commands (e.g., "pokemon").
    pub code: String,

    pub display_name: String,

    /// Icon tag for the UI layer.
    pub icon_name: String,

    /// Hex color tag for the UI layer.
    pub color_code: String,
}

/// Payload for creating a category; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub code: String,
    pub display_name: String,
    pub icon_name: String,
    pub color_code: String,
}
