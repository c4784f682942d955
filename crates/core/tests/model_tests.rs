// ═══════════════════════════════════════════════════════════════════
// Model Tests — entity structs, typed attributes, projection shapes
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};

use card_market_core::models::card::{Card, CardAttributes, NewCard};
use card_market_core::models::category::CardCategory;
use card_market_core::models::price::PriceTick;
use card_market_core::models::projection::{CardWithPrice, MarketTrend};
use card_market_core::models::settings::Settings;

fn sample_category() -> CardCategory {
    CardCategory {
        id: 1,
        name: "Pokémon".into(),
        code: "pokemon".into(),
        display_name: "Pokémon".into(),
        icon_name: "dragon".into(),
        color_code: "#EE8130".into(),
    }
}

fn sample_card() -> Card {
    Card {
        id: 7,
        name: "Pikachu".into(),
        category_id: 1,
        set_name: Some("Base Set".into()),
        rarity_name: None,
        card_number: Some("58".into()),
        image_url: None,
        card_type: Some("Lightning".into()),
        release_date: None,
        description: None,
        illustrator: Some("Mitsuhiro Arita".into()),
        attributes: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CardAttributes
// ═══════════════════════════════════════════════════════════════════

mod attributes {
    use super::*;

    #[test]
    fn pokemon_variant_tags_franchise() {
        let attrs = CardAttributes::Pokemon {
            hp: Some("60".into()),
            subtypes: vec!["Basic".into()],
            evolves_from: None,
        };
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["franchise"], "pokemon");
        assert_eq!(json["hp"], "60");
    }

    #[test]
    fn yugioh_variant_tags_franchise() {
        let attrs = CardAttributes::Yugioh {
            attack: Some(3000),
            defense: Some(2500),
            level: Some(8),
            attribute: Some("DARK".into()),
            race: Some("Dragon".into()),
        };
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["franchise"], "yugioh");
        assert_eq!(json["attack"], 3000);
    }

    #[test]
    fn serde_roundtrip() {
        let attrs = CardAttributes::Pokemon {
            hp: None,
            subtypes: vec!["Stage 1".into(), "Rapid Strike".into()],
            evolves_from: Some("Pikachu".into()),
        };
        let json = serde_json::to_string(&attrs).unwrap();
        let back: CardAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(attrs, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  NewCard
// ═══════════════════════════════════════════════════════════════════

mod new_card {
    use super::*;

    #[test]
    fn default_has_no_optionals() {
        let new = NewCard {
            name: "Charizard".into(),
            category_id: 1,
            ..Default::default()
        };
        assert!(new.set_name.is_none());
        assert!(new.rarity_name.is_none());
        assert!(new.release_date.is_none());
        assert!(new.attributes.is_none());
    }

    #[test]
    fn deserializes_with_missing_optionals() {
        let new: NewCard =
            serde_json::from_str(r#"{"name":"Charizard","category_id":1}"#).unwrap();
        assert_eq!(new.name, "Charizard");
        assert!(new.image_url.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PriceTick
// ═══════════════════════════════════════════════════════════════════

mod price_tick {
    use super::*;

    #[test]
    fn missing_deltas_read_as_zero() {
        let tick = PriceTick {
            id: 1,
            card_id: 7,
            price: 12.5,
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
            source: None,
            market_change: None,
            percent_change: None,
        };
        assert_eq!(tick.market_change_or_zero(), 0.0);
        assert_eq!(tick.percent_change_or_zero(), 0.0);
    }

    #[test]
    fn present_deltas_pass_through() {
        let tick = PriceTick {
            id: 1,
            card_id: 7,
            price: 12.5,
            timestamp: Utc::now(),
            source: Some("tcgplayer".into()),
            market_change: Some(1.5),
            percent_change: Some(13.6),
        };
        assert_eq!(tick.market_change_or_zero(), 1.5);
        assert_eq!(tick.percent_change_or_zero(), 13.6);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Projections
// ═══════════════════════════════════════════════════════════════════

mod projections {
    use super::*;

    #[test]
    fn card_with_price_flattens_card_fields() {
        let projection = CardWithPrice {
            card: sample_card(),
            current_price: 11.0,
            price_change: -1.0,
            percent_change: -8.3,
            category: sample_category(),
        };
        let json = serde_json::to_value(&projection).unwrap();
        // Card fields sit at the top level, next to the price fields.
        assert_eq!(json["name"], "Pikachu");
        assert_eq!(json["current_price"], 11.0);
        assert_eq!(json["category"]["code"], "pokemon");
    }

    #[test]
    fn market_trend_omits_absent_view_count() {
        let trend = MarketTrend {
            card_id: 7,
            name: "Pikachu".into(),
            category_id: 1,
            category_name: "Pokémon".into(),
            current_price: 11.0,
            price_change: -1.0,
            percent_change: -8.3,
            view_count: None,
        };
        let json = serde_json::to_value(&trend).unwrap();
        assert!(json.get("view_count").is_none());
    }

    #[test]
    fn market_trend_serializes_view_count_when_present() {
        let trend = MarketTrend {
            card_id: 7,
            name: "Pikachu".into(),
            category_id: 1,
            category_name: "Pokémon".into(),
            current_price: 11.0,
            price_change: 0.0,
            percent_change: 0.0,
            view_count: Some(4),
        };
        let json = serde_json::to_value(&trend).unwrap();
        assert_eq!(json["view_count"], 4);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn default_has_no_api_keys() {
        assert!(Settings::default().api_keys.is_empty());
    }
}
