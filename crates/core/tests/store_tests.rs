// ═══════════════════════════════════════════════════════════════════
// Store Tests — CardStore CRUD, search, projections, price history,
// favorites, recently viewed
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, Utc};

use card_market_core::errors::CoreError;
use card_market_core::models::card::{CardPatch, NewCard};
use card_market_core::models::price::NewPriceTick;
use card_market_core::models::user::NewUser;
use card_market_core::store::CardStore;

fn new_card(name: &str, category_id: u32) -> NewCard {
    NewCard {
        name: name.into(),
        category_id,
        ..Default::default()
    }
}

/// Tick `days_ago` days in the past, deltas unset.
fn tick(card_id: u32, price: f64, days_ago: i64) -> NewPriceTick {
    NewPriceTick {
        card_id,
        price,
        timestamp: Some(Utc::now() - Duration::days(days_ago)),
        source: None,
        market_change: None,
        percent_change: None,
    }
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password: "hunter2".into(),
        chat_id: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Seeding & identity
// ═══════════════════════════════════════════════════════════════════

mod seeding {
    use super::*;

    #[test]
    fn four_default_categories() {
        let store = CardStore::new();
        let codes: Vec<&str> = store.categories().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["pokemon", "yugioh", "tcg", "topps"]);
    }

    #[test]
    fn category_ids_start_at_one() {
        let store = CardStore::new();
        let ids: Vec<u32> = store.categories().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn category_lookup_by_code_and_id() {
        let store = CardStore::new();
        let pokemon = store.category_by_code("pokemon").unwrap();
        assert_eq!(pokemon.id, 1);
        assert_eq!(store.category(1).unwrap().name, "Pokémon");
        assert!(store.category_by_code("digimon").is_none());
        assert!(store.category(99).is_none());
    }

    #[test]
    fn card_ids_are_monotonic_from_one() {
        let mut store = CardStore::new();
        let a = store.create_card(new_card("A", 1));
        let b = store.create_card(new_card("B", 1));
        let c = store.create_card(new_card("C", 2));
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Users
// ═══════════════════════════════════════════════════════════════════

mod users {
    use super::*;

    #[test]
    fn create_and_lookup() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(store.user(1).unwrap().username, "ash");
        assert_eq!(store.user_by_username("ash").unwrap().id, 1);
        assert!(store.user(2).is_none());
    }

    #[test]
    fn duplicate_username_rejected() {
        let mut store = CardStore::new();
        store.create_user(new_user("ash")).unwrap();
        let err = store.create_user(new_user("ash")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn chat_id_lookup_and_uniqueness() {
        let mut store = CardStore::new();
        store
            .create_user(NewUser {
                username: "misty".into(),
                password: "pw".into(),
                chat_id: Some("42".into()),
            })
            .unwrap();
        assert_eq!(store.user_by_chat_id("42").unwrap().username, "misty");

        let err = store
            .create_user(NewUser {
                username: "brock".into(),
                password: "pw".into(),
                chat_id: Some("42".into()),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Cards & search
// ═══════════════════════════════════════════════════════════════════

mod cards {
    use super::*;

    #[test]
    fn create_fills_optionals_with_none() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        assert!(card.set_name.is_none());
        assert!(card.release_date.is_none());
        assert!(card.attributes.is_none());
    }

    #[test]
    fn create_does_not_validate_category() {
        let mut store = CardStore::new();
        // Dangling reference is allowed at insert; it surfaces on lookup.
        let card = store.create_card(new_card("Orphan", 99));
        assert_eq!(store.card(card.id).unwrap().category_id, 99);
        assert!(store.card_details(card.id).is_none());
    }

    #[test]
    fn update_card_patches_selected_fields() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        let updated = store
            .update_card(
                card.id,
                CardPatch {
                    set_name: Some("Base Set".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Pikachu");
        assert_eq!(updated.set_name.as_deref(), Some("Base Set"));
    }

    #[test]
    fn update_missing_card_is_not_found() {
        let mut store = CardStore::new();
        let err = store.update_card(99, CardPatch::default()).unwrap_err();
        assert!(matches!(err, CoreError::CardNotFound(99)));
    }
}

mod search {
    use super::*;

    #[test]
    fn substring_match_is_case_insensitive() {
        let mut store = CardStore::new();
        store.create_card(new_card("Pikachu", 1));
        let results = store.search_cards("pika", None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].card.name, "Pikachu");
    }

    #[test]
    fn empty_query_matches_every_card() {
        let mut store = CardStore::new();
        store.create_card(new_card("Pikachu", 1));
        store.create_card(new_card("Dark Magician", 2));
        assert_eq!(store.search_cards("", None).len(), 2);
    }

    #[test]
    fn category_filter_excludes_other_categories() {
        let mut store = CardStore::new();
        store.create_card(new_card("Pikachu", 1));
        assert!(store.search_cards("pika", Some(2)).is_empty());
        assert_eq!(store.search_cards("pika", Some(1)).len(), 1);
    }

    #[test]
    fn card_without_ticks_projects_with_zeroes() {
        let mut store = CardStore::new();
        store.create_card(new_card("Pikachu", 1));
        let results = store.search_cards("pikachu", None);
        assert_eq!(results[0].current_price, 0.0);
        assert_eq!(results[0].percent_change, 0.0);
    }

    #[test]
    fn card_with_missing_category_is_skipped() {
        let mut store = CardStore::new();
        store.create_card(new_card("Orphan", 99));
        assert!(store.search_cards("orphan", None).is_empty());
    }

    #[test]
    fn cards_by_category_respects_limit_and_order() {
        let mut store = CardStore::new();
        for i in 0..5 {
            store.create_card(new_card(&format!("Poke {i}"), 1));
        }
        store.create_card(new_card("Dark Magician", 2));

        let listed = store.cards_by_category(1, 3);
        assert_eq!(listed.len(), 3);
        let names: Vec<&str> = listed.iter().map(|c| c.card.name.as_str()).collect();
        assert_eq!(names, vec!["Poke 0", "Poke 1", "Poke 2"]);
        assert!(listed.iter().all(|c| c.card.category_id == 1));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Prices
// ═══════════════════════════════════════════════════════════════════

mod prices {
    use super::*;

    #[test]
    fn add_price_defaults_timestamp_to_now() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        let before = Utc::now();
        let stored = store.add_price(NewPriceTick {
            card_id: card.id,
            price: 10.0,
            timestamp: None,
            source: None,
            market_change: None,
            percent_change: None,
        });
        assert!(stored.timestamp >= before && stored.timestamp <= Utc::now());
        assert_eq!(stored.id, 1);
    }

    #[test]
    fn latest_price_is_max_timestamp_not_last_appended() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        // Appended out of timestamp order on purpose.
        store.add_price(tick(card.id, 12.0, 1));
        store.add_price(tick(card.id, 11.0, 0));
        store.add_price(tick(card.id, 10.0, 2));

        let latest = store.latest_price(card.id).unwrap();
        assert_eq!(latest.price, 11.0);
    }

    #[test]
    fn latest_price_none_without_ticks() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        assert!(store.latest_price(card.id).is_none());
        assert!(store.latest_price(999).is_none());
    }

    #[test]
    fn history_window_is_ascending() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_price(tick(card.id, 11.0, 0));
        store.add_price(tick(card.id, 10.0, 2));
        store.add_price(tick(card.id, 12.0, 1));

        let history = store.price_history(card.id, 30);
        let prices: Vec<f64> = history.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![10.0, 12.0, 11.0]);
    }

    #[test]
    fn history_window_excludes_older_ticks() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_price(tick(card.id, 5.0, 40));
        store.add_price(tick(card.id, 11.0, 1));

        let history = store.price_history(card.id, 30);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, 11.0);
    }

    #[test]
    fn non_positive_days_returns_full_history_ascending() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_price(tick(card.id, 11.0, 1));
        store.add_price(tick(card.id, 5.0, 40));

        let history = store.price_history(card.id, 0);
        let prices: Vec<f64> = history.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![5.0, 11.0]);
    }

    #[test]
    fn history_empty_for_unknown_card() {
        let store = CardStore::new();
        assert!(store.price_history(42, 30).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Card details
// ═══════════════════════════════════════════════════════════════════

mod details {
    use super::*;

    #[test]
    fn aggregates_high_low_average() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_price(tick(card.id, 10.0, 2));
        store.add_price(tick(card.id, 12.0, 1));
        store.add_price(tick(card.id, 11.0, 0));

        let details = store.card_details(card.id).unwrap();
        assert_eq!(details.summary.current_price, 11.0);
        assert_eq!(details.highest_price.price, 12.0);
        assert_eq!(details.lowest_price.price, 10.0);
        assert!((details.average_price - 11.0).abs() < 1e-9);
        assert_eq!(details.price_history.len(), 3);
        assert_eq!(details.summary.category.code, "pokemon");
    }

    #[test]
    fn missing_card_is_none() {
        let store = CardStore::new();
        assert!(store.card_details(42).is_none());
    }

    #[test]
    fn card_without_ticks_is_none() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Pikachu", 1));
        assert!(store.card_details(card.id).is_none());
    }

    #[test]
    fn card_with_missing_category_is_none() {
        let mut store = CardStore::new();
        let card = store.create_card(new_card("Orphan", 99));
        store.add_price(tick(card.id, 10.0, 0));
        assert!(store.card_details(card.id).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Favorites
// ═══════════════════════════════════════════════════════════════════

mod favorites {
    use super::*;

    #[test]
    fn add_and_list() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));

        let fav = store.add_favorite(user.id, card.id);
        assert_eq!(fav.id, 1);
        assert!(store.is_favorite(user.id, card.id));

        let listed = store.favorites(user.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].card.name, "Pikachu");
    }

    #[test]
    fn re_adding_is_idempotent() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));

        let first = store.add_favorite(user.id, card.id);
        let second = store.add_favorite(user.id, card.id);
        assert_eq!(first.id, second.id);
        assert_eq!(store.favorites(user.id).unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_signals_not_found_and_changes_nothing() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_favorite(user.id, card.id);

        let err = store.remove_favorite(user.id, 999).unwrap_err();
        assert!(matches!(
            err,
            CoreError::FavoriteNotFound { user_id: _, card_id: 999 }
        ));
        assert_eq!(store.favorites(user.id).unwrap().len(), 1);

        // Same signal for a user with no favorites at all.
        assert!(store.remove_favorite(77, card.id).is_err());
    }

    #[test]
    fn remove_existing_deletes_the_entry() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));
        store.add_favorite(user.id, card.id);

        store.remove_favorite(user.id, card.id).unwrap();
        assert!(!store.is_favorite(user.id, card.id));
        assert!(store.favorites(user.id).unwrap().is_empty());
    }

    #[test]
    fn dangling_card_reference_is_an_inconsistency() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        // No such card — nothing validates the reference at add time.
        store.add_favorite(user.id, 999);

        let err = store.favorites(user.id).unwrap_err();
        assert!(matches!(err, CoreError::Inconsistent(_)));
    }

    #[test]
    fn empty_watchlist_is_ok() {
        let store = CardStore::new();
        assert!(store.favorites(42).unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Recently viewed
// ═══════════════════════════════════════════════════════════════════

mod recently_viewed {
    use super::*;

    #[test]
    fn repeat_view_keeps_one_entry_with_fresh_timestamp() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));

        let first = store.add_recently_viewed(user.id, card.id);
        let second = store.add_recently_viewed(user.id, card.id);
        assert!(second.viewed_at >= first.viewed_at);

        let listed = store.recently_viewed(user.id, 5).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].card.id, card.id);
    }

    #[test]
    fn newest_first_and_limited() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let a = store.create_card(new_card("A", 1));
        let b = store.create_card(new_card("B", 1));
        let c = store.create_card(new_card("C", 1));

        store.add_recently_viewed(user.id, a.id);
        store.add_recently_viewed(user.id, b.id);
        store.add_recently_viewed(user.id, c.id);

        let listed = store.recently_viewed(user.id, 2).unwrap();
        assert_eq!(listed.len(), 2);
        // Ids are a tiebreak-free proxy here: views happen in id order,
        // so the newest views are the highest ids.
        assert_eq!(listed[0].card.id, c.id);
        assert_eq!(listed[1].card.id, b.id);
    }

    #[test]
    fn viewing_again_bumps_to_top() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        let a = store.create_card(new_card("A", 1));
        let b = store.create_card(new_card("B", 1));

        store.add_recently_viewed(user.id, a.id);
        store.add_recently_viewed(user.id, b.id);
        store.add_recently_viewed(user.id, a.id);

        let listed = store.recently_viewed(user.id, 5).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].card.id, a.id);
    }

    #[test]
    fn dangling_reference_is_an_inconsistency() {
        let mut store = CardStore::new();
        let user = store.create_user(new_user("ash")).unwrap();
        store.add_recently_viewed(user.id, 999);
        assert!(matches!(
            store.recently_viewed(user.id, 5),
            Err(CoreError::Inconsistent(_))
        ));
    }

    #[test]
    fn view_counts_aggregate_across_users() {
        let mut store = CardStore::new();
        let ash = store.create_user(new_user("ash")).unwrap();
        let misty = store.create_user(new_user("misty")).unwrap();
        let card = store.create_card(new_card("Pikachu", 1));
        let other = store.create_card(new_card("Eevee", 1));

        store.add_recently_viewed(ash.id, card.id);
        store.add_recently_viewed(misty.id, card.id);
        store.add_recently_viewed(ash.id, other.id);

        let counts = store.view_counts();
        assert_eq!(counts.get(&card.id), Some(&2));
        assert_eq!(counts.get(&other.id), Some(&1));
    }
}
