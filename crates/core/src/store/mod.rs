//! In-memory entity store.
//!
//! `CardStore` owns every entity collection and implements the CRUD,
//! search and projection operations the facade exposes. Ids are assigned
//! per entity type, starting at 1, monotonically increasing and never
//! reused. Collections are `BTreeMap`s keyed by id: since ids are
//! monotonic, map iteration order equals insertion order, which is what
//! keeps ranking tiebreaks and category listings reproducible.

use chrono::{Duration, Utc};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::card::{Card, CardPatch, NewCard};
use crate::models::category::{CardCategory, NewCategory};
use crate::models::favorite::Favorite;
use crate::models::price::{NewPriceTick, PriceTick};
use crate::models::projection::{CardWithDetails, CardWithPrice};
use crate::models::user::{NewUser, User};
use crate::models::viewed::RecentlyViewed;

/// Days of history `card_details` aggregates over.
const DETAILS_HISTORY_DAYS: i64 = 30;

/// The in-memory repository for all entity collections.
///
/// Constructed once at process start and passed by reference to whatever
/// consumes it — there is no global instance. All operations are
/// synchronous; a multi-threaded embedding serializes access through a
/// single lock (see `refresher::spawn_price_refresher`).
pub struct CardStore {
    users: BTreeMap<u32, User>,
    categories: BTreeMap<u32, CardCategory>,
    cards: BTreeMap<u32, Card>,
    /// card id → ticks in arrival order (not timestamp order).
    prices: BTreeMap<u32, Vec<PriceTick>>,
    /// user id → favorites in add order.
    favorites: BTreeMap<u32, Vec<Favorite>>,
    /// user id → views in add order.
    recently_viewed: BTreeMap<u32, Vec<RecentlyViewed>>,
    next_user_id: u32,
    next_category_id: u32,
    next_card_id: u32,
    next_price_id: u32,
    next_favorite_id: u32,
    next_viewed_id: u32,
}

impl CardStore {
    /// Create a store pre-seeded with the four default card categories.
    pub fn new() -> Self {
        let mut store = Self {
            users: BTreeMap::new(),
            categories: BTreeMap::new(),
            cards: BTreeMap::new(),
            prices: BTreeMap::new(),
            favorites: BTreeMap::new(),
            recently_viewed: BTreeMap::new(),
            next_user_id: 1,
            next_category_id: 1,
            next_card_id: 1,
            next_price_id: 1,
            next_favorite_id: 1,
            next_viewed_id: 1,
        };
        store.seed_default_categories();
        store
    }

    fn seed_default_categories(&mut self) {
        let defaults = [
            ("Pokémon", "pokemon", "Pokémon", "dragon", "#EE8130"),
            ("Yu-Gi-Oh!", "yugioh", "Yu-Gi-Oh!", "chess-king", "#7F3FBF"),
            ("Trading Card Game", "tcg", "TCG", "fire", "#4592C4"),
            ("Topps", "topps", "Topps", "baseball-ball", "#D32F2F"),
        ];
        for (name, code, display_name, icon_name, color_code) in defaults {
            self.create_category(NewCategory {
                name: name.to_string(),
                code: code.to_string(),
                display_name: display_name.to_string(),
                icon_name: icon_name.to_string(),
                color_code: color_code.to_string(),
            });
        }
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Create a user. Username and chat id must be unique.
    pub fn create_user(&mut self, new: NewUser) -> Result<User, CoreError> {
        if self.user_by_username(&new.username).is_some() {
            return Err(CoreError::Validation(format!(
                "Username already taken: {}",
                new.username
            )));
        }
        if let Some(chat_id) = &new.chat_id {
            if self.user_by_chat_id(chat_id).is_some() {
                return Err(CoreError::Validation(format!(
                    "Chat identity already registered: {chat_id}"
                )));
            }
        }

        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            username: new.username,
            password: new.password,
            chat_id: new.chat_id,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: u32) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn user_by_chat_id(&self, chat_id: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.chat_id.as_deref() == Some(chat_id))
    }

    // ── Categories ──────────────────────────────────────────────────

    pub fn create_category(&mut self, new: NewCategory) -> CardCategory {
        let id = self.next_category_id;
        self.next_category_id += 1;
        let category = CardCategory {
            id,
            name: new.name,
            code: new.code,
            display_name: new.display_name,
            icon_name: new.icon_name,
            color_code: new.color_code,
        };
        self.categories.insert(id, category.clone());
        category
    }

    /// All categories in insertion (id) order.
    pub fn categories(&self) -> Vec<&CardCategory> {
        self.categories.values().collect()
    }

    pub fn category(&self, id: u32) -> Option<&CardCategory> {
        self.categories.get(&id)
    }

    pub fn category_by_code(&self, code: &str) -> Option<&CardCategory> {
        self.categories.values().find(|c| c.code == code)
    }

    // ── Cards ───────────────────────────────────────────────────────

    /// Create a card. The category reference is not validated here —
    /// an invalid id surfaces later as a lookup failure.
    pub fn create_card(&mut self, new: NewCard) -> Card {
        let id = self.next_card_id;
        self.next_card_id += 1;
        let card = Card {
            id,
            name: new.name,
            category_id: new.category_id,
            set_name: new.set_name,
            rarity_name: new.rarity_name,
            card_number: new.card_number,
            image_url: new.image_url,
            card_type: new.card_type,
            release_date: new.release_date,
            description: new.description,
            illustrator: new.illustrator,
            attributes: new.attributes,
        };
        self.cards.insert(id, card.clone());
        card
    }

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// All cards in insertion (id) order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Apply a partial update to an existing card.
    pub fn update_card(&mut self, id: u32, patch: CardPatch) -> Result<Card, CoreError> {
        let card = self
            .cards
            .get_mut(&id)
            .ok_or(CoreError::CardNotFound(id))?;
        if let Some(name) = patch.name {
            card.name = name;
        }
        if let Some(set_name) = patch.set_name {
            card.set_name = Some(set_name);
        }
        if let Some(rarity_name) = patch.rarity_name {
            card.rarity_name = Some(rarity_name);
        }
        if let Some(card_number) = patch.card_number {
            card.card_number = Some(card_number);
        }
        if let Some(image_url) = patch.image_url {
            card.image_url = Some(image_url);
        }
        if let Some(description) = patch.description {
            card.description = Some(description);
        }
        Ok(card.clone())
    }

    /// Case-insensitive substring search against card names, optionally
    /// narrowed to one category. An empty query matches every card.
    ///
    /// Cards whose category record is missing are skipped rather than
    /// projected with a dangling reference.
    pub fn search_cards(&self, query: &str, category_id: Option<u32>) -> Vec<CardWithPrice> {
        let needle = query.to_lowercase();
        self.cards
            .values()
            .filter(|card| card.name.to_lowercase().contains(&needle))
            .filter(|card| category_id.is_none_or(|id| card.category_id == id))
            .filter_map(|card| self.project(card))
            .collect()
    }

    /// The first `limit` cards of a category in insertion order — no
    /// ranking is applied.
    pub fn cards_by_category(&self, category_id: u32, limit: usize) -> Vec<CardWithPrice> {
        self.cards
            .values()
            .filter(|card| card.category_id == category_id)
            .take(limit)
            .filter_map(|card| self.project(card))
            .collect()
    }

    /// Full detail projection over the last 30 days of history.
    ///
    /// Returns `None` if the card does not exist, has no price ticks, or
    /// its category record is missing — even when the card row itself is
    /// present.
    pub fn card_details(&self, card_id: u32) -> Option<CardWithDetails> {
        let card = self.card(card_id)?;
        let latest = self.latest_price(card_id)?;
        let category = self.category(card.category_id)?;

        let history = self.price_history(card_id, DETAILS_HISTORY_DAYS);
        let highest = history
            .iter()
            .max_by(|a, b| a.price.total_cmp(&b.price))
            .cloned()
            .unwrap_or_else(|| latest.clone());
        let lowest = history
            .iter()
            .min_by(|a, b| a.price.total_cmp(&b.price))
            .cloned()
            .unwrap_or_else(|| latest.clone());
        let average = if history.is_empty() {
            latest.price
        } else {
            history.iter().map(|t| t.price).sum::<f64>() / history.len() as f64
        };

        Some(CardWithDetails {
            summary: CardWithPrice {
                card: card.clone(),
                current_price: latest.price,
                price_change: latest.market_change_or_zero(),
                percent_change: latest.percent_change_or_zero(),
                category: category.clone(),
            },
            price_history: history,
            highest_price: highest,
            lowest_price: lowest,
            average_price: average,
        })
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Append a tick to a card's history, creating the history on first
    /// use. A missing timestamp defaults to "now". Sibling ticks are
    /// never recomputed.
    pub fn add_price(&mut self, new: NewPriceTick) -> PriceTick {
        let id = self.next_price_id;
        self.next_price_id += 1;
        let tick = PriceTick {
            id,
            card_id: new.card_id,
            price: new.price,
            timestamp: new.timestamp.unwrap_or_else(Utc::now),
            source: new.source,
            market_change: new.market_change,
            percent_change: new.percent_change,
        };
        self.prices
            .entry(new.card_id)
            .or_default()
            .push(tick.clone());
        tick
    }

    /// The tick with the maximum timestamp — not necessarily the most
    /// recently appended one. Ties are broken arbitrarily.
    pub fn latest_price(&self, card_id: u32) -> Option<PriceTick> {
        self.prices
            .get(&card_id)?
            .iter()
            .max_by_key(|t| t.timestamp)
            .cloned()
    }

    /// Ticks from the last `days` days, ascending by timestamp.
    /// `days <= 0` returns the full history, also ascending.
    pub fn price_history(&self, card_id: u32, days: i64) -> Vec<PriceTick> {
        let Some(ticks) = self.prices.get(&card_id) else {
            return Vec::new();
        };

        let mut history: Vec<PriceTick> = if days <= 0 {
            ticks.clone()
        } else {
            let cutoff = Utc::now() - Duration::days(days);
            ticks
                .iter()
                .filter(|t| t.timestamp >= cutoff)
                .cloned()
                .collect()
        };
        history.sort_by_key(|t| t.timestamp);
        history
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// A user's watchlist, projected to `CardWithPrice`.
    ///
    /// Unlike search, a favorite pointing at a vanished card or category
    /// is a store inconsistency and fails the whole call.
    pub fn favorites(&self, user_id: u32) -> Result<Vec<CardWithPrice>, CoreError> {
        let favs = self.favorites.get(&user_id).map(Vec::as_slice).unwrap_or(&[]);
        favs.iter()
            .map(|fav| self.project_strict(fav.card_id))
            .collect()
    }

    /// Add a card to a user's watchlist. Re-adding an existing
    /// (user, card) pair returns the existing row unchanged.
    pub fn add_favorite(&mut self, user_id: u32, card_id: u32) -> Favorite {
        if let Some(existing) = self
            .favorites
            .get(&user_id)
            .and_then(|favs| favs.iter().find(|f| f.card_id == card_id))
        {
            return existing.clone();
        }

        let id = self.next_favorite_id;
        self.next_favorite_id += 1;
        let favorite = Favorite {
            id,
            user_id,
            card_id,
            added_at: Utc::now(),
        };
        self.favorites
            .entry(user_id)
            .or_default()
            .push(favorite.clone());
        favorite
    }

    /// Remove a watchlist entry. Signals not-found when no such favorite
    /// exists and leaves the set unchanged.
    pub fn remove_favorite(&mut self, user_id: u32, card_id: u32) -> Result<(), CoreError> {
        let favs = self
            .favorites
            .get_mut(&user_id)
            .ok_or(CoreError::FavoriteNotFound { user_id, card_id })?;
        let before = favs.len();
        favs.retain(|f| f.card_id != card_id);
        if favs.len() == before {
            return Err(CoreError::FavoriteNotFound { user_id, card_id });
        }
        Ok(())
    }

    pub fn is_favorite(&self, user_id: u32, card_id: u32) -> bool {
        self.favorites
            .get(&user_id)
            .is_some_and(|favs| favs.iter().any(|f| f.card_id == card_id))
    }

    // ── Recently viewed ─────────────────────────────────────────────

    /// The user's most recent views, newest first, projected to
    /// `CardWithPrice`. Dangling references fail like `favorites`.
    pub fn recently_viewed(
        &self,
        user_id: u32,
        limit: usize,
    ) -> Result<Vec<CardWithPrice>, CoreError> {
        let views = self
            .recently_viewed
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut recent: Vec<&RecentlyViewed> = views.iter().collect();
        recent.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        recent
            .into_iter()
            .take(limit)
            .map(|view| self.project_strict(view.card_id))
            .collect()
    }

    /// Record a view. An existing entry for the same card is removed
    /// first, so the card bumps to the top with a fresh timestamp.
    pub fn add_recently_viewed(&mut self, user_id: u32, card_id: u32) -> RecentlyViewed {
        let id = self.next_viewed_id;
        self.next_viewed_id += 1;
        let viewed = RecentlyViewed {
            id,
            user_id,
            card_id,
            viewed_at: Utc::now(),
        };

        let views = self.recently_viewed.entry(user_id).or_default();
        views.retain(|v| v.card_id != card_id);
        views.push(viewed.clone());
        viewed
    }

    /// Total view count per card across all users' lists, in card-id
    /// order. Cards never viewed are absent.
    pub fn view_counts(&self) -> BTreeMap<u32, u32> {
        let mut counts = BTreeMap::new();
        for views in self.recently_viewed.values() {
            for view in views {
                *counts.entry(view.card_id).or_insert(0) += 1;
            }
        }
        counts
    }

    // ── Projections ─────────────────────────────────────────────────

    /// Join a card with its latest price and category. `None` when the
    /// category record is missing; a card without ticks projects with
    /// zeroed price fields.
    pub fn project(&self, card: &Card) -> Option<CardWithPrice> {
        let category = self.category(card.category_id)?;
        let latest = self.latest_price(card.id);
        Some(CardWithPrice {
            card: card.clone(),
            current_price: latest.as_ref().map_or(0.0, |t| t.price),
            price_change: latest.as_ref().map_or(0.0, |t| t.market_change_or_zero()),
            percent_change: latest.as_ref().map_or(0.0, |t| t.percent_change_or_zero()),
            category: category.clone(),
        })
    }

    /// Like `project`, but a missing card or category is an error —
    /// used by favorites/recently-viewed where the stored row vouches
    /// for the reference.
    fn project_strict(&self, card_id: u32) -> Result<CardWithPrice, CoreError> {
        let card = self
            .card(card_id)
            .ok_or_else(|| CoreError::Inconsistent(format!("Card not found: {card_id}")))?;
        self.project(card).ok_or_else(|| {
            CoreError::Inconsistent(format!(
                "Category not found: {} (card {card_id})",
                card.category_id
            ))
        })
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::new()
    }
}
