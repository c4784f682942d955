pub mod errors;
pub mod models;
pub mod providers;
pub mod refresher;
pub mod services;
pub mod store;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;

use errors::CoreError;
use models::{
    card::{Card, CardPatch, NewCard},
    category::{CardCategory, NewCategory},
    favorite::Favorite,
    price::{NewPriceTick, PriceTick},
    projection::{CardWithDetails, CardWithPrice, MarketTrend},
    settings::Settings,
    user::{NewUser, User},
    viewed::RecentlyViewed,
};
use providers::registry::CardSourceRegistry;
use providers::traits::CardSource;
use services::{ingest_service::IngestService, trend_service::TrendService};
use store::CardStore;

pub use refresher::spawn_price_refresher;

/// Default number of cards returned per category listing.
const DEFAULT_CATEGORY_LIMIT: usize = 10;

/// Default number of rows in a trend ranking.
const DEFAULT_TREND_LIMIT: usize = 3;

/// Default price-history window in days.
const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Default number of recently-viewed entries returned.
const DEFAULT_VIEWED_LIMIT: usize = 5;

/// Placeholder credential for accounts created through a chat client.
const CHAT_PLACEHOLDER_PASSWORD: &str = "chat_auth";

/// Main entry point for the card-market core library.
///
/// Holds the in-memory store and all services needed to operate on it.
/// Constructed once at process start and passed by reference to the
/// consuming layers (HTTP handlers, a chat bot, the refresher task) —
/// there is no hidden global instance, which also makes tests trivial to
/// isolate. On a multi-threaded runtime, wrap it in
/// `Arc<tokio::sync::Mutex<_>>` (see `spawn_price_refresher`).
#[must_use]
pub struct CardTracker {
    store: CardStore,
    registry: CardSourceRegistry,
    trend_service: TrendService,
    ingest_service: IngestService,
    settings: Settings,
    rng: StdRng,
}

impl std::fmt::Debug for CardTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardTracker")
            .field("cards", &self.store.card_count())
            .field("categories", &self.store.categories().len())
            .field("sources", &self.registry.sources().len())
            .finish()
    }
}

impl CardTracker {
    /// Create a tracker with default settings and the default sources.
    /// The store starts with the four seeded categories and no cards.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a tracker with explicit settings (API keys feed the
    /// default source registry).
    pub fn with_settings(settings: Settings) -> Self {
        let registry = CardSourceRegistry::new_with_defaults(&settings.api_keys);
        Self::build(settings, registry, StdRng::from_entropy())
    }

    /// Create a tracker with a custom source registry. Useful for
    /// embedding with extra franchises or for tests with mock sources.
    pub fn with_registry(settings: Settings, registry: CardSourceRegistry) -> Self {
        Self::build(settings, registry, StdRng::from_entropy())
    }

    /// Like `with_registry`, but with a seeded RNG so backfilled history
    /// and refresh jitter are deterministic.
    pub fn with_registry_seeded(
        settings: Settings,
        registry: CardSourceRegistry,
        seed: u64,
    ) -> Self {
        Self::build(settings, registry, StdRng::seed_from_u64(seed))
    }

    fn build(settings: Settings, registry: CardSourceRegistry, rng: StdRng) -> Self {
        Self {
            store: CardStore::new(),
            registry,
            trend_service: TrendService::new(),
            ingest_service: IngestService::new(),
            settings,
            rng,
        }
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    // ── Categories ──────────────────────────────────────────────────

    /// All categories in insertion order.
    #[must_use]
    pub fn categories(&self) -> Vec<&CardCategory> {
        self.store.categories()
    }

    #[must_use]
    pub fn category(&self, id: u32) -> Option<&CardCategory> {
        self.store.category(id)
    }

    #[must_use]
    pub fn category_by_code(&self, code: &str) -> Option<&CardCategory> {
        self.store.category_by_code(code)
    }

    pub fn create_category(&mut self, new: NewCategory) -> CardCategory {
        self.store.create_category(new)
    }

    // ── Cards ───────────────────────────────────────────────────────

    #[must_use]
    pub fn card(&self, id: u32) -> Option<&Card> {
        self.store.card(id)
    }

    pub fn create_card(&mut self, new: NewCard) -> Card {
        self.store.create_card(new)
    }

    pub fn update_card(&mut self, id: u32, patch: CardPatch) -> Result<Card, CoreError> {
        self.store.update_card(id, patch)
    }

    /// Case-insensitive substring search, optionally narrowed to one
    /// category. An empty query matches every card.
    #[must_use]
    pub fn search_cards(&self, query: &str, category_id: Option<u32>) -> Vec<CardWithPrice> {
        self.store.search_cards(query, category_id)
    }

    /// Cards in a category, insertion order, truncated to `limit`
    /// (default 10).
    #[must_use]
    pub fn cards_by_category(
        &self,
        category_id: u32,
        limit: Option<usize>,
    ) -> Vec<CardWithPrice> {
        self.store
            .cards_by_category(category_id, limit.unwrap_or(DEFAULT_CATEGORY_LIMIT))
    }

    /// Full detail projection. Not-found covers a missing card, a card
    /// without price ticks, and a card whose category has vanished.
    pub fn card_details(&self, card_id: u32) -> Result<CardWithDetails, CoreError> {
        self.store
            .card_details(card_id)
            .ok_or(CoreError::CardNotFound(card_id))
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// The tick with the maximum timestamp for a card.
    pub fn latest_price(&self, card_id: u32) -> Result<PriceTick, CoreError> {
        self.store
            .latest_price(card_id)
            .ok_or(CoreError::PriceNotAvailable(card_id))
    }

    /// Price history over the last `days` days (default 30), ascending
    /// by timestamp. `days <= 0` returns the full history.
    #[must_use]
    pub fn price_history(&self, card_id: u32, days: Option<i64>) -> Vec<PriceTick> {
        self.store
            .price_history(card_id, days.unwrap_or(DEFAULT_HISTORY_DAYS))
    }

    /// Append a price tick (timestamp defaults to now).
    pub fn add_price(&mut self, new: NewPriceTick) -> PriceTick {
        self.store.add_price(new)
    }

    // ── Market trends ───────────────────────────────────────────────

    /// Cards ranked by percent change, best first (default top 3).
    #[must_use]
    pub fn top_gainers(&self, limit: Option<usize>) -> Vec<MarketTrend> {
        self.trend_service
            .top_gainers(&self.store, limit.unwrap_or(DEFAULT_TREND_LIMIT))
    }

    /// Cards ranked by percent change, worst first (default top 3).
    #[must_use]
    pub fn top_fallers(&self, limit: Option<usize>) -> Vec<MarketTrend> {
        self.trend_service
            .top_fallers(&self.store, limit.unwrap_or(DEFAULT_TREND_LIMIT))
    }

    /// Cards ranked by view count (default top 3). Zero-view cards are
    /// never returned.
    #[must_use]
    pub fn most_viewed(&self, limit: Option<usize>) -> Vec<MarketTrend> {
        self.trend_service
            .most_viewed(&self.store, limit.unwrap_or(DEFAULT_TREND_LIMIT))
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// A user's watchlist projected to `CardWithPrice`.
    pub fn favorites(&self, user_id: u32) -> Result<Vec<CardWithPrice>, CoreError> {
        self.store.favorites(user_id)
    }

    /// Add to the watchlist; idempotent for an existing (user, card)
    /// pair.
    pub fn add_favorite(&mut self, user_id: u32, card_id: u32) -> Favorite {
        self.store.add_favorite(user_id, card_id)
    }

    /// Remove from the watchlist; not-found when no such entry exists.
    pub fn remove_favorite(&mut self, user_id: u32, card_id: u32) -> Result<(), CoreError> {
        self.store.remove_favorite(user_id, card_id)
    }

    #[must_use]
    pub fn is_favorite(&self, user_id: u32, card_id: u32) -> bool {
        self.store.is_favorite(user_id, card_id)
    }

    // ── Recently viewed ─────────────────────────────────────────────

    /// The user's most recent views, newest first (default 5).
    pub fn recently_viewed(
        &self,
        user_id: u32,
        limit: Option<usize>,
    ) -> Result<Vec<CardWithPrice>, CoreError> {
        self.store
            .recently_viewed(user_id, limit.unwrap_or(DEFAULT_VIEWED_LIMIT))
    }

    /// Record a view; a repeat view bumps the card to the top.
    pub fn add_recently_viewed(&mut self, user_id: u32, card_id: u32) -> RecentlyViewed {
        self.store.add_recently_viewed(user_id, card_id)
    }

    // ── Users ───────────────────────────────────────────────────────

    pub fn create_user(&mut self, new: NewUser) -> Result<User, CoreError> {
        self.store.create_user(new)
    }

    #[must_use]
    pub fn user(&self, id: u32) -> Option<&User> {
        self.store.user(id)
    }

    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.store.user_by_username(username)
    }

    #[must_use]
    pub fn user_by_chat_id(&self, chat_id: &str) -> Option<&User> {
        self.store.user_by_chat_id(chat_id)
    }

    /// Look up the account behind an external chat identity, creating
    /// one on first contact (the chat layer has no registration step).
    pub fn ensure_chat_user(
        &mut self,
        chat_id: &str,
        username_hint: Option<&str>,
    ) -> Result<User, CoreError> {
        if let Some(user) = self.store.user_by_chat_id(chat_id) {
            return Ok(user.clone());
        }
        let username = username_hint
            .map(str::to_string)
            .unwrap_or_else(|| format!("user_{chat_id}"));
        self.store.create_user(NewUser {
            username,
            password: CHAT_PLACEHOLDER_PASSWORD.to_string(),
            chat_id: Some(chat_id.to_string()),
        })
    }

    // ── Ingestion ───────────────────────────────────────────────────

    /// Run every registered source against the store, in registration
    /// order. The first failing source aborts the run with its error —
    /// there is no partial-success reporting. Returns the total number
    /// of cards created.
    pub async fn initialize_data(&mut self) -> Result<usize, CoreError> {
        let mut total = 0;
        for source in self.registry.sources() {
            match self
                .ingest_service
                .run_source(&mut self.store, source.as_ref(), &mut self.rng)
                .await
            {
                Ok(created) => total += created,
                Err(e) => {
                    error!(source = source.name(), error = %e, "source ingestion failed");
                    return Err(e);
                }
            }
        }
        Ok(total)
    }

    /// One refresh pass over all cards (±3% fluctuation on the latest
    /// price). Returns the number of ticks appended.
    pub fn refresh_prices(&mut self) -> usize {
        self.ingest_service.refresh_all(&mut self.store, &mut self.rng)
    }

    /// Register an additional card source.
    pub fn register_source(&mut self, source: Box<dyn CardSource>) {
        self.registry.register(source);
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set an API key for a source (e.g., "pokemon_tcg").
    /// Rebuilds the source registry so the new key takes effect
    /// immediately.
    pub fn set_api_key(&mut self, source: String, key: String) {
        self.settings.api_keys.insert(source, key);
        self.registry = CardSourceRegistry::new_with_defaults(&self.settings.api_keys);
    }

    /// Remove an API key for a source.
    /// Rebuilds the source registry so the removal takes effect
    /// immediately.
    pub fn remove_api_key(&mut self, source: &str) -> bool {
        let removed = self.settings.api_keys.remove(source).is_some();
        if removed {
            self.registry = CardSourceRegistry::new_with_defaults(&self.settings.api_keys);
        }
        removed
    }
}

impl Default for CardTracker {
    fn default() -> Self {
        Self::new()
    }
}
