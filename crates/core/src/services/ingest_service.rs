use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::price::NewPriceTick;
use crate::providers::traits::CardSource;
use crate::store::CardStore;

/// Days of synthetic history appended behind a freshly ingested card.
const BACKFILL_DAYS: i64 = 30;

/// Daily multiplicative fluctuation bound for backfilled ticks (±5%).
const BACKFILL_SPREAD: f64 = 0.05;

/// The most recent days of the backfill trend toward the current price.
const TREND_WINDOW_DAYS: i64 = 10;

/// Fluctuation bound for the periodic refresh pass (±3%).
const REFRESH_SPREAD: f64 = 0.03;

/// Populates the store from card sources and keeps prices moving.
///
/// Randomness comes in through a caller-supplied `Rng`, so tests can seed
/// a `StdRng` and get deterministic histories.
pub struct IngestService;

impl IngestService {
    pub fn new() -> Self {
        Self
    }

    /// Run one source against the store.
    ///
    /// Fetched records already present in the source's category (exact
    /// case-insensitive name match) are skipped. New cards get an initial
    /// tick from the source's best upstream price, followed by ~30 days
    /// of backfilled history. Returns the number of cards created.
    pub async fn run_source<R: Rng>(
        &self,
        store: &mut CardStore,
        source: &dyn CardSource,
        rng: &mut R,
    ) -> Result<usize, CoreError> {
        let category = store
            .category_by_code(source.category_code())
            .cloned()
            .ok_or_else(|| CoreError::CategoryNotFound(source.category_code().to_string()))?;

        let records = source.fetch_cards().await?;
        let mut created = 0;

        for record in records {
            let name_lower = record.name.to_lowercase();
            let exists = store
                .cards()
                .any(|c| c.category_id == category.id && c.name.to_lowercase() == name_lower);
            if exists {
                debug!(source = source.name(), card = %record.name, "already ingested, skipping");
                continue;
            }

            let price = record.price;
            let card = store.create_card(record.into_new_card(category.id));
            created += 1;

            match price {
                Some(price) if price > 0.0 => {
                    store.add_price(NewPriceTick {
                        card_id: card.id,
                        price,
                        timestamp: None,
                        source: Some(source.name().to_string()),
                        market_change: Some(0.0),
                        percent_change: Some(0.0),
                    });
                    self.backfill_history(store, card.id, price, rng);
                }
                _ => {
                    debug!(source = source.name(), card = %card.name, "no usable upstream price");
                }
            }
        }

        info!(
            source = source.name(),
            category = %category.code,
            cards = created,
            "source ingested"
        );
        Ok(created)
    }

    /// Synthesize `BACKFILL_DAYS` of history behind `current_price`.
    ///
    /// Each day fluctuates by up to ±5%; days inside the trend window are
    /// biased so the series drifts toward the current price. After
    /// generation, every tick's deltas are recomputed against its
    /// immediate predecessor (the oldest tick keeps zeros).
    pub fn backfill_history<R: Rng>(
        &self,
        store: &mut CardStore,
        card_id: u32,
        current_price: f64,
        rng: &mut R,
    ) {
        let now = Utc::now();
        let mut points: Vec<(DateTime<Utc>, f64)> = Vec::with_capacity(BACKFILL_DAYS as usize);

        for days_ago in (1..=BACKFILL_DAYS).rev() {
            let fluctuation = rng.gen_range(-BACKFILL_SPREAD..BACKFILL_SPREAD);
            let factor = if days_ago > TREND_WINDOW_DAYS {
                1.0 - fluctuation
            } else {
                1.0 + fluctuation
            };
            let age = (BACKFILL_DAYS - days_ago) as f64;
            let price = current_price * factor.powf(age / 5.0);
            points.push((now - Duration::days(days_ago), price));
        }

        let mut prev: Option<f64> = None;
        for (timestamp, price) in points {
            let (market_change, percent_change) = match prev {
                Some(p) => (price - p, (price - p) / p * 100.0),
                None => (0.0, 0.0),
            };
            store.add_price(NewPriceTick {
                card_id,
                price,
                timestamp: Some(timestamp),
                source: Some("simulated data".to_string()),
                market_change: Some(market_change),
                percent_change: Some(percent_change),
            });
            prev = Some(price);
        }
    }

    /// One refresh pass: every card with a latest price gets a new tick
    /// fluctuated by up to ±3%, with deltas computed against the previous
    /// latest. This is the system's only "live" price movement.
    pub fn refresh_all<R: Rng>(&self, store: &mut CardStore, rng: &mut R) -> usize {
        let card_ids: Vec<u32> = store.cards().map(|c| c.id).collect();
        let mut refreshed = 0;

        for card_id in card_ids {
            let Some(latest) = store.latest_price(card_id) else {
                continue;
            };
            let fluctuation = rng.gen_range(-REFRESH_SPREAD..REFRESH_SPREAD);
            let new_price = latest.price * (1.0 + fluctuation);
            let market_change = new_price - latest.price;
            let percent_change = market_change / latest.price * 100.0;

            store.add_price(NewPriceTick {
                card_id,
                price: new_price,
                timestamp: None,
                source: Some("price update".to_string()),
                market_change: Some(market_change),
                percent_change: Some(percent_change),
            });
            refreshed += 1;
        }

        debug!(ticks = refreshed, "price refresh pass complete");
        refreshed
    }
}

impl Default for IngestService {
    fn default() -> Self {
        Self::new()
    }
}
