use crate::models::projection::MarketTrend;
use crate::store::CardStore;

/// Produces the three market-trend views: top gainers, top fallers and
/// most viewed.
///
/// Pure business logic — no I/O, no randomness. Easy to test.
pub struct TrendService;

impl TrendService {
    pub fn new() -> Self {
        Self
    }

    /// Cards ranked by percent change, best first. Ties keep insertion
    /// order (stable sort over the id-ordered card map).
    pub fn top_gainers(&self, store: &CardStore, limit: usize) -> Vec<MarketTrend> {
        let mut trends = self.all_trends(store);
        trends.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));
        trends.truncate(limit);
        trends
    }

    /// Cards ranked by percent change, worst first. Same tiebreak as
    /// `top_gainers`.
    pub fn top_fallers(&self, store: &CardStore, limit: usize) -> Vec<MarketTrend> {
        let mut trends = self.all_trends(store);
        trends.sort_by(|a, b| a.percent_change.total_cmp(&b.percent_change));
        trends.truncate(limit);
        trends
    }

    /// Cards ranked by view count across all users' recently-viewed
    /// lists. A card with zero views is never returned, whatever the
    /// limit. Count ties break by ascending card id.
    ///
    /// The ranking is cut to `limit` ids first; ids that then fail to
    /// project (vanished card, no price, missing category) are dropped,
    /// so the result may be shorter than `limit`.
    pub fn most_viewed(&self, store: &CardStore, limit: usize) -> Vec<MarketTrend> {
        let mut ranked: Vec<(u32, u32)> = store.view_counts().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .filter_map(|(card_id, count)| {
                let mut trend = self.trend_for(store, card_id)?;
                trend.view_count = Some(count);
                Some(trend)
            })
            .collect()
    }

    /// Every card that projects to a trend row, in insertion order.
    /// Cards lacking a price tick or a category record are discarded.
    fn all_trends(&self, store: &CardStore) -> Vec<MarketTrend> {
        store
            .cards()
            .filter_map(|card| self.trend_for(store, card.id))
            .collect()
    }

    fn trend_for(&self, store: &CardStore, card_id: u32) -> Option<MarketTrend> {
        let card = store.card(card_id)?;
        let latest = store.latest_price(card_id)?;
        let category = store.category(card.category_id)?;
        Some(MarketTrend {
            card_id: card.id,
            name: card.name.clone(),
            category_id: card.category_id,
            category_name: category.name.clone(),
            current_price: latest.price,
            price_change: latest.market_change_or_zero(),
            percent_change: latest.percent_change_or_zero(),
            view_count: None,
        })
    }
}

impl Default for TrendService {
    fn default() -> Self {
        Self::new()
    }
}
