use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A "recently viewed" entry. At most one per (user_id, card_id): viewing
/// a card again removes the old entry and inserts a fresh one, so the card
/// bumps back to the top of the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentlyViewed {
    pub id: u32,
    pub user_id: u32,
    pub card_id: u32,
    pub viewed_at: DateTime<Utc>,
}
