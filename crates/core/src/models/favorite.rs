use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's watchlist entry. At most one per (user_id, card_id) — the
/// store enforces this at the add boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u32,
    pub user_id: u32,
    pub card_id: u32,
    pub added_at: DateTime<Utc>,
}
