use thiserror::Error;

/// Unified error type for the entire card-market-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The variants map onto the HTTP taxonomy an embedding server would use:
/// not-found variants → 404, `Validation` → 400, `Inconsistent` → 500,
/// `Api`/`Network` → upstream ingestion failures.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Not found ───────────────────────────────────────────────────
    #[error("Card not found: {0}")]
    CardNotFound(u32),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(u32),

    #[error("Favorite not found for user {user_id}, card {card_id}")]
    FavoriteNotFound { user_id: u32, card_id: u32 },

    #[error("No price data for card {0}")]
    PriceNotAvailable(u32),

    // ── Business logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored row references an entity that no longer exists
    /// (e.g., a favorite pointing at a vanished card).
    #[error("Store inconsistency: {0}")]
    Inconsistent(String),

    // ── Upstream APIs / Network ─────────────────────────────────────
    #[error("API error ({source_name}): {message}")]
    Api {
        source_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
