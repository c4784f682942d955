use serde::{Deserialize, Serialize};

/// An account in the catalog. Created on registration, or implicitly on
/// the first interaction from an external chat client (see
/// `CardTracker::ensure_chat_user`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,

    /// Unique login name.
    pub username: String,

    /// Opaque credential — stored as-is, not security-relevant here.
    pub password: String,

    /// External chat identity (e.g., a messenger user id). Unique if present.
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Payload for creating a user; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}
