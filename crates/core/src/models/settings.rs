use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Library configuration supplied by the embedding process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Optional API keys for upstream card sources that accept one.
    /// Keys: source name (e.g., "pokemon_tcg"). Values: the key string.
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
        }
    }
}
