use std::collections::HashMap;

use super::pokemon_tcg::PokemonTcgSource;
use super::samples::SampleSource;
use super::traits::CardSource;
use super::ygoprodeck::YgoProDeckSource;

/// Registry of all card ingestion sources, one per franchise.
///
/// Sources run in registration order during `initialize_data`. New
/// franchises are added by registering another `CardSource` — nothing
/// else changes.
pub struct CardSourceRegistry {
    sources: Vec<Box<dyn CardSource>>,
}

impl CardSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry with all default sources pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Pokémon TCG — API key optional, raises the rate limit
        registry.register(Box::new(PokemonTcgSource::new(
            api_keys.get("pokemon_tcg").cloned(),
        )));

        // YGOPRODeck — no API key needed
        registry.register(Box::new(YgoProDeckSource::new()));

        // No freely usable upstream for MTG/Topps — synthetic sets
        registry.register(Box::new(SampleSource::mtg()));
        registry.register(Box::new(SampleSource::topps()));

        registry
    }

    /// Register a new card source.
    pub fn register(&mut self, source: Box<dyn CardSource>) {
        self.sources.push(source);
    }

    /// All sources in registration order.
    pub fn sources(&self) -> &[Box<dyn CardSource>] {
        &self.sources
    }

    /// Find the source that populates a given category code.
    pub fn source_for_code(&self, code: &str) -> Option<&dyn CardSource> {
        self.sources
            .iter()
            .find(|s| s.category_code() == code)
            .map(|s| s.as_ref())
    }
}

impl Default for CardSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
