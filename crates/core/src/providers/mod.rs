pub mod registry;
pub mod traits;

// Card source implementations
pub mod pokemon_tcg;
pub mod samples;
pub mod ygoprodeck;
