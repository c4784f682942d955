pub mod ingest_service;
pub mod trend_service;
