/// Score persistence backends and the trait they implement.
pub mod score_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
