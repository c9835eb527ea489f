/// Golf course lookup through the third-party course API.
pub mod course_catalog;
/// Game, roster and hole-score persistence.
pub mod game_store;
/// Persistence row definitions.
pub mod models;
/// Storage abstraction layer shared by every remote collaborator.
pub mod storage;
