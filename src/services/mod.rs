/// Best-effort golf course lookup.
pub mod course_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Scramble round commands, one controller per user.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Background replay of completed games that failed to sync.
pub mod sync_supervisor;
