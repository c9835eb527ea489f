pub mod controller;
pub mod game;
pub mod outbox;
pub mod state_machine;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{course_catalog::CourseCatalog, game_store::GameStore},
    state::{controller::GameController, outbox::SyncOutbox},
};

/// Shared handle on [`AppState`] given to every handler.
pub type SharedState = Arc<AppState>;

/// Controller of one user, locked for the duration of each command.
pub type SharedController = Arc<Mutex<GameController>>;

/// Central application state: collaborators, sync outbox and per-user controllers.
pub struct AppState {
    config: AppConfig,
    game_store: Arc<dyn GameStore>,
    courses: Option<Arc<dyn CourseCatalog>>,
    outbox: Arc<SyncOutbox>,
    controllers: DashMap<Uuid, SharedController>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        game_store: Arc<dyn GameStore>,
        courses: Option<Arc<dyn CourseCatalog>>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            game_store,
            courses,
            outbox: Arc::new(SyncOutbox::new()),
            controllers: DashMap::new(),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store used for every game.
    pub fn game_store(&self) -> Arc<dyn GameStore> {
        self.game_store.clone()
    }

    /// Course catalog, when course lookup is configured.
    pub fn courses(&self) -> Option<Arc<dyn CourseCatalog>> {
        self.courses.clone()
    }

    /// Completed games waiting for a successful write.
    pub fn outbox(&self) -> &Arc<SyncOutbox> {
        &self.outbox
    }

    /// Controller for `user_id`, created on first use.
    pub fn controller(&self, user_id: Uuid) -> SharedController {
        self.controllers
            .entry(user_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(GameController::new(
                    user_id,
                    self.game_store.clone(),
                    self.outbox.clone(),
                    self.config,
                )))
            })
            .clone()
    }

    /// Drop the controller of `user_id` when it holds no session and no
    /// request is using it. The next command starts from a fresh one.
    pub fn release_controller(&self, user_id: Uuid) {
        let released = self.controllers.remove_if(&user_id, |_, controller| {
            Arc::strong_count(controller) == 1
                && controller
                    .try_lock()
                    .is_ok_and(|controller| controller.active().is_none())
        });
        if released.is_some() {
            debug!(%user_id, "idle controller released");
        }
    }

    /// Number of users with a live controller.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }
}
