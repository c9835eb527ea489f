use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use tracing::debug;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{DraftGameRow, GamePlayerRow, GameRecord, GameRow, GameStatusUpdate, HoleScoreRow},
    storage::StorageResult,
};

use super::{
    config::RestConfig,
    error::{RestDaoError, RestResult},
    models::{
        DRAFTS_TABLE, EmbeddedGameRow, GAME_WITH_RELATIONS, GAMES_TABLE, HOLES_TABLE,
        PLAYERS_TABLE, PREFER_UPSERT, eq,
    },
};

/// [`GameStore`] backed by the hosted Postgres REST API.
#[derive(Clone)]
pub struct RestGameStore {
    client: Client,
    base_url: Arc<str>,
    api_key: Arc<str>,
    bearer: Arc<str>,
}

impl RestGameStore {
    /// Build a store for the configured project.
    pub fn connect(config: RestConfig) -> RestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RestDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(format!(
            "{}/rest/v1",
            config.base_url.trim_end_matches('/')
        ));
        let bearer = Arc::<str>::from(config.bearer());
        let api_key = Arc::<str>::from(config.api_key);

        Ok(Self {
            client,
            base_url,
            api_key,
            bearer,
        })
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, table);
        self.client
            .request(method, url)
            .header("apikey", self.api_key.as_ref())
            .bearer_auth(self.bearer.as_ref())
    }

    async fn send(&self, path: &str, builder: reqwest::RequestBuilder) -> RestResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| RestDaoError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RestDaoError::RequestStatus {
                path: path.to_string(),
                status,
                body,
            })
        }
    }

    async fn upsert<T>(&self, table: &str, rows: &[T], on_conflict: &str) -> RestResult<()>
    where
        T: Serialize,
    {
        if rows.is_empty() {
            return Ok(());
        }

        let builder = self
            .request(Method::POST, table)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", PREFER_UPSERT)
            .json(rows);
        self.send(table, builder).await?;
        Ok(())
    }

    async fn decode<T>(table: &str, response: Response) -> RestResult<T>
    where
        T: DeserializeOwned,
    {
        response
            .json::<T>()
            .await
            .map_err(|source| RestDaoError::DecodeResponse {
                path: table.to_string(),
                source,
            })
    }

    async fn select_games(&self, filters: Vec<(&'static str, String)>) -> RestResult<Vec<GameRecord>> {
        let mut query = vec![("select", GAME_WITH_RELATIONS.to_string())];
        query.extend(filters);
        query.push(("order", "created_at.desc".to_string()));

        let builder = self.request(Method::GET, GAMES_TABLE).query(&query);
        let response = self.send(GAMES_TABLE, builder).await?;
        let rows: Vec<EmbeddedGameRow> = Self::decode(GAMES_TABLE, response).await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl GameStore for RestGameStore {
    fn create_game(
        &self,
        header: GameRow,
        players: Vec<GamePlayerRow>,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move {
            let id = header.id;
            store.upsert(GAMES_TABLE, &[header], "id").await?;
            store.upsert(PLAYERS_TABLE, &players, "id").await?;
            debug!(game_id = %id, players = players.len(), "game header stored");
            Ok(id)
        })
    }

    fn upsert_hole_scores(
        &self,
        game_id: Uuid,
        rows: Vec<HoleScoreRow>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert(HOLES_TABLE, &rows, "game_id,hole_number")
                .await?;
            debug!(game_id = %game_id, holes = rows.len(), "hole scores stored");
            Ok(())
        })
    }

    fn update_game_status(
        &self,
        game_id: Uuid,
        update: GameStatusUpdate,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::PATCH, GAMES_TABLE)
                .query(&[("id", eq(game_id))])
                .header("Prefer", "return=minimal")
                .json(&update);
            store.send(GAMES_TABLE, builder).await?;
            Ok(())
        })
    }

    fn list_completed_games(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            let records = store
                .select_games(vec![
                    ("user_id", eq(user_id)),
                    ("completed_at", "not.is.null".to_string()),
                ])
                .await?;
            Ok(records)
        })
    }

    fn find_open_game(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            let records = store
                .select_games(vec![
                    ("user_id", eq(user_id)),
                    ("completed_at", "is.null".to_string()),
                    ("limit", "1".to_string()),
                ])
                .await?;
            Ok(records.into_iter().next())
        })
    }

    fn get_game(
        &self,
        user_id: Uuid,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            let records = store
                .select_games(vec![
                    ("id", eq(game_id)),
                    ("user_id", eq(user_id)),
                    ("limit", "1".to_string()),
                ])
                .await?;
            Ok(records.into_iter().next())
        })
    }

    fn delete_game(&self, user_id: Uuid, game_id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            // Players and hole scores go with it through cascading foreign keys.
            let builder = store
                .request(Method::DELETE, GAMES_TABLE)
                .query(&[("id", eq(game_id)), ("user_id", eq(user_id))])
                .query(&[("select", "id")])
                .header("Prefer", "return=representation");
            let response = store.send(GAMES_TABLE, builder).await?;
            let deleted: Vec<IgnoredAny> = Self::decode(GAMES_TABLE, response).await?;
            debug!(%game_id, deleted = deleted.len(), "game delete applied");
            Ok(!deleted.is_empty())
        })
    }

    fn fetch_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<DraftGameRow>>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store.request(Method::GET, DRAFTS_TABLE).query(&[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("order", "last_updated.desc".to_string()),
                ("limit", "1".to_string()),
            ]);
            let response = store.send(DRAFTS_TABLE, builder).await?;
            let rows: Vec<DraftGameRow> = Self::decode(DRAFTS_TABLE, response).await?;
            Ok(rows.into_iter().next())
        })
    }

    fn save_draft(&self, draft: DraftGameRow) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.upsert(DRAFTS_TABLE, &[draft], "user_id").await?;
            Ok(())
        })
    }

    fn clear_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::DELETE, DRAFTS_TABLE)
                .query(&[("user_id", eq(user_id))]);
            store.send(DRAFTS_TABLE, builder).await?;
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::GET, GAMES_TABLE)
                .query(&[("select", "id"), ("limit", "1")]);
            store.send(GAMES_TABLE, builder).await?;
            Ok(())
        })
    }
}
