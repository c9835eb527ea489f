use axum::Router;

use crate::state::SharedState;

pub mod course;
pub mod docs;
pub mod game;
pub mod health;
pub mod identity;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game::router())
        .merge(course::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, routes::identity::USER_ID_HEADER,
        state::AppState,
    };

    fn app() -> Router<()> {
        router(AppState::new(
            AppConfig::default(),
            Arc::new(MemoryGameStore::new()),
            None,
        ))
    }

    async fn send(app: &Router<()>, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, user: Uuid, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, user.to_string())
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let request = Request::get("/healthcheck").body(Body::empty()).unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "pending_syncs": 0 }));
    }

    #[tokio::test]
    async fn game_routes_need_a_user() {
        let request = Request::get("/games/active").body(Body::empty()).unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].as_str().unwrap().contains(USER_ID_HEADER));
    }

    #[tokio::test]
    async fn round_over_http() {
        let app = app();
        let user = Uuid::new_v4();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/games",
                user,
                json!({
                    "course_name": "Muirfield",
                    "total_holes": 1,
                    "hole_pars": [3],
                    "players": [{ "name": "Ana", "kind": "host" }, { "name": "Bo" }]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sync"]["state"], "synced");
        assert_eq!(body["game"]["current_hole"], 1);
        let bo = body["game"]["players"][1]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            json_request("POST", "/games/active/advance", user, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            json_request("POST", "/games/active/strokes", user, json!({ "player_id": bo })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stroke"]["sequence_number"], 1);

        let (status, body) = send(
            &app,
            json_request("POST", "/games/active/advance", user, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["finished"], true);

        let (status, body) = send(
            &app,
            json_request("POST", "/games/active/complete", user, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["holes"][0]["label"], "hole_in_one");
        assert_eq!(body["summary"]["relative_to_par"], -2);

        let request = Request::get("/games/history")
            .header(USER_ID_HEADER, user.to_string())
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn games_are_scoped_to_their_owner() {
        let app = app();
        let owner = Uuid::new_v4();
        let (_, body) = send(
            &app,
            json_request(
                "POST",
                "/games",
                owner,
                json!({
                    "course_name": "Carnoustie",
                    "total_holes": 9,
                    "players": [{ "name": "Ana", "kind": "host" }, { "name": "Bo" }]
                }),
            ),
        )
        .await;
        let game_id = body["game"]["id"].as_str().unwrap().to_string();
        let uri = format!("/games/{game_id}");

        let (status, _) = send(&app, json_request("DELETE", &uri, Uuid::new_v4(), Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, json_request("GET", &uri, Uuid::new_v4(), Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, json_request("GET", &uri, owner, Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["course_name"], "Carnoustie");
        assert!(body["completed_at"].is_null());

        let (status, _) = send(&app, json_request("DELETE", &uri, owner, Value::Null)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, json_request("GET", "/games/active", owner, Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn draft_round_trip_over_http() {
        let app = app();
        let user = Uuid::new_v4();

        let (status, _) = send(&app, json_request("GET", "/games/draft", user, Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            json_request("PUT", "/games/draft", user, json!({ "game_data": "not a form" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                "/games/draft",
                user,
                json!({ "game_data": { "courseName": "Troon" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, json_request("GET", "/games/draft", user, Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["game_data"]["courseName"], "Troon");

        let (status, _) = send(&app, json_request("DELETE", "/games/draft", user, Value::Null)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, json_request("GET", "/games/draft", user, Value::Null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_setup_is_a_bad_request() {
        let (status, _) = send(
            &app(),
            json_request(
                "POST",
                "/games",
                Uuid::new_v4(),
                json!({ "course_name": "", "players": [{ "name": "Solo", "kind": "host" }] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_course_search_is_empty() {
        let request = Request::get("/courses/search?query=ab").body(Body::empty()).unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
