use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use common::games::snake::{Direction, GameSnapshot, GameStatus};
use common::id_generator::generate_game_id;
use common::{GameId, log, log_warn};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::game_registry::{GameRegistry, RegistryError};
use crate::record_store::{GameRecord, RecordStore};
use crate::server_config::MAX_LEADERBOARD_LIMIT;

const CREATE_GAME_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct WebServerState {
    pub registry: GameRegistry,
    pub records: Arc<dyn RecordStore>,
    pub leaderboard_default_limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "game not found"),
            RegistryError::GameEnded(_) => {
                Self::new(StatusCode::NOT_FOUND, "game not found or already ended")
            }
            RegistryError::AlreadyExists(_) => Self::new(StatusCode::CONFLICT, "game already exists"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveRecordRequest {
    #[serde(rename = "playerName", default)]
    pub player_name: String,
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

pub fn build_router(state: WebServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/game", post(create_game))
        .route("/api/game/{id}", get(get_game))
        .route("/api/game/{id}/direction", post(update_direction))
        .route("/api/game/{id}/record", post(save_record))
        .route("/api/leaderboard", get(leaderboard))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(
    state: WebServerState,
    bind_address: &str,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    log!("Web server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

async fn create_game(State(state): State<WebServerState>) -> Result<Json<GameSnapshot>, ApiError> {
    let mut last_error = None;
    for _ in 0..CREATE_GAME_ATTEMPTS {
        let id = generate_game_id(Local::now());
        match state.registry.create_game(id).await {
            Ok(snapshot) => return Ok(Json(snapshot)),
            Err(err) => last_error = Some(err),
        }
    }

    let err = last_error.map(ApiError::from).unwrap_or_else(|| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to create game")
    });
    log_warn!("Failed to create game: {}", err.message);
    Err(err)
}

async fn get_game(
    State(state): State<WebServerState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let snapshot = state.registry.get_game(&GameId::new(id)).await?;
    Ok(Json(snapshot))
}

async fn update_direction(
    State(state): State<WebServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessBody>, ApiError> {
    let direction = parse_direction_body(&body).inspect_err(|err| {
        log!("[game:{}] rejected direction update: {}", id, err.message);
    })?;

    state
        .registry
        .update_direction(&GameId::new(id), direction)
        .await?;

    Ok(Json(SuccessBody {
        success: "direction updated".to_string(),
    }))
}

/// Accepts `{"direction": "up"}`; the capitalised key is also tolerated.
fn parse_direction_body(body: &[u8]) -> Result<Direction, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::bad_request("invalid request body"))?;

    let raw = value
        .get("direction")
        .or_else(|| value.get("Direction"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing direction field"))?;

    raw.parse::<Direction>()
        .map_err(|_| ApiError::bad_request("invalid direction"))
}

async fn save_record(
    State(state): State<WebServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessBody>, ApiError> {
    let request: SaveRecordRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("invalid request body"))?;

    let game_id = GameId::new(id);
    let game = state.registry.get_game(&game_id).await?;

    let record = GameRecord::new(&request.player_name, request.score, game.time, game.food_count);
    state.records.save(record).map_err(|err| {
        log_warn!("[game:{}] failed to save record: {}", game_id, err);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to save record")
    })?;

    if game.status == GameStatus::Ended {
        state.registry.remove_game(&game_id).await;
    }

    Ok(Json(SuccessBody {
        success: "record saved".to_string(),
    }))
}

async fn leaderboard(
    State(state): State<WebServerState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Json<Vec<GameRecord>> {
    let requested = match query {
        Ok(Query(query)) => query.limit,
        Err(rejection) => {
            log_warn!("Ignoring bad leaderboard query: {}", rejection.body_text());
            None
        }
    };
    let limit = requested
        .unwrap_or(state.leaderboard_default_limit)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    match state.records.top(limit) {
        Ok(records) => Json(records),
        Err(err) => {
            log_warn!("Failed to read leaderboard: {}", err);
            Json(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_registry::RegistrySettings;
    use crate::record_store::InMemoryRecordStore;
    use axum::body::to_bytes;
    use common::games::snake::SnakeGameSettings;
    use serde::de::DeserializeOwned;

    fn state() -> WebServerState {
        let registry = GameRegistry::new(RegistrySettings {
            game: SnakeGameSettings {
                wall_spawn_probability: 0.0,
                ..SnakeGameSettings::default()
            },
            rng_seed: Some(9),
            ..RegistrySettings::default()
        });
        WebServerState {
            registry,
            records: Arc::new(InMemoryRecordStore::new()),
            leaderboard_default_limit: 10,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> (StatusCode, T) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn create(state: &WebServerState) -> GameSnapshot {
        let response = create_game(State(state.clone())).await.into_response();
        let (status, snapshot) = read_json::<GameSnapshot>(response).await;
        assert_eq!(status, StatusCode::OK);
        snapshot
    }

    #[test]
    fn test_parse_direction_body() {
        assert_eq!(parse_direction_body(br#"{"direction":"up"}"#).unwrap(), Direction::Up);
        assert_eq!(parse_direction_body(br#"{"Direction":"left"}"#).unwrap(), Direction::Left);
        assert!(parse_direction_body(br#"{"direction":"sideways"}"#).is_err());
        assert!(parse_direction_body(br#"{"direction":""}"#).is_err());
        assert!(parse_direction_body(br#"{}"#).is_err());
        assert!(parse_direction_body(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = state();
        let created = create(&state).await;
        assert_eq!(created.status, GameStatus::Running);

        let response = get_game(State(state.clone()), Path(created.id.clone()))
            .await
            .into_response();
        let (status, fetched) = read_json::<GameSnapshot>(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_get_missing_game_is_404() {
        let state = state();
        let response = get_game(State(state), Path("nope".to_string()))
            .await
            .into_response();
        let (status, body) = read_json::<ErrorBody>(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "game not found");
    }

    #[tokio::test]
    async fn test_direction_update() {
        let state = state();
        let created = create(&state).await;

        let response = update_direction(
            State(state.clone()),
            Path(created.id.clone()),
            Bytes::from_static(br#"{"direction":"down"}"#),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot = state.registry.get_game(&GameId::new(created.id)).await.unwrap();
        assert_eq!(snapshot.snake.direction, Direction::Down);
    }

    #[tokio::test]
    async fn test_direction_update_bad_input_is_400() {
        let state = state();
        let created = create(&state).await;

        let response = update_direction(
            State(state.clone()),
            Path(created.id),
            Bytes::from_static(br#"{"direction":"north"}"#),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_direction_update_unknown_game_is_404() {
        let state = state();
        let response = update_direction(
            State(state),
            Path("ghost".to_string()),
            Bytes::from_static(br#"{"direction":"up"}"#),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_record_and_leaderboard() {
        let state = state();
        let first = create(&state).await;
        let second = create(&state).await;

        for (game, name, score) in [(&first, "ann", 12), (&second, "bob", 40)] {
            let body = format!(r#"{{"playerName":"{}","score":{}}}"#, name, score);
            let response = save_record(State(state.clone()), Path(game.id.clone()), Bytes::from(body))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Running games stay registered after saving.
        assert!(state.registry.get_game(&GameId::new(first.id)).await.is_ok());

        let Json(records) = leaderboard(State(state.clone()), Ok(Query(LeaderboardQuery { limit: None }))).await;
        let names: Vec<&str> = records.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["bob", "ann"]);

        let Json(records) = leaderboard(State(state), Ok(Query(LeaderboardQuery { limit: Some(1) }))).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, 40);
    }

    #[tokio::test]
    async fn test_leaderboard_bad_limit_falls_back_to_default() {
        let state = WebServerState {
            leaderboard_default_limit: 2,
            ..state()
        };
        for (name, score) in [("ann", 5), ("bob", 30), ("cy", 20)] {
            state.records.save(GameRecord::new(name, score, 1, 0)).unwrap();
        }

        let uri: axum::http::Uri = "/api/leaderboard?limit=abc".parse().unwrap();
        let query = Query::<LeaderboardQuery>::try_from_uri(&uri);
        assert!(query.is_err());

        let response = leaderboard(State(state), query).await.into_response();
        let (status, records) = read_json::<Vec<GameRecord>>(response).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = records.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["bob", "cy"]);
    }

    #[tokio::test]
    async fn test_save_record_removes_ended_game() {
        let state = state();
        let created = create(&state).await;
        let id = GameId::new(created.id.clone());

        state
            .registry
            .update_direction(&id, Direction::Up)
            .await
            .unwrap();
        for i in 1..=20 {
            state
                .registry
                .tick_at(created.created_at + chrono::TimeDelta::milliseconds(100 * i))
                .await;
        }
        assert_eq!(state.registry.get_game(&id).await.unwrap().status, GameStatus::Ended);

        let response = save_record(
            State(state.clone()),
            Path(created.id),
            Bytes::from_static(br#"{"playerName":"cat","score":5}"#),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.registry.get_game(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_save_record_for_unknown_game_is_404() {
        let state = state();
        let response = save_record(
            State(state.clone()),
            Path("ghost".to_string()),
            Bytes::from_static(br#"{"playerName":"x","score":1}"#),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(state.records.top(10).unwrap().is_empty());
    }
}
