use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::ai::LlmProvider;
use crate::errors::ManagerError;
use crate::game_manager::GameManager;
use game_types::{CreateGameRequest, ErrorResponse, GameId, PlayerAction, PlayerId};

pub mod ai;
pub mod commit;
pub mod config;
pub mod errors;
pub mod game_manager;

pub const PLAYER_HEADER: &str = "x-player-id";

#[derive(Deserialize)]
struct ListGamesQuery {
    player: PlayerId,
}

pub fn create_routes(
    game_manager: Arc<GameManager>,
    llm_provider: Arc<LlmProvider>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let llm_filter = warp::any().map({
        let llm_provider = llm_provider.clone();
        move || llm_provider.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let models = warp::path("models")
        .and(warp::get())
        .and(llm_filter)
        .and_then(handle_models_request);

    let create_game = warp::path!("games")
        .and(warp::post())
        .and(warp::body::json::<CreateGameRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_create_game);

    let list_games = warp::path!("games")
        .and(warp::get())
        .and(warp::query::<ListGamesQuery>())
        .and(game_manager_filter.clone())
        .and_then(handle_list_games);

    let game_view = warp::path!("games" / Uuid)
        .and(warp::get())
        .and(warp::header::optional::<Uuid>(PLAYER_HEADER))
        .and(game_manager_filter.clone())
        .and_then(handle_game_view);

    let submit_action = warp::path!("games" / Uuid / "actions")
        .and(warp::post())
        .and(warp::header::<Uuid>(PLAYER_HEADER))
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_submit_action);

    let tick = warp::path!("games" / Uuid / "tick")
        .and(warp::post())
        .and(warp::header::optional::<Uuid>(PLAYER_HEADER))
        .and(game_manager_filter.clone())
        .and_then(handle_tick);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", PLAYER_HEADER])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(models)
        .or(create_game)
        .or(list_games)
        .or(game_view)
        .or(submit_action)
        .or(tick)
        .with(cors)
        .with(warp::log("spymaster_arena"))
}

fn error_reply(err: &ManagerError) -> warp::reply::WithStatus<warp::reply::Json> {
    if err.status().is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: err.to_string(),
            retryable: err.is_retryable(),
        }),
        err.status(),
    )
}

fn reply_with<T: serde::Serialize>(
    result: Result<T, ManagerError>,
    success: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Json> {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), success),
        Err(err) => error_reply(&err),
    }
}

async fn handle_models_request(
    llm_provider: Arc<LlmProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let models = llm_provider.list_models().await;
    Ok(warp::reply::with_status(
        warp::reply::json(&models),
        StatusCode::OK,
    ))
}

async fn handle_create_game(
    request: CreateGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply_with(
        game_manager.create_game(request.seats).await,
        StatusCode::CREATED,
    ))
}

async fn handle_list_games(
    query: ListGamesQuery,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply_with(
        game_manager.list_games(query.player).await,
        StatusCode::OK,
    ))
}

async fn handle_game_view(
    game_id: GameId,
    viewer: Option<PlayerId>,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply_with(
        game_manager.get_view(game_id, viewer).await,
        StatusCode::OK,
    ))
}

async fn handle_submit_action(
    game_id: GameId,
    player_id: PlayerId,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply_with(
        game_manager.submit_action(game_id, player_id, action).await,
        StatusCode::OK,
    ))
}

async fn handle_tick(
    game_id: GameId,
    viewer: Option<PlayerId>,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply_with(
        game_manager.poll(game_id, viewer).await,
        StatusCode::OK,
    ))
}
