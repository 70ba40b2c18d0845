//! Game-related HTTP routes.
//!
//! Thin adapters only: handlers parse the request, call a service
//! function, and serialize its snapshot or translate its `DomainError`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::deck::DeckType;
use crate::domain::game::{GameType, DEFAULT_MAX_PLAYERS};
use crate::domain::player::PlayerId;
use crate::domain::snapshot::GameSnapshot;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::registry::CreateGameOptions;
use crate::services::game_flow;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreateGameRequest {
    game_type: GameType,
    deck_type: Option<DeckType>,
    #[serde(default = "default_deck_count")]
    deck_count: usize,
    #[serde(default = "default_max_players")]
    max_players: usize,
}

fn default_deck_count() -> usize {
    1
}

fn default_max_players() -> usize {
    DEFAULT_MAX_PLAYERS
}

impl CreateGameRequest {
    fn into_options(self) -> CreateGameOptions {
        // Glitchjack plays over a glitch composition unless the request
        // says otherwise.
        let deck_type = self.deck_type.unwrap_or(match self.game_type {
            GameType::Glitchjack => DeckType::Glitch,
            _ => DeckType::Standard,
        });
        CreateGameOptions {
            game_type: self.game_type,
            deck_type,
            deck_count: self.deck_count.max(1),
            max_players: self.max_players.max(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JoinGameRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlayerActionRequest {
    player_id: String,
}

#[derive(Debug, Deserialize)]
struct CardRef {
    rank: Rank,
    suit: Suit,
}

#[derive(Debug, Deserialize)]
struct CribDiscardRequest {
    player_id: String,
    cards: Vec<CardRef>,
}

#[derive(Debug, Deserialize)]
struct CleanupRequest {
    max_age_secs: i64,
}

#[derive(Debug, Deserialize)]
struct DealRequest {
    #[serde(default = "default_deal_count")]
    count: usize,
}

fn default_deal_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct DealToPlayerRequest {
    #[serde(default = "default_face_up")]
    face_up: bool,
}

fn default_face_up() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ResetDeckRequest {
    deck_count: Option<usize>,
    deck_type: Option<DeckType>,
}

#[derive(serde::Serialize)]
struct JoinGameResponse {
    player_id: PlayerId,
    game: GameSnapshot,
}

#[derive(serde::Serialize)]
struct HitResponse {
    card: Card,
    game: GameSnapshot,
}

#[derive(serde::Serialize)]
struct CutResponse {
    starter: Card,
    game: GameSnapshot,
}

#[derive(serde::Serialize)]
struct CleanupResponse {
    removed: usize,
}

#[derive(serde::Serialize)]
struct DealResponse {
    cards: Vec<Card>,
    game: GameSnapshot,
}

fn parse_player_id(raw: &str) -> Result<PlayerId, AppError> {
    raw.parse().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidPlayerId,
            format!("not a player id: {raw}"),
        )
    })
}

/// POST /api/games
async fn create_game(
    app_state: web::Data<AppState>,
    body: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    let snapshot = game_flow::create_game(app_state.registry(), body.into_inner().into_options());
    Ok(HttpResponse::Created().json(snapshot))
}

/// GET /api/games
async fn list_games(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(game_flow::list_games(app_state.registry())))
}

/// GET /api/games/{game_id}
async fn get_game(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = game_flow::get_game(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// DELETE /api/games/{game_id}
async fn delete_game(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    game_flow::delete_game(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/games/{game_id}/players
async fn join_game(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<JoinGameRequest>,
) -> Result<HttpResponse, AppError> {
    let (player_id, game) = game_flow::join_game(
        app_state.registry(),
        path.into_inner(),
        body.into_inner().name,
    )?;
    Ok(HttpResponse::Created().json(JoinGameResponse { player_id, game }))
}

/// DELETE /api/games/{game_id}/players/{player_id}
async fn leave_game(
    app_state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (game_id, raw_player) = path.into_inner();
    let player = parse_player_id(&raw_player)?;
    let snapshot = game_flow::leave_game(app_state.registry(), game_id, player)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/games/{game_id}/start
async fn start_game(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = game_flow::start_game(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/games/{game_id}/hit
async fn hit(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PlayerActionRequest>,
) -> Result<HttpResponse, AppError> {
    let player = parse_player_id(&body.player_id)?;
    let (card, game) = game_flow::hit(app_state.registry(), path.into_inner(), player)?;
    Ok(HttpResponse::Ok().json(HitResponse { card, game }))
}

/// POST /api/games/{game_id}/stand
async fn stand(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PlayerActionRequest>,
) -> Result<HttpResponse, AppError> {
    let player = parse_player_id(&body.player_id)?;
    let snapshot = game_flow::stand(app_state.registry(), path.into_inner(), player)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /api/games/{game_id}/results
async fn results(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let results = game_flow::game_results(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(results))
}

/// POST /api/games/{game_id}/crib/discard
async fn crib_discard(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CribDiscardRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let player = parse_player_id(&body.player_id)?;
    let cards: Vec<(Rank, Suit)> = body.cards.iter().map(|c| (c.rank, c.suit)).collect();
    let snapshot =
        game_flow::crib_discard(app_state.registry(), path.into_inner(), player, &cards)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/games/{game_id}/crib/cut
async fn crib_cut(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let (starter, game) = game_flow::crib_cut(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(CutResponse { starter, game }))
}

/// POST /api/games/{game_id}/deal
async fn deal_cards(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<DealRequest>,
) -> Result<HttpResponse, AppError> {
    let (cards, game) =
        game_flow::deal_cards(app_state.registry(), path.into_inner(), body.count)?;
    Ok(HttpResponse::Ok().json(DealResponse { cards, game }))
}

/// POST /api/games/{game_id}/players/{player_id}/deal
async fn deal_to_player(
    app_state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    body: web::Json<DealToPlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let (game_id, raw_player) = path.into_inner();
    let player = parse_player_id(&raw_player)?;
    let (card, game) =
        game_flow::deal_to_player(app_state.registry(), game_id, player, body.face_up)?;
    Ok(HttpResponse::Ok().json(HitResponse { card, game }))
}

/// POST /api/games/{game_id}/deck/shuffle
async fn shuffle_deck(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = game_flow::shuffle_deck(app_state.registry(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/games/{game_id}/deck/reset
async fn reset_deck(
    app_state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ResetDeckRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let snapshot = game_flow::reset_deck(
        app_state.registry(),
        path.into_inner(),
        body.deck_count,
        body.deck_type,
    )?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /api/games/{game_id}/piles/{key}
async fn get_pile(
    app_state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (game_id, key) = path.into_inner();
    let pile = game_flow::get_discard_pile(app_state.registry(), game_id, &key)?;
    Ok(HttpResponse::Ok().json(pile))
}

/// POST /api/games/{game_id}/piles/{key}
async fn add_to_pile(
    app_state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    body: web::Json<CardRef>,
) -> Result<HttpResponse, AppError> {
    let (game_id, key) = path.into_inner();
    let snapshot =
        game_flow::add_to_discard_pile(app_state.registry(), game_id, &key, body.rank, body.suit)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /api/games/cleanup
async fn cleanup(
    app_state: web::Data<AppState>,
    body: web::Json<CleanupRequest>,
) -> Result<HttpResponse, AppError> {
    let max_age_secs = body.max_age_secs;
    if max_age_secs < 0 {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "max_age_secs must be non-negative".to_string(),
        ));
    }
    let removed = game_flow::cleanup_old_games(
        app_state.registry(),
        time::Duration::seconds(max_age_secs),
    );
    Ok(HttpResponse::Ok().json(CleanupResponse { removed }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_game))
            .route(web::get().to(list_games)),
    );
    cfg.service(web::resource("/cleanup").route(web::post().to(cleanup)));
    cfg.service(
        web::resource("/{game_id}")
            .route(web::get().to(get_game))
            .route(web::delete().to(delete_game)),
    );
    cfg.service(web::resource("/{game_id}/players").route(web::post().to(join_game)));
    cfg.service(
        web::resource("/{game_id}/players/{player_id}").route(web::delete().to(leave_game)),
    );
    cfg.service(
        web::resource("/{game_id}/players/{player_id}/deal").route(web::post().to(deal_to_player)),
    );
    cfg.service(web::resource("/{game_id}/start").route(web::post().to(start_game)));
    cfg.service(web::resource("/{game_id}/hit").route(web::post().to(hit)));
    cfg.service(web::resource("/{game_id}/stand").route(web::post().to(stand)));
    cfg.service(web::resource("/{game_id}/results").route(web::get().to(results)));
    cfg.service(web::resource("/{game_id}/deal").route(web::post().to(deal_cards)));
    cfg.service(web::resource("/{game_id}/deck/shuffle").route(web::post().to(shuffle_deck)));
    cfg.service(web::resource("/{game_id}/deck/reset").route(web::post().to(reset_deck)));
    cfg.service(
        web::resource("/{game_id}/piles/{key}")
            .route(web::get().to(get_pile))
            .route(web::post().to(add_to_pile)),
    );
    cfg.service(web::resource("/{game_id}/crib/discard").route(web::post().to(crib_discard)));
    cfg.service(web::resource("/{game_id}/crib/cut").route(web::post().to(crib_cut)));
}
