//! JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Binds 0.0.0.0:8080 unless HOST / PORT say otherwise; RUST_LOG sets the log filter (default info).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use dart_bracket::{
    generate_bracket, player_to_throw, read_roster, GameMatch, LegId, MatchId, PlayerId, Slot,
    ThrowId, TournamentConfig, TournamentError, TournamentFormat, TournamentId, TournamentStore,
    Turn,
};
use serde::{Deserialize, Serialize};

type AppState = Data<TournamentStore>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ImportRosterBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    /// CSV with a `name` column and an optional `seed` column.
    roster_csv: String,
}

#[derive(Deserialize)]
struct ThrowBody {
    player_id: PlayerId,
    score: u32,
    #[serde(default)]
    darts: Vec<u32>,
}

#[derive(Deserialize)]
struct PlayerBody {
    player_id: PlayerId,
}

/// Match plus whose turn it is in the open leg.
#[derive(Serialize)]
struct MatchView {
    #[serde(flatten)]
    game: GameMatch,
    to_throw: Option<Slot>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct LegPath {
    id: LegId,
}

#[derive(Deserialize)]
struct ThrowPath {
    id: ThrowId,
}

/// Map engine errors onto status codes; the body carries the message.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Validation(_) => HttpResponse::BadRequest().json(body),
        TournamentError::NotFound { .. } => HttpResponse::NotFound().json(body),
        TournamentError::State { .. } => HttpResponse::BadRequest().json(body),
        TournamentError::Conflict { .. } => HttpResponse::Conflict().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::debug!("Request failed: {}", e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-bracket",
    })
}

/// Static double-elimination topology (no players attached).
#[get("/api/bracket")]
async fn api_bracket() -> HttpResponse {
    HttpResponse::Ok().json(generate_bracket())
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.list())
}

/// Create a tournament from its configuration; players are seeded in the order given.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentConfig>) -> HttpResponse {
    respond(state.create(body.into_inner()))
}

/// Create a tournament from a CSV roster, with default match rules.
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, body: Json<ImportRosterBody>) -> HttpResponse {
    let body = body.into_inner();
    let result = read_roster(body.roster_csv.as_bytes())
        .and_then(|names| state.create(TournamentConfig::new(body.name, body.format, names)));
    respond(result)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.get(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.delete(path.id).map(|()| serde_json::json!({ "success": true })))
}

/// Start the tournament (Setup -> Active): instantiate the bracket and activate the first match.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.start_tournament(path.id))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(state.get_match(path.id).map(|game| MatchView {
        to_throw: player_to_throw(&game),
        game,
    }))
}

/// Record one turn for a player in an active match.
#[post("/api/matches/{id}/throw")]
async fn api_record_throw(state: AppState, path: Path<MatchPath>, body: Json<ThrowBody>) -> HttpResponse {
    let body = body.into_inner();
    let turn = Turn {
        player: body.player_id,
        score: body.score,
        darts: body.darts,
    };
    respond(state.record_turn(path.id, turn))
}

/// Route a completed match's players onward (normally triggered by the winning throw).
#[post("/api/matches/{id}/complete")]
async fn api_complete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(state.complete_match_progression(path.id))
}

/// Enter a result without scoring (walkover).
#[post("/api/matches/{id}/winner")]
async fn api_declare_winner(state: AppState, path: Path<MatchPath>, body: Json<PlayerBody>) -> HttpResponse {
    respond(state.declare_winner(path.id, body.player_id))
}

/// Operator activation of a pending match; 409 while another match is on the board.
#[post("/api/matches/{id}/activate")]
async fn api_activate_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(state.activate_match(path.id).and_then(|()| state.get_match(path.id)))
}

#[put("/api/matches/{id}/starting-player")]
async fn api_set_starting_player(state: AppState, path: Path<MatchPath>, body: Json<PlayerBody>) -> HttpResponse {
    respond(state.set_starting_player(path.id, body.player_id))
}

/// Undo the most recent throw of a leg.
#[post("/api/legs/{id}/undo")]
async fn api_undo_last_throw(state: AppState, path: Path<LegPath>) -> HttpResponse {
    respond(state.undo_last_throw(path.id))
}

/// Delete a throw by id (only the most recent one of its leg).
#[delete("/api/throws/{id}")]
async fn api_delete_throw(state: AppState, path: Path<ThrowPath>) -> HttpResponse {
    respond(state.undo_throw(path.id))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TournamentStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_bracket)
            .service(api_list_tournaments)
            .service(api_import_tournament)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_start_tournament)
            .service(api_get_match)
            .service(api_record_throw)
            .service(api_complete_match)
            .service(api_declare_winner)
            .service(api_activate_match)
            .service(api_set_starting_player)
            .service(api_undo_last_throw)
            .service(api_delete_throw)
    })
    .bind(bind)?
    .run()
    .await
}
