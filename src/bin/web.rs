//! Web server for division brackets: REST API over the bracket library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, REGENERATE_ON_REGISTER (default true), BRACKET_SEED (optional u64).

use actix_web::{
    delete, get, middleware, patch, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::Utc;
use division_bracket_web::{
    apply_match_update, create_match, delete_match, division_bracket, edit_participant,
    generate_bracket, register_participant, remove_participant, BracketError, BracketStore,
    Config, Division, MatchId, MatchPatch, MemoryStore, NewMatch, NewParticipant, ParticipantId,
    ParticipantPatch,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::RwLock;

/// Everything a request can touch: the store plus the shuffle source.
struct BracketState {
    store: MemoryStore,
    rng: StdRng,
    regenerate_on_register: bool,
}

/// Writers hold the lock for a whole operation, so a regeneration or an
/// advancement is never observed half-done.
type AppState = Data<RwLock<BracketState>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    timestamp: String,
    version: &'static str,
}

/// Path segment: division key (e.g. /api/matches/elite)
#[derive(Deserialize)]
struct DivisionPath {
    division: Division,
}

#[derive(Deserialize)]
struct ParticipantPath {
    id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        e if e.is_not_found() => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "division-bracket-web",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[get("/api/participants")]
async fn api_list_participants(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.all_participants() {
        Ok(participants) => HttpResponse::Ok().json(participants),
        Err(e) => error_response(&e),
    }
}

#[get("/api/participants/division/{division}")]
async fn api_division_participants(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.list_participants(path.division) {
        Ok(participants) => HttpResponse::Ok().json(participants),
        Err(e) => error_response(&e),
    }
}

/// Register a participant; regenerates the division bracket when enabled.
#[post("/api/participants")]
async fn api_register_participant(state: AppState, body: Json<NewParticipant>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let BracketState {
        store,
        rng,
        regenerate_on_register,
    } = &mut *g;
    match register_participant(store, rng, body.into_inner(), *regenerate_on_register) {
        Ok(participant) => HttpResponse::Created().json(participant),
        Err(e) => error_response(&e),
    }
}

#[patch("/api/participants/{id}")]
async fn api_edit_participant(
    state: AppState,
    path: Path<ParticipantPath>,
    body: Json<ParticipantPatch>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match edit_participant(&mut g.store, path.id, &body) {
        Ok(participant) => HttpResponse::Ok().json(participant),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/participants/{id}")]
async fn api_remove_participant(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match remove_participant(&mut g.store, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches")]
async fn api_list_matches(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.all_matches() {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{division}")]
async fn api_division_matches(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.list_matches(path.division) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<NewMatch>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match create_match(&mut g.store, body.into_inner()) {
        Ok(m) => HttpResponse::Created().json(m),
        Err(e) => error_response(&e),
    }
}

/// Update a match. Sending `{"status": "completed", "winner_id": ...}` reports
/// the result and advances the winner.
#[patch("/api/matches/{id}")]
async fn api_update_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchPatch>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match apply_match_update(&mut g.store, path.id, &body) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match delete_match(&mut g.store, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// (Re)generate a division's bracket. With fewer than 2 participants the
/// existing matches are returned unchanged.
#[post("/api/matches/generate/{division}")]
async fn api_generate_bracket(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let BracketState { store, rng, .. } = &mut *g;
    match generate_bracket(store, rng, path.division) {
        Ok(outcome) => HttpResponse::Ok().json(outcome.into_matches()),
        Err(e) => error_response(&e),
    }
}

/// Matches grouped by round, with the champion once the final is played.
#[get("/api/brackets/{division}")]
async fn api_division_bracket(state: AppState, path: Path<DivisionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match division_bracket(&g.store, path.division) {
        Ok(bracket) => HttpResponse::Ok().json(bracket),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let rng = match config.shuffle_seed {
        Some(seed) => {
            log::info!("Using fixed bracket seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    if !config.regenerate_on_register {
        log::info!("Brackets are only regenerated on explicit request");
    }

    let state = Data::new(RwLock::new(BracketState {
        store: MemoryStore::new(),
        rng,
        regenerate_on_register: config.regenerate_on_register,
    }));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .service(api_health)
            .service(api_list_participants)
            .service(api_division_participants)
            .service(api_register_participant)
            .service(api_edit_participant)
            .service(api_remove_participant)
            .service(api_list_matches)
            .service(api_generate_bracket)
            .service(api_division_matches)
            .service(api_create_match)
            .service(api_update_match)
            .service(api_delete_match)
            .service(api_division_bracket)
    })
    .bind(bind)?
    .run()
    .await
}
