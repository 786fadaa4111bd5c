// HTTP handler bindings for the Oware game API
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Converting path parameters into the core's types
// - Extracting the Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use log::warn;
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket};
use serde_json::Value;

use crate::bot::Bot;
use crate::types::GameStateView;

/// GET / endpoint
/// Returns service metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// GET /get_game_state endpoint
/// Returns the whole game state; the winner field never mutates the game
#[get("/get_game_state")]
pub fn get_game_state(bot: &rocket::State<Bot>) -> Json<GameStateView> {
    Json(bot.state())
}

/// POST /start endpoint
#[post("/start")]
pub fn start(bot: &rocket::State<Bot>) -> Status {
    bot.start();
    Status::Ok
}

/// POST /switch endpoint
#[post("/switch")]
pub fn switch(bot: &rocket::State<Bot>) -> Status {
    bot.switch();
    Status::Ok
}

/// POST /undo endpoint
#[post("/undo")]
pub fn undo(bot: &rocket::State<Bot>) -> Json<bool> {
    Json(bot.undo())
}

/// POST /move/<house> endpoint
/// Plays a house for the player to move; false when the move is rejected
#[post("/move/<house>")]
pub fn make_move(bot: &rocket::State<Bot>, house: i64) -> Json<bool> {
    // Anything outside u8 is out of range anyway; 0 maps to the same error
    let house = u8::try_from(house).unwrap_or(0);
    Json(bot.make_move(house).is_ok())
}

/// POST /ai_move/<depth> endpoint
#[post("/ai_move/<depth>")]
pub async fn ai_move(bot: &rocket::State<Bot>, depth: i64) -> Json<bool> {
    let depth = if depth < 0 {
        warn!("Negative search depth {} requested", depth);
        return Json(false);
    } else if depth == 0 {
        warn!("Search depth 0 requested, need at least 1");
        return Json(false);
    } else {
        u8::try_from(depth).unwrap_or(u8::MAX)
    };

    Json(run_ai_move(bot, Some(depth)).await)
}

/// POST /ai_move endpoint
/// Uses the configured default depth
#[post("/ai_move")]
pub async fn ai_move_default(bot: &rocket::State<Bot>) -> Json<bool> {
    Json(run_ai_move(bot, None).await)
}

async fn run_ai_move(bot: &Bot, depth: Option<u8>) -> bool {
    match bot.ai_move(depth).await {
        Ok(_) => true,
        Err(e) => {
            warn!("AI move failed: {}", e);
            false
        }
    }
}

/// POST /get_winner endpoint
/// Decides the game and applies the end-of-game sweep when it is over
#[post("/get_winner")]
pub fn get_winner(bot: &rocket::State<Bot>) -> Json<Option<String>> {
    Json(bot.get_winner().as_api_str().map(String::from))
}

/// Builds the Rocket instance serving `bot`
pub fn build(bot: Bot) -> Rocket<Build> {
    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "oware-solver");
            })
        }))
        .mount(
            "/",
            routes![
                index,
                get_game_state,
                start,
                switch,
                undo,
                make_move,
                ai_move,
                ai_move_default,
                get_winner
            ],
        )
}
