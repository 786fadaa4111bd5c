//! HTTP API Tests
//!
//! Drives the Rocket routes through a local blocking client, the same way
//! the browser UI calls them: move, then switch; undo without switching.

use oware_solver::bot::Bot;
use oware_solver::config::Config;
use oware_solver::handler;
use oware_solver::types::{GameStateView, Player};
use rocket::http::Status;
use rocket::local::blocking::Client;

fn client() -> Client {
    let mut config = Config::default_hardcoded();
    config.game.random_start = false;
    config.search.default_depth = 3;
    Client::tracked(handler::build(Bot::new(config))).expect("valid rocket instance")
}

fn state(client: &Client) -> GameStateView {
    let response = client.get("/get_game_state").dispatch();
    assert_eq!(response.status(), Status::Ok);
    response.into_json().expect("game state JSON")
}

fn post_bool(client: &Client, uri: &str) -> bool {
    let response = client.post(uri).dispatch();
    assert_eq!(response.status(), Status::Ok);
    response.into_json().expect("boolean JSON")
}

#[test]
fn test_index_and_server_header() {
    let client = client();
    let response = client.get("/").dispatch();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("Server"), Some("oware-solver"));
    let body: serde_json::Value = response.into_json().unwrap();
    assert_eq!(body["game"], "oware");
}

#[test]
fn test_initial_state() {
    let client = client();
    let view = state(&client);

    assert_eq!(view.board, vec![4; 12]);
    assert_eq!(view.top, 0);
    assert_eq!(view.bottom, 0);
    assert_eq!(view.player, Player::Bottom);
    assert_eq!(view.history_length, 0);
    assert_eq!(view.winner, None);
}

#[test]
fn test_move_switch_undo_cycle() {
    let client = client();

    assert!(post_bool(&client, "/move/3"));
    assert_eq!(client.post("/switch").dispatch().status(), Status::Ok);

    let view = state(&client);
    assert_eq!(view.board, vec![4, 4, 0, 5, 5, 5, 5, 4, 4, 4, 4, 4]);
    assert_eq!(view.player, Player::Top);
    assert_eq!(view.history_length, 1);

    assert!(post_bool(&client, "/undo"));
    let view = state(&client);
    assert_eq!(view.board, vec![4; 12]);
    assert_eq!(view.player, Player::Bottom, "undo restores the mover");

    assert!(!post_bool(&client, "/undo"));
}

#[test]
fn test_rejected_moves_return_false() {
    let client = client();

    assert!(!post_bool(&client, "/move/0"));
    assert!(!post_bool(&client, "/move/7"));
    assert!(!post_bool(&client, "/move/-2"));
    assert!(!post_bool(&client, "/move/100000"));
    assert_eq!(state(&client).history_length, 0);
}

#[test]
fn test_ai_move_plays_and_switches() {
    let client = client();

    assert!(post_bool(&client, "/ai_move/2"));
    let view = state(&client);
    assert_eq!(view.history_length, 1);
    assert_eq!(view.player, Player::Top);

    assert!(post_bool(&client, "/ai_move"));
    let view = state(&client);
    assert_eq!(view.history_length, 2);
    assert_eq!(view.player, Player::Bottom);
    assert_eq!(view.board.iter().sum::<u32>() + view.top + view.bottom, 48);
}

#[test]
fn test_negative_ai_depth_is_rejected() {
    let client = client();
    assert!(!post_bool(&client, "/ai_move/-1"));
    assert_eq!(state(&client).history_length, 0);
}

#[test]
fn test_zero_ai_depth_is_rejected() {
    let client = client();
    assert!(!post_bool(&client, "/ai_move/0"));
    assert_eq!(state(&client).history_length, 0);
    assert_eq!(state(&client).player, Player::Bottom);
}

#[test]
fn test_start_resets_game() {
    let client = client();
    assert!(post_bool(&client, "/move/1"));

    assert_eq!(client.post("/start").dispatch().status(), Status::Ok);
    let view = state(&client);
    assert_eq!(view.board, vec![4; 12]);
    assert_eq!(view.history_length, 0);
}

#[test]
fn test_get_winner_while_ongoing() {
    let client = client();
    let response = client.post("/get_winner").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let winner: Option<String> = response.into_json().unwrap();
    assert_eq!(winner, None);
}
