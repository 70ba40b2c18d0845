//! Transport-layer tests: handlers translate core outcomes into status
//! codes and problem details, nothing more.

use actix_web::{test, web, App};
use backend::routes;
use backend::state::app_state::AppState;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_player_name;
use serde_json::{json, Value};

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn create_and_fetch_a_game() {
    let state = AppState::new();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({"game_type": "blackjack", "deck_count": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "waiting");
    assert_eq!(created["remaining_cards"], 104);

    let id = created["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn unknown_games_are_problem_details_404s() {
    let state = AppState::new();
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/games/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    assert_problem_details(status, &body, "GAME_NOT_FOUND", 404, None);
}

#[actix_web::test]
async fn acting_in_the_wrong_phase_is_a_409() {
    let state = AppState::new();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({"game_type": "blackjack"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{id}/players"))
        .set_json(json!({"name": unique_player_name()}))
        .to_request();
    let joined: Value = test::call_and_read_body_json(&app, req).await;
    let player_id = joined["player_id"].as_str().unwrap().to_string();

    // Hit before the deal: phase mismatch.
    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{id}/hit"))
        .set_json(json!({"player_id": player_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    assert_problem_details(status, &body, "PHASE_MISMATCH", 409, None);
}

#[actix_web::test]
async fn a_full_blackjack_round_over_http() {
    let state = AppState::new();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({"game_type": "blackjack"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{id}/players"))
        .set_json(json!({"name": "Alice"}))
        .to_request();
    let joined: Value = test::call_and_read_body_json(&app, req).await;
    let player_id = joined["player_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{id}/start"))
        .to_request();
    let started: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["status"], "in_progress");
    assert_eq!(started["remaining_cards"], 48);
    // The hole card is present but unnamed.
    assert_eq!(started["dealer"]["hand"][0]["face_up"], false);
    assert!(started["dealer"]["hand"][0].get("rank").is_none());

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{id}/stand"))
        .set_json(json!({"player_id": player_id}))
        .to_request();
    let finished: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(finished["status"], "finished");

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{id}/results"))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(results["kind"], "outcomes");
    let outcome = results["data"][0]["outcome"].as_str().unwrap();
    assert!(["bust", "blackjack", "win", "push", "lose"].contains(&outcome));
}

#[actix_web::test]
async fn deleting_a_game_frees_its_identifier() {
    let state = AppState::new();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({"game_type": "cribbage"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/games/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/games/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn cleanup_reports_the_number_of_games_removed() {
    let state = AppState::new();
    let app = test_app!(state);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({"game_type": "blackjack"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    // A generous max age keeps the fresh games alive.
    let req = test::TestRequest::post()
        .uri("/api/games/cleanup")
        .set_json(json!({"max_age_secs": 3600}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["removed"], 0);

    let req = test::TestRequest::get().uri("/api/games").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);
}
