mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::TestApp;

#[actix_rt::test]
async fn test_health_check() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["services"]["database"]["status"], json!("ok"));
    assert_eq!(
        body["services"]["database"]["details"],
        json!("Connected to memory store")
    );
}

#[actix_rt::test]
async fn test_destinations_create_list_and_get() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/destinations")
        .set_json(json!({
            "name": "Lisbon",
            "description": "Hills and trams",
            "bestTime": "Spring",
            "basePrice": 180.0
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["data"]["rating"], json!(0.0));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    test_app.seed_destination("Reykjavik", 320.0).await;

    let req = test::TestRequest::get().uri("/api/destinations").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Lisbon", "Reykjavik"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/destinations/{}", id))
        .to_request();
    let one: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(one["data"]["basePrice"], json!(180.0));
    assert_eq!(one["data"]["bestTime"], json!("Spring"));
}

#[actix_rt::test]
async fn test_destination_validation_and_missing_ids() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/destinations")
        .set_json(json!({ "name": "Nowhere", "basePrice": -5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/destinations")
        .set_json(json!({ "id": "65f1c0ffee0000000000abcd", "name": "Ghost", "basePrice": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/destinations/65f1c0ffee0000000000abcd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_register_login_and_list_users() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "correct horse"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["user"]["role"], json!("user"));
    assert!(registered["user"].get("passwordHash").is_none());
    let user_id = registered["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada again",
            "email": "ada@example.com",
            "password": "other"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Email already exists"));

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
        .to_request();
    let logged_in: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(logged_in["user"]["id"], json!(user_id));

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user_id))
        .to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["data"]["email"], json!("ada@example.com"));

    let req = test::TestRequest::get().uri("/api/users/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_messages_are_returned_in_chronological_order() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for (user_id, text) in [("u-1", "first"), ("bot", "second"), ("u-1", "third")] {
        let req = test::TestRequest::post()
            .uri("/api/messages")
            .set_json(json!({ "userId": user_id, "messageText": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/messages?limit=2")
        .to_request();
    let recent: Value = test::call_and_read_body_json(&app, req).await;
    let messages = recent["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["messageText"], json!("second"));
    assert_eq!(messages[0]["messageType"], json!("bot"));
    assert_eq!(messages[0]["userName"], json!("TravelTime AI"));
    assert_eq!(messages[1]["messageText"], json!("third"));
    assert_eq!(messages[1]["userId"], json!("u-1"));

    let id = messages[1]["id"].as_str().unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/messages/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/messages/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_bad_query_string_answers_failure_json() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for uri in ["/api/messages?limit=-1", "/api/messages?limit=many"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("Query deserialize error"));
    }
}

#[actix_rt::test]
async fn test_empty_message_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(json!({ "userId": "u-1", "messageText": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_recommendations_filter_by_user() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for (user_id, destination) in [("u-1", "Kyoto"), ("u-2", "Lisbon"), ("u-1", "Cusco")] {
        let req = test::TestRequest::post()
            .uri("/api/recommendations")
            .set_json(json!({
                "userId": user_id,
                "destination": destination,
                "reason": "Matches your preferences"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/recommendations?user_id=u-1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let destinations: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["destination"].as_str().unwrap())
        .collect();
    assert_eq!(destinations, vec!["Cusco", "Kyoto"]);

    let req = test::TestRequest::get().uri("/api/recommendations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["rating"], json!(0.0));
}
