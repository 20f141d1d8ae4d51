use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use payment_api::domain::page::{Page, PageRequest};
use payment_api::domain::payment::{Amount, CreatePayment};
use payment_api::domain::user::{CreateUser, LoginRequest, User};
use payment_api::presentation::handlers::{AppState, configure_routes};
use payment_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};

const JWT_SECRET: &str = "test-secret-key-for-testing-only";

macro_rules! setup_test {
    () => {{
        let state = web::Data::new(AppState::in_memory(JWT_SECRET.to_string(), 3600));

        // Register a test user and log in
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "test123".to_string(),
        };
        state.user_service.create_user(create_user).await.unwrap();

        let login_req = LoginRequest {
            email: "test@example.com".to_string(),
            password: "test123".to_string(),
        };
        let token = state.auth_service.login(login_req).await.unwrap().token;

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(JWT_SECRET.to_string()))
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(configure_routes),
        )
        .await;

        (app, state, token)
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

async fn seed_users(state: &AppState, count: u32) {
    for i in 0..count {
        state
            .user_service
            .create_user(CreateUser {
                email: format!("seed{}@example.com", i),
                first_name: format!("Seed{}", i),
                last_name: "User".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
    }
}

#[actix_web::test]
async fn test_health_is_public() {
    let (app, _state, _token) = setup_test!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-response-time"));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_list_users_requires_token() {
    let (app, _state, _token) = setup_test!();

    let req = test::TestRequest::get().uri("/api/v1/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(bearer("not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["message"], "Invalid or expired token");
}

#[actix_web::test]
async fn test_list_users_paginates() {
    let (app, state, token) = setup_test!();
    seed_users(&state, 4).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users?page=1&size=2")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;

    let users = body["_embedded"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], 3);
    assert_eq!(users[1]["id"], 4);
    assert!(users[0].get("passwordHash").is_none());
    assert!(
        users[0]["_links"]["self"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users/3")
    );

    assert_eq!(body["page"]["size"], 2);
    assert_eq!(body["page"]["totalElements"], 5);
    assert_eq!(body["page"]["totalPages"], 3);
    assert_eq!(body["page"]["number"], 1);
    assert!(
        body["_links"]["next"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users?page=2&size=2")
    );
    assert!(
        body["_links"]["prev"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users?page=0&size=2")
    );
}

#[actix_web::test]
async fn test_list_users_clamps_page_size() {
    let (app, state, token) = setup_test!();
    seed_users(&state, 3).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users?size=1000")
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["page"]["size"], 100);
    assert_eq!(body["_embedded"]["users"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_list_users_rejects_bad_query() {
    let (app, _state, token) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/v1/users?page=-1")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_user_and_not_found() {
    let (app, _state, token) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/v1/users/1")
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["email"], "test@example.com");
    assert!(
        body["_links"]["payments"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users/1/payments")
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/users/99")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_user_payments_only_returns_owned_payments() {
    let (app, state, token) = setup_test!();
    seed_users(&state, 7).await;

    // users 7 and 8 both pay, interleaved
    for i in 0..6u64 {
        let user_id = if i % 2 == 0 { 7 } else { 8 };
        let req = test::TestRequest::post()
            .uri("/api/v1/payments")
            .insert_header(bearer(&token))
            .set_json(&CreatePayment {
                user_id,
                cost: Amount::new(100 * (i + 1)),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/users/7/payments?page=0&size=2")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;

    let payments = body["_embedded"]["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p["userId"] == 7));
    assert_eq!(body["page"]["totalElements"], 3);

    let links = &body["_links"];
    assert!(links["users"]["href"].as_str().unwrap().ends_with("/api/v1/users"));
    assert!(links["create"]["href"].as_str().unwrap().ends_with("/api/v1/payments"));
    assert!(
        links["next"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users/7/payments?page=1&size=2")
    );
}

#[actix_web::test]
async fn test_listing_does_not_mutate_store() {
    let (app, state, token) = setup_test!();
    state
        .payment_service
        .create_payment(CreatePayment {
            user_id: 1,
            cost: Amount::new(42),
        })
        .await
        .unwrap();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/v1/users/1/payments")
            .insert_header(bearer(&token))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["page"]["totalElements"], 1);
}

#[actix_web::test]
async fn test_listing_users_does_not_mutate_store() {
    let (app, state, token) = setup_test!();
    seed_users(&state, 2).await;
    let before = state
        .user_service
        .find_all_users(PageRequest::default())
        .await
        .unwrap();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&token))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["page"]["totalElements"], 3);
    assert_eq!(bodies[1]["page"]["totalElements"], 3);

    let after = state
        .user_service
        .find_all_users(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(after.total_elements, before.total_elements);
    let ids = |page: &Page<User>| {
        page.content.iter().map(|u| u.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&after), ids(&before));
}

#[actix_web::test]
async fn test_user_payments_rejects_non_positive_user_id() {
    let (app, _state, token) = setup_test!();

    for uri in ["/api/v1/users/0/payments", "/api/v1/users/abc/payments"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_web::test]
async fn test_user_payments_empty_for_user_without_payments() {
    let (app, _state, token) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/v1/users/1/payments")
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["_embedded"]["payments"], serde_json::json!([]));
    assert_eq!(body["page"]["totalPages"], 0);
}

#[actix_web::test]
async fn test_create_and_get_payment() {
    let (app, _state, token) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .insert_header(bearer(&token))
        .set_json(&CreatePayment {
            user_id: 1,
            cost: Amount::new(1999),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["cost"], 1999);
    let payment_id = created["id"].as_u64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/payments/{}", payment_id))
        .insert_header(bearer(&token))
        .to_request();
    let fetched: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["userId"], 1);
    assert!(
        fetched["_links"]["user"]["href"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/users/1")
    );

    // the owner's representation now embeds the payment
    let req = test::TestRequest::get()
        .uri("/api/v1/users/1")
        .insert_header(bearer(&token))
        .to_request();
    let user: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["payments"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_create_payment_validation_and_missing_user() {
    let (app, _state, token) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .insert_header(bearer(&token))
        .set_json(&CreatePayment {
            user_id: 1,
            cost: Amount::new(0),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .insert_header(bearer(&token))
        .set_json(&CreatePayment {
            user_id: 404,
            cost: Amount::new(10),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/payments/12345")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
