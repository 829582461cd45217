// tests/progress_tests.rs

use std::sync::Arc;

use scholar_backend::{
    config::Config,
    routes,
    services::{auth::AuthService, progress::ProgressService},
    state::AppState,
    store::{SqliteStore, Store},
};
use sqlx::sqlite::SqlitePoolOptions;

/// Spawns the app on a random port with a throwaway SQLite database.
async fn spawn_app() -> String {
    let db_path = std::env::temp_dir().join(format!("scholar_test_{}.db", uuid::Uuid::new_v4()));
    let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to open test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        guest_jwt_expiration: 60,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        static_dir: None,
        demo_email: "demo@kenbright.com".to_string(),
        demo_password: "demo123".to_string(),
        rust_log: "error".to_string(),
        port: 0,
    };

    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool));
    let auth = Arc::new(AuthService::new(store.clone(), &config));
    let progress = Arc::new(ProgressService::new(store));

    auth.ensure_demo_account(&config.demo_password)
        .await
        .expect("Failed to seed demo account");

    let state = AppState {
        auth,
        progress,
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns their bearer token.
async fn register_and_get_token(client: &reqwest::Client, address: &str) -> String {
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);

    let body: serde_json::Value = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed")
        .json()
        .await
        .expect("Failed to parse register json");

    body["token"].as_str().expect("Token not found").to_string()
}

#[tokio::test]
async fn module_titles_are_public_and_complete() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // No Authorization header on purpose.
    let response = client
        .get(format!("{}/api/progress/modules/titles", address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let titles: serde_json::Value = response.json().await.unwrap();
    let map = titles.as_object().unwrap();
    assert_eq!(map.len(), 15);
    assert_eq!(
        map["1"],
        "Introduction & Fundamental Principles of IFRS 17"
    );
    assert_eq!(map["15"], "Case Studies and Practical Applications");
}

#[tokio::test]
async fn progress_endpoints_require_auth() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let overview = client
        .get(format!("{}/api/progress", address))
        .send()
        .await
        .unwrap();
    assert_eq!(overview.status().as_u16(), 401);

    let update = client
        .post(format!("{}/api/progress/1", address))
        .json(&serde_json::json!({ "progress": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 401);

    let assessment = client
        .post(format!("{}/api/progress/1/assessment", address))
        .json(&serde_json::json!({
            "score": 80, "totalQuestions": 10, "correctAnswers": 8
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(assessment.status().as_u16(), 401);
}

#[tokio::test]
async fn module_id_bounds_are_enforced_over_http() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_get_token(&client, &address).await;

    for (module_id, expected) in [(0, 400), (1, 200), (15, 200), (16, 400)] {
        let response = client
            .post(format!("{}/api/progress/{}", address, module_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({ "progress": 10, "score": 0, "timeSpent": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status().as_u16(),
            expected,
            "module id {}",
            module_id
        );
    }

    for (module_id, expected) in [(0, 400), (16, 400)] {
        let response = client
            .post(format!("{}/api/progress/{}/assessment", address, module_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "score": 80, "totalQuestions": 10, "correctAnswers": 8
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status().as_u16(),
            expected,
            "assessment module id {}",
            module_id
        );
    }
}

#[tokio::test]
async fn progress_is_monotone_and_time_accumulates() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_get_token(&client, &address).await;

    for (progress, time_spent) in [(40, 10), (30, 15)] {
        let response = client
            .post(format!("{}/api/progress/2", address))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "progress": progress, "score": 0, "timeSpent": time_spent
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let overview: serde_json::Value = client
        .get(format!("{}/api/progress", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let module = &overview["modules"][0];
    assert_eq!(module["module_id"], 2);
    assert_eq!(module["progress"], 40);
    assert_eq!(module["time_spent"], 25);
    assert_eq!(module["completed"], false);
}

#[tokio::test]
async fn assessment_always_completes_the_module() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_get_token(&client, &address).await;

    // No prior progress on module 5 at all.
    let response = client
        .post(format!("{}/api/progress/5/assessment", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "score": 85,
            "totalQuestions": 10,
            "correctAnswers": 8,
            "timeSpent": 12,
            "feedback": "tricky one"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Assessment saved");
    assert!(body["assessmentId"].as_i64().unwrap() > 0);

    let overview: serde_json::Value = client
        .get(format!("{}/api/progress", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(overview["completedModules"], 1);
    let module = &overview["modules"][0];
    assert_eq!(module["progress"], 100);
    assert_eq!(module["completed"], true);
    assert_eq!(module["score"], 85);

    let assessments = overview["assessments"].as_array().unwrap();
    assert_eq!(assessments.len(), 1);
    assert_eq!(assessments[0]["module_id"], 5);
    assert_eq!(assessments[0]["total_questions"], 10);
}

#[tokio::test]
async fn retaking_an_assessment_keeps_the_best_score() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_get_token(&client, &address).await;

    for score in [90, 60] {
        client
            .post(format!("{}/api/progress/4/assessment", address))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({
                "score": score, "totalQuestions": 10, "correctAnswers": score / 10
            }))
            .send()
            .await
            .unwrap();
    }

    let overview: serde_json::Value = client
        .get(format!("{}/api/progress", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Module keeps the best score; the log keeps both attempts.
    assert_eq!(overview["modules"][0]["score"], 90);
    assert_eq!(overview["assessments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn guest_end_to_end_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Guest login against a clean store.
    let login: serde_json::Value = client
        .post(format!("{}/api/auth/guest", address))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().expect("Token not found");

    let fresh: serde_json::Value = client
        .get(format!("{}/api/progress", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fresh["completedModules"], 0);
    assert_eq!(fresh["totalModules"], 15);
    assert_eq!(fresh["averageScore"], 0);
    assert_eq!(fresh["overallProgress"], 0);

    // Complete module 1 with a score of 90 over 5 minutes.
    let update = client
        .post(format!("{}/api/progress/1", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "progress": 100, "score": 90, "timeSpent": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 200);

    let after: serde_json::Value = client
        .get(format!("{}/api/progress", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after["completedModules"], 1);
    assert_eq!(after["averageScore"], 90);
    // 5 minutes rounds to 0 hours.
    assert_eq!(after["timeSpent"], 0);
    assert_eq!(after["overallProgress"], 7);
}
