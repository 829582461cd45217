// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Normal session lifetime in seconds (default 30 days).
    pub jwt_expiration: u64,
    /// Guest session lifetime in seconds (default 1 day).
    pub guest_jwt_expiration: u64,
    pub allowed_origins: Vec<String>,
    /// Root directory for the static HTML pages, if served.
    pub static_dir: Option<String>,
    pub demo_email: String,
    pub demo_password: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://scholar.db?mode=rwc".to_string());

        // No fallback secret: refusing to start beats signing with a default.
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30 * 24 * 3600);

        let guest_jwt_expiration = env::var("GUEST_JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 3600);

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let static_dir = env::var("STATIC_DIR").ok();

        let demo_email =
            env::var("DEMO_EMAIL").unwrap_or_else(|_| "demo@kenbright.com".to_string());
        let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "demo123".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            guest_jwt_expiration,
            allowed_origins,
            static_dir,
            demo_email,
            demo_password,
            rust_log,
            port,
        }
    }
}
