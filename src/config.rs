// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub students_file: PathBuf,
    pub server_addr: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub quiz_time_limit: u64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub rust_log: String,
    pub log_dir: String,
}

/// Extra seconds accepted after the quiz timer runs out, so an auto-submit
/// fired at 0:00 still lands inside the token lifetime.
pub const QUIZ_GRACE_SECONDS: u64 = 60;

/// Percentage from which a result counts as excellent on the dashboard.
pub const EXCELLENT_PERCENTAGE: u32 = 80;

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let students_file = env::var("STUDENTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/students.json"));

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let quiz_time_limit = env::var("QUIZ_TIME_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600);

        let admin_username = env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty());
        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty());

        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Self {
            students_file,
            server_addr,
            jwt_secret,
            jwt_expiration,
            quiz_time_limit,
            admin_username,
            admin_password,
            static_dir,
            rust_log,
            log_dir,
        }
    }
}
