// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, quiz, students},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: health, direct submit, quiz paper and quiz submit, login.
/// * Admin routes under `/api/admin`, behind auth + admin middleware.
/// * Optional static UI with `index.html` fallback when `STATIC_DIR` is set.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/api/health", get(students::health))
        .route("/api/students", post(students::submit))
        .route("/api/quiz", get(quiz::generate_paper))
        .route("/api/quiz/submit", post(quiz::submit_paper))
        .route("/api/admin/login", post(admin::login));

    let admin_routes = Router::new()
        .route("/students", get(admin::list_students))
        .route("/students/stats", get(admin::student_stats))
        .route("/students/export", get(admin::export_students))
        .route("/students/delete", post(admin::delete_student_by_body))
        .route("/students/clear", post(admin::clear_students))
        .route(
            "/students/{id}",
            get(admin::get_student).delete(admin::delete_student),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    let mut app = Router::new()
        .merge(public_routes)
        .nest("/api/admin", admin_routes);

    if let Some(dir) = &state.config.static_dir {
        tracing::info!("Serving static files from {:?}", dir);
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).not_found_service(index));
    }

    app
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
