pub mod todos;

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Assembles the full application: health probe, API routes and, when a
/// bundle directory is given, static files for every other path.
pub fn app(router: Router, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}
