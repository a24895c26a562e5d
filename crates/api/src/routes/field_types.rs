use axum::routing::get;
use axum::Router;

use crate::handlers::field_types;
use crate::state::AppState;

/// Routes mounted at `/field-types`.
///
/// ```text
/// GET, POST   /      list, create
/// GET         /{id}  get
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(field_types::list_field_types).post(field_types::create_field_type),
        )
        .route("/{id}", get(field_types::get_field_type))
}
