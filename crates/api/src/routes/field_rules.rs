use axum::routing::get;
use axum::Router;

use crate::handlers::field_rules;
use crate::state::AppState;

/// Routes mounted at `/field-rules`.
///
/// ```text
/// GET, POST          /      list, create
/// GET, PUT, DELETE   /{id}  get, update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(field_rules::list_field_rules).post(field_rules::create_field_rule),
        )
        .route(
            "/{id}",
            get(field_rules::get_field_rule)
                .put(field_rules::update_field_rule)
                .delete(field_rules::delete_field_rule),
        )
}
