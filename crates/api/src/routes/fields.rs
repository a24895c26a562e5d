use axum::routing::get;
use axum::Router;

use crate::handlers::fields;
use crate::state::AppState;

/// Routes mounted at `/fields`.
///
/// ```text
/// GET, POST          /      list, create
/// GET, PUT, DELETE   /{id}  get (with rules), update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fields::list_fields).post(fields::create_field))
        .route(
            "/{id}",
            get(fields::get_field)
                .put(fields::update_field)
                .delete(fields::delete_field),
        )
}
