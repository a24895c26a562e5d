use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET, POST          /            list, create
/// GET, PUT, DELETE   /{id}        get, update, delete
/// GET, POST          /{id}/roles  current roles, add/remove/replace
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/{id}/roles",
            get(users::get_user_roles).post(users::manage_user_roles),
        )
}
