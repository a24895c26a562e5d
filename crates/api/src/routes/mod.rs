pub mod auth;
pub mod debug;
pub mod field_rules;
pub mod field_types;
pub mod fields;
pub mod health;
pub mod projects;
pub mod roles;
pub mod users;

use axum::routing::get;
use axum::{middleware, Router};

use crate::handlers;
use crate::middleware::session::require_session;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     logout (public)
/// /auth/session                    current session
///
/// /users                           list, create
/// /users/{id}                      get, update, delete
/// /users/{id}/roles                get, add/remove/replace
///
/// /roles                           list, create
/// /roles/{id}                      get, update, delete
///
/// /field-types                     list, create
/// /field-types/{id}                get
///
/// /fields                          list, create
/// /fields/{id}                     get, update, delete
///
/// /field-rules                     list, create
/// /field-rules/{id}                get, update, delete
///
/// /projects                        list, create
/// /projects/{id}                   get, update, delete
/// /projects/{id}/fields            get, replace
///
/// /test/users, /test/roles         debug listings (development only, public)
/// ```
///
/// Everything except login, logout and the debug listings sits behind
/// [`require_session`].
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/session", get(handlers::auth::session))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/field-types", field_types::router())
        .nest("/fields", fields::router())
        .nest("/field-rules", field_rules::router())
        .nest("/projects", projects::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let mut public = auth::router();
    if state.config.environment.is_development() {
        public = public.nest("/test", debug::router());
    }

    public.merge(protected)
}
