use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET, POST          /             list, create
/// GET, PUT, DELETE   /{id}         get (with fields and rules), update, delete
/// GET, PUT           /{id}/fields  field bindings, replace bindings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route(
            "/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/{id}/fields",
            get(projects::get_project_fields).put(projects::set_project_fields),
        )
}
