use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{auth, category, media, project, service_step};
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(project_routes())
        .merge(service_step_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::verify_token))
        .routes(routes!(auth::reset_password))
        .routes(routes!(auth::auth_me))
        .routes(routes!(auth::me))
}

fn project_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(project::list_projects))
        .routes(routes!(category::list_categories, category::add_category))
        .routes(routes!(category::update_category, category::delete_category))
        .routes(routes!(media::upload_file))
        .routes(routes!(media::get_file))
        .routes(routes!(
            project::list_projects_by_category,
            project::add_project
        ))
        .routes(routes!(project::update_project, project::delete_project))
}

fn service_step_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            service_step::list_service_steps,
            service_step::add_service_step
        ))
        .routes(routes!(
            service_step::get_service_step,
            service_step::update_service_step,
            service_step::delete_service_step
        ))
}
