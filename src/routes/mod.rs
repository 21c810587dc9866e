pub mod auth;
pub mod organizations;
pub mod projects;
pub mod roadmaps;
pub mod tasks;
pub mod users;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        // Profile
        .route(
            "/api/user/profile",
            get(users::get_profile)
                .put(users::update_profile)
                .delete(users::delete_account),
        )
        // Organizations
        .route(
            "/api/organizations",
            post(organizations::create).get(organizations::list),
        )
        .route(
            "/api/organizations/{id}",
            get(organizations::get)
                .put(organizations::update)
                .delete(organizations::delete),
        )
        // Projects
        .route(
            "/api/organizations/{id}/projects",
            post(projects::create).get(projects::list),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get).delete(projects::delete),
        )
        .route(
            "/api/projects/{id}/save-tasks-progress",
            post(projects::save_tasks_progress),
        )
        // Tasks
        .route(
            "/api/projects/{id}/tasks",
            post(tasks::create).get(tasks::list),
        )
        .route("/api/tasks/{id}", put(tasks::update).delete(tasks::delete))
        // Roadmap drafting
        .route("/api/temp-roadmap", post(roadmaps::temp_roadmap))
        .route(
            "/api/projects/{id}/generate-roadmap",
            post(roadmaps::generate_for_project),
        )
        // Reporting
        .route(
            "/api/projects/{id}/generate-report",
            get(projects::generate_report),
        )
}
