pub mod artifact_routes;
pub mod health_routes;
pub mod project_routes;

pub use artifact_routes::artifact_routes;
pub use health_routes::health_routes;
pub use project_routes::project_routes;
