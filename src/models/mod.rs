pub mod organization;
pub mod project;
pub mod task;
pub mod user;

pub use organization::{Organization, OrganizationMember};
pub use project::{Project, ProjectMember};
pub use task::Task;
pub use user::User;
