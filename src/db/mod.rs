pub mod organizations;
pub mod projects;
pub mod tasks;
pub mod users;
