pub mod analytics;
pub mod checklist;
pub mod pdf;
