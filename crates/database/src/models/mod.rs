// database/models/mod.rs - document models and index declarations per collection

pub mod admin_log;
pub mod bug_report;
pub mod resource;
pub mod role_request;
pub mod user;
