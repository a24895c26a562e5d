pub mod auth;
pub mod debug;
pub mod field_rules;
pub mod field_types;
pub mod fields;
pub mod projects;
pub mod roles;
pub mod users;
