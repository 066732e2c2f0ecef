pub mod admin;
pub mod auth;
pub mod contact;
pub mod experiences;
pub mod projects;

