pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod news;
pub mod newsletter;
pub mod recommend;
pub mod rest;
pub mod state;
pub mod store;

pub use state::AppState;
