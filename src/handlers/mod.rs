pub mod account;
pub mod articles;
pub mod news;
pub mod newsletter;
pub mod reset;

use serde::Serialize;

/// Plain `{"message": ...}` body shared by several endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
