pub mod auth;

pub use auth::{IngressAuth, IngressAuthError};
