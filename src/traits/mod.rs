//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PATCH, PUT, DELETE, multipart)
//! - [`SessionProvider`] - Bearer token lookup for the signed-in session

pub mod http;
pub mod session;

pub use http::{Headers, HttpClient, HttpError, MultipartFile, Response};
pub use session::{SessionError, SessionProvider};
