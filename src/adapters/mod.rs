//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileSessionProvider`] - Session token read from `~/.kbtree/session.json`
//! - [`StaticSession`] - Session token supplied up front
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemorySession`] - In-memory session token

pub mod file_session;
pub mod mock;
pub mod reqwest_http;
pub mod static_session;

pub use file_session::FileSessionProvider;
pub use mock::{InMemorySession, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use static_session::StaticSession;
