//! kbtree - a headless client for a knowledge base of folders and files
//!
//! The library keeps a client-side tree of folders and their entries in sync
//! with a REST backend: lazy per-folder loading, pessimistic mutations with
//! per-item in-flight flags, drag-and-drop rules, sequential batch uploads
//! and agent assignment. State is published through a watch-based store.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod dnd;
pub mod error;
pub mod manager;
pub mod models;
pub mod notifications;
pub mod state;
pub mod store;
pub mod traits;
pub mod tree;
pub mod validation;
