//! Library crate for user-roster.
//!
//! This crate exposes the building blocks of the application:
//! - User record and validation (`model`)
//! - In-memory store with simulated latency (`store`)
//! - Repository port over the store (`repository`)
//! - Search filtering (`search`)
//! - Presentation state holder with debounced search (`viewmodel`)
//! - Terminal state, keymap and event loop (`app`) and rendering (`ui`)
//! - Configuration, logging and error types (`config`, `logging`, `error`)
//!
//! It is used by the `user-roster` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod search;
pub mod store;
pub mod ui;
pub mod viewmodel;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
pub use model::User;
pub use viewmodel::{UiState, UserListViewModel, ViewModelOptions, ViewState};
