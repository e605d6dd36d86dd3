//! # Core Prompt Logic
//!
//! The parts of rebullet that know nothing about terminals: the key
//! vocabulary, the scrolling-window arithmetic, dependency propagation,
//! the form configuration and the error types.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • SemanticKey          │
//!                    │  • Viewport             │
//!                    │  • DependencyGraph      │
//!                    │                         │
//!                    │  No I/O. Pure.          │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    term    │  ◄──────── │  widgets   │
//!            │ bytes, keys│            │ list, text │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`key`]: `SemanticKey`, the closed set of logical keystrokes
//! - [`viewport`]: the scroll window state machine
//! - [`dependency`]: the requires-graph and its closure rules
//! - [`config`]: TOML form files
//! - [`error`]: construction and run-time errors

pub mod config;
pub mod dependency;
pub mod error;
pub mod key;
pub mod viewport;

pub use dependency::DependencyGraph;
pub use error::{BuildError, PromptError};
pub use key::SemanticKey;
pub use viewport::{Scroll, Viewport};
