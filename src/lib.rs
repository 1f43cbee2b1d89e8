//! # Toolbox Core - Pluggable Tool Layer
//!
//! Rust implementation of the toolbox tool layer providing:
//! - A registry mapping tool type ids to config decoders
//! - Typed parameter declarations with validation and defaults
//! - Generic and MCP manifest generation
//! - Authorization gating against verified auth services
//! - Capability-typed source resolution and cancellable execution
//! - Injection-safe dynamic ordering and filtering for fixed SQL
//!
//! ## Architecture
//!
//! Everything is built once at startup and shared read-only afterwards:
//! ```text
//!   tools.yaml ─→ ToolRegistry::decode ─→ ToolConfig::initialize ─→ ToolCatalog
//!                                                                     │
//!   request ─→ ToolInvoker ─→ authorize ─→ validate ─→ embed ─→ Tool::invoke ─→ Source
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod parameters;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use types::{Config, Error, Result};
