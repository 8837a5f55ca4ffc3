//! Core infrastructure for mockgen.
//!
//! This crate turns parsed method declarations into mock stubs:
//! - Declaration input types supplied by the syntax-tree layer
//! - Type display forms and default return values
//! - Method, parameter and handler models with overload-safe identifiers
//! - Overload-collision resolution across the methods of one type
//! - Template substitution and stub rendering
//! - Batch generation with skip-and-report failure handling
//! - Error types, layered configuration and JSON output types

pub mod attributes;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod template;
pub mod types;
pub mod typename;
