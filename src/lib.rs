//! mockgen: overload-safe mock stub generation
//!
//! Turns parsed method declarations into mock stubs with a settable handler
//! per method, naming overloads so that no two stubs of a type collide.

// Core infrastructure - re-exported from mockgen-core
pub use mockgen_core::attributes;
pub use mockgen_core::config;
pub use mockgen_core::error;
pub use mockgen_core::model;
pub use mockgen_core::output;
pub use mockgen_core::pipeline;
pub use mockgen_core::resolve;
pub use mockgen_core::template;
pub use mockgen_core::typename;
pub use mockgen_core::types;

// Front door
pub mod cli;
