//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as its first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Versioned:** Schema version in every response

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{MockGenError, OutputErrorCode};
use crate::model::{IdentifierTier, Identifiers};
use crate::pipeline::EntityReport;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a MockGenError.
    pub fn from_error(err: &MockGenError) -> Self {
        let details = match err {
            MockGenError::InputContractViolation {
                name,
                offset,
                labels,
                params,
            } => Some(serde_json::json!({
                "name": name,
                "offset": offset,
                "labels": labels,
                "params": params,
            })),
            MockGenError::TemplateRenderFailure { template, .. } => {
                Some(serde_json::json!({ "template": template }))
            }
            MockGenError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response.
    pub fn new(err: &MockGenError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Totals across a generate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub entities: usize,
    pub stubs: usize,
    pub failures: usize,
}

/// Response for the generate command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// Status: "ok" when every declaration rendered, "partial" otherwise.
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub summary: Summary,
    pub entities: Vec<EntityReport>,
}

impl GenerateResponse {
    /// Create a generate response from entity reports.
    pub fn new(entities: Vec<EntityReport>) -> Self {
        let summary = Summary {
            entities: entities.len(),
            stubs: entities.iter().map(|e| e.stubs.len()).sum(),
            failures: entities.iter().map(|e| e.failures.len()).sum(),
        };
        let status = if summary.failures == 0 { "ok" } else { "partial" };
        GenerateResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            summary,
            entities,
        }
    }
}

/// Chosen tier for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTier {
    pub offset: u64,
    pub tier: IdentifierTier,
    /// Identifier at the chosen tier.
    pub identifier: String,
    /// All four identifiers.
    pub identifiers: Identifiers,
}

/// Chosen tiers for the methods of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTiers {
    pub name: String,
    pub methods: Vec<MethodTier>,
}

/// Response for the resolve command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub entities: Vec<EntityTiers>,
}

impl ResolveResponse {
    /// Create a resolve response.
    pub fn new(entities: Vec<EntityTiers>) -> Self {
        ResolveResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            entities,
        }
    }
}

// ============================================================================
// Emit
// ============================================================================

/// Emit a response as pretty JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
