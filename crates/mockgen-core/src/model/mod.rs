//! Declaration models and stub rendering.
//!
//! A [`MethodModel`] is built once per [`Declaration`](crate::types::Declaration)
//! and can then be rendered any number of times. Building computes four
//! identifiers of increasing specificity:
//!
//! | Tier     | Composition                                        | `foo(bar b: Int) -> Int` |
//! |----------|----------------------------------------------------|--------------------------|
//! | `Name`   | base name                                          | `foo`                    |
//! | `Medium` | name + capitalized parameter names                 | `fooB`                   |
//! | `Long`   | medium + return type display form                  | `fooBInt`                |
//! | `Full`   | name + (capitalized label + type) per param + return | `fooBarIntInt`         |
//!
//! Which tier a stub uses is decided across all methods of a type by
//! [`crate::resolve`]. The same [`IdentifierTier`] selects the stub's call
//! counter name and its handler property name, so the two can never drift
//! apart.

mod closure;
mod method;
mod param;

use serde::{Deserialize, Serialize};

use crate::template::Templates;

pub use closure::ClosureModel;
pub use method::MethodModel;
pub use param::ParamModel;

/// Disambiguation level of a generated identifier, shortest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierTier {
    /// Bare base name.
    Name,
    /// Base name plus parameter names.
    Medium,
    /// Medium name plus return type.
    Long,
    /// Base name plus labels and types of every parameter plus return type.
    Full,
}

impl IdentifierTier {
    /// All tiers, shortest first.
    pub const ALL: [IdentifierTier; 4] = [
        IdentifierTier::Name,
        IdentifierTier::Medium,
        IdentifierTier::Long,
        IdentifierTier::Full,
    ];

    /// The next more specific tier, if any.
    pub fn next(self) -> Option<IdentifierTier> {
        match self {
            IdentifierTier::Name => Some(IdentifierTier::Medium),
            IdentifierTier::Medium => Some(IdentifierTier::Long),
            IdentifierTier::Long => Some(IdentifierTier::Full),
            IdentifierTier::Full => None,
        }
    }
}

/// The four identifiers computed for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifiers {
    pub name: String,
    pub medium_name: String,
    pub long_name: String,
    pub full_name: String,
}

impl Identifiers {
    /// The identifier for `tier`.
    pub fn get(&self, tier: IdentifierTier) -> &str {
        match tier {
            IdentifierTier::Name => &self.name,
            IdentifierTier::Medium => &self.medium_name,
            IdentifierTier::Long => &self.long_name,
            IdentifierTier::Full => &self.full_name,
        }
    }

    /// Map an identifier string back to its tier.
    ///
    /// Matches name, medium and long in that order; anything else is `Full`.
    pub fn tier_of(&self, identifier: &str) -> IdentifierTier {
        if identifier == self.name {
            IdentifierTier::Name
        } else if identifier == self.medium_name {
            IdentifierTier::Medium
        } else if identifier == self.long_name {
            IdentifierTier::Long
        } else {
            IdentifierTier::Full
        }
    }
}

/// Naming knobs applied while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Appended to the chosen identifier to name the handler property.
    pub handler_suffix: String,
    /// Appended to the chosen identifier to name the call counter.
    pub call_count_suffix: String,
    /// Templates for parameters, handler bodies, stubs and the mock type.
    pub templates: Templates,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            handler_suffix: "Handler".to_string(),
            call_count_suffix: "CallCount".to_string(),
            templates: Templates::default(),
        }
    }
}
