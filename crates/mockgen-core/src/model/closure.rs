//! Handler model: the settable closure property backing a stub.

use tracing::debug;

use crate::error::MockGenResult;
use crate::model::{IdentifierTier, Identifiers, RenderOptions};
use crate::template::{expand_template, TemplateVars};
use crate::typename::DefaultValue;

/// The handler closure paired with a method stub.
///
/// Carries the same identifiers as its method so the handler property can be
/// named from nothing but the chosen tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureModel {
    pub identifiers: Identifiers,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    /// Displayable return type; empty when the method returns nothing.
    pub return_type: String,
    pub static_kind: String,
    pub default_value: DefaultValue,
}

impl ClosureModel {
    /// Name of the handler property for `tier`.
    pub fn handler_name(&self, tier: IdentifierTier, options: &RenderOptions) -> String {
        format!("{}{}", self.identifiers.get(tier), options.handler_suffix)
    }

    /// Type of the handler property, e.g. `((Int, String) -> (Bool))?`.
    pub fn handler_type(&self) -> String {
        format!(
            "(({}) -> ({}))?",
            self.param_types.join(", "),
            self.return_type
        )
    }

    /// Render the stub body that forwards to the handler.
    pub fn try_render(&self, tier: IdentifierTier, options: &RenderOptions) -> MockGenResult<String> {
        let handler = self.handler_name(tier, options);
        let (return_kw, fallback) = match &self.default_value {
            DefaultValue::Void => ("", String::new()),
            DefaultValue::Literal(value) => ("return ", format!("\n    return {}", value)),
            DefaultValue::Placeholder => (
                "return ",
                format!(
                    "\n    fatalError(\"{} returns can't have a default value thus its handler must be set\")",
                    handler
                ),
            ),
        };
        debug!("rendering handler {} ({:?})", handler, tier);
        let vars = TemplateVars::new()
            .with("handler", handler)
            .with("return", return_kw)
            .with("args", self.param_names.join(", "))
            .with("fallback", fallback);
        Ok(expand_template(&options.templates.closure, &vars)?)
    }
}
