//! Parameter model.

use crate::template::{expand_template, Template, TemplateVars};
use crate::typename::capitalize_first_letter;
use crate::types::{Substructure, UNKNOWN_TYPE};

/// Label used for parameters without an argument label.
const ANONYMOUS_LABEL: &str = "_";

/// One parameter of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamModel {
    /// Argument label from the declaration name (`_` when absent).
    pub label: String,
    /// Internal parameter name; `arg{index}` when the declaration has none.
    pub name: String,
    /// Parameter type name.
    pub type_name: String,
}

impl ParamModel {
    /// Pair a parameter node with its label from the declaration name.
    pub fn new(decl: &Substructure, label: &str, index: usize) -> Self {
        let name = if decl.name.is_empty() {
            format!("arg{}", index)
        } else {
            decl.name.clone()
        };
        ParamModel {
            label: label.to_string(),
            name,
            type_name: decl.type_name.clone(),
        }
    }

    /// Whether the parameter has no argument label.
    pub fn is_anonymous(&self) -> bool {
        self.label.is_empty() || self.label == ANONYMOUS_LABEL
    }

    /// Token contributed to the medium identifier.
    pub fn name_token(&self) -> String {
        capitalize_first_letter(&self.name)
    }

    /// Token contributed to the full identifier, before the type.
    ///
    /// Anonymous labels fall back to the parameter name.
    pub fn label_token(&self) -> String {
        if self.is_anonymous() {
            capitalize_first_letter(&self.name)
        } else {
            capitalize_first_letter(&self.label)
        }
    }

    /// Render the signature fragment, e.g. `for key: String`.
    ///
    /// Returns `None` when the type is unknown or `template` cannot be
    /// expanded.
    pub fn render(&self, template: &Template) -> Option<String> {
        let type_name = self.type_name.trim();
        if type_name.is_empty() || type_name == UNKNOWN_TYPE {
            return None;
        }
        let label = if self.label == self.name {
            String::new()
        } else if self.is_anonymous() {
            format!("{} ", ANONYMOUS_LABEL)
        } else {
            format!("{} ", self.label)
        };
        let vars = TemplateVars::new()
            .with("label", label)
            .with("name", self.name.as_str())
            .with("type", type_name);
        expand_template(template, &vars).ok()
    }
}
