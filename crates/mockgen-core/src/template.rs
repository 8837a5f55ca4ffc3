//! Template substitution for generated source text.
//!
//! Templates are plain text with `{{variable}}` placeholders. Expansion is
//! stateless: the same template and variables always produce the same text,
//! and templates can be shared freely across threads.
//!
//! ## Built-in Templates
//!
//! - [`PARAM_TEMPLATE`] - one parameter in a function signature
//! - [`CLOSURE_TEMPLATE`] - the body that forwards a call to its handler
//! - [`METHOD_TEMPLATE`] - call counter, handler property and stub method
//! - [`MOCK_TYPE_TEMPLATE`] - the mock class wrapping all stubs of a type
//!
//! Rendering takes its templates from a [`Templates`] set, so callers can
//! substitute their own text for any stub kind.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors from template expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder names a variable that was not provided.
    #[error("template variable '{variable}' not provided")]
    MissingVariable { template: String, variable: String },

    /// A `{{` without a matching `}}`.
    #[error("unterminated placeholder at byte {offset}")]
    UnterminatedPlaceholder { template: String, offset: usize },
}

impl TemplateError {
    /// Name of the template that failed.
    pub fn template(&self) -> &str {
        match self {
            TemplateError::MissingVariable { template, .. } => template,
            TemplateError::UnterminatedPlaceholder { template, .. } => template,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A named template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Name used in error reports.
    pub name: &'static str,
    /// Template text with `{{variable}}` placeholders.
    pub text: &'static str,
}

/// One parameter: `label name: Type`.
pub const PARAM_TEMPLATE: Template = Template {
    name: "param",
    text: "{{label}}{{name}}: {{type}}",
};

/// Forward to the handler when set, otherwise fall back.
pub const CLOSURE_TEMPLATE: Template = Template {
    name: "closure",
    text: "    if let {{handler}} = {{handler}} {
        {{return}}{{handler}}({{args}})
    }{{fallback}}",
};

/// Call counter, handler property and the stub itself.
pub const METHOD_TEMPLATE: Template = Template {
    name: "method",
    text: "{{acl}}{{static}}var {{identifier}}{{call_count_suffix}} = 0
{{acl}}{{static}}var {{handler_var}}: {{handler_type}}
{{attributes}}{{acl}}{{static}}func {{name}}({{params}}){{return_clause}} {
    {{identifier}}{{call_count_suffix}} += 1
{{handler_body}}
}",
};

/// Mock class for one protocol.
pub const MOCK_TYPE_TEMPLATE: Template = Template {
    name: "mock type",
    text: "{{acl}}class {{mock_name}}: {{protocol}} {
    {{acl}}init() {}
{{body}}
}",
};

/// The template used for each kind of generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Templates {
    pub param: Template,
    pub closure: Template,
    pub method: Template,
    pub mock_type: Template,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            param: PARAM_TEMPLATE,
            closure: CLOSURE_TEMPLATE,
            method: METHOD_TEMPLATE,
            mock_type: MOCK_TYPE_TEMPLATE,
        }
    }
}

/// Variables for template expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    vars: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    /// Create an empty variable set.
    pub fn new() -> Self {
        TemplateVars::default()
    }

    /// Set a variable, builder style.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.vars.insert(key, value.into());
        self
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Expand every `{{variable}}` placeholder in `template`.
///
/// # Errors
///
/// Returns `MissingVariable` if a placeholder has no value and
/// `UnterminatedPlaceholder` if a `{{` is never closed.
pub fn expand_template(template: &Template, vars: &TemplateVars) -> TemplateResult<String> {
    let text = template.text;
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or_else(|| TemplateError::UnterminatedPlaceholder {
                template: template.name.to_string(),
                offset: text.len() - rest.len() + open,
            })?;
        let key = after_open[..close].trim();
        let value = vars
            .get(key)
            .ok_or_else(|| TemplateError::MissingVariable {
                template: template.name.to_string(),
                variable: key.to_string(),
            })?;
        out.push_str(value);
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Prefix every non-empty line of `text` with `prefix`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
