//! Declaration input types supplied by the syntax-tree layer.
//!
//! These types describe one parsed method declaration the way a structure
//! dump of the source exposes it: a raw name with argument labels in
//! placeholder form (`foo(bar:baz:)`), the return type name, modifiers, and
//! the ordered list of child nodes. They are plain data; all derivation
//! happens in [`crate::model`].

use serde::{Deserialize, Serialize};

/// Type name reported for declarations whose return type could not be
/// determined (and for methods without a return clause).
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Marker token rendered in front of static/class-level members.
pub const STATIC_KIND: &str = "static";

/// Attribute kind token for `@available(...)` attributes.
pub const AVAILABLE_ATTRIBUTE_KIND: &str = "source.decl.attribute.available";

fn unknown_type() -> String {
    UNKNOWN_TYPE.to_string()
}

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into source content.
///
/// Spans are half-open intervals: `[start, end)`. Deserialized spans go
/// through [`Span::new`], so a reversed range is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSpan")]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u64,
    /// End byte offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span. A reversed range is normalized to an empty span at `start`.
    pub fn new(start: u64, end: u64) -> Self {
        Span {
            start,
            end: end.max(start),
        }
    }

    /// Slice `content` by this span, if it lies within bounds on char boundaries.
    pub fn slice<'a>(&self, content: &'a str) -> Option<&'a str> {
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        content.get(start..end)
    }
}

#[derive(Deserialize)]
struct RawSpan {
    start: u64,
    end: u64,
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        Span::new(raw.start, raw.end)
    }
}

// ============================================================================
// Declaration
// ============================================================================

/// Classification of a declaration's child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstructureKind {
    /// A parameter of the enclosing function.
    VarParameter,
    /// A local variable or nested declaration.
    VarLocal,
    /// Anything else (expressions, statements, attributes).
    #[serde(other)]
    Other,
}

/// A child node of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substructure {
    /// Node classification.
    pub kind: SubstructureKind,
    /// Internal name of the node (empty for unnamed parameters).
    #[serde(default)]
    pub name: String,
    /// Type name of the node.
    #[serde(default = "unknown_type")]
    pub type_name: String,
}

impl Substructure {
    /// Create a parameter node.
    pub fn param(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Substructure {
            kind: SubstructureKind::VarParameter,
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Whether this node is a parameter declaration.
    pub fn is_var_parameter(&self) -> bool {
        self.kind == SubstructureKind::VarParameter
    }
}

/// An attribute attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    /// Attribute kind token (e.g. [`AVAILABLE_ATTRIBUTE_KIND`]).
    pub kind: String,
    /// Where the attribute text lives in the source, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// One parsed method or function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Raw name including argument labels, e.g. `foo(bar:baz:)`.
    pub name: String,
    /// Return type name, or [`UNKNOWN_TYPE`].
    #[serde(default = "unknown_type")]
    pub type_name: String,
    /// Whether this is a static/class-level member.
    #[serde(default)]
    pub is_static: bool,
    /// Byte offset of the declaration in its source file.
    #[serde(default)]
    pub offset: u64,
    /// Access level text to render (e.g. `public`), empty for the default.
    #[serde(default)]
    pub access_level: String,
    /// Attributes attached to the declaration.
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
    /// Explicit default return value expression, overriding the one derived
    /// from the return type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Child nodes in source order.
    #[serde(default)]
    pub substructures: Vec<Substructure>,
}

impl Declaration {
    /// Create a declaration with an unknown return type and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Declaration {
            name: name.into(),
            type_name: unknown_type(),
            is_static: false,
            offset: 0,
            access_level: String::new(),
            attributes: Vec::new(),
            default_value: None,
            substructures: Vec::new(),
        }
    }

    /// Set the return type name.
    pub fn returning(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Append a parameter node.
    pub fn with_param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.substructures.push(Substructure::param(name, type_name));
        self
    }

    /// Whether any attached attribute is `@available`.
    pub fn has_available_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| a.kind == AVAILABLE_ATTRIBUTE_KIND)
    }

    /// Parameter nodes, in order.
    pub fn param_decls(&self) -> impl Iterator<Item = &Substructure> {
        self.substructures.iter().filter(|s| s.is_var_parameter())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A protocol (or other type) whose methods should be mocked together.
///
/// Overload resolution runs across the declarations of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Type name, e.g. `ImageLoading`.
    pub name: String,
    /// Access level text for the generated mock type.
    #[serde(default)]
    pub access_level: String,
    /// Method declarations of the type.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Top-level input document: the entities of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationFile {
    /// Source file the declarations were parsed from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Entities to mock.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_defaults_from_json() {
        let decl: Declaration = serde_json::from_str(r#"{"name": "foo()"}"#).unwrap();
        assert_eq!(decl.type_name, UNKNOWN_TYPE);
        assert!(!decl.is_static);
        assert!(decl.substructures.is_empty());
        assert!(decl.default_value.is_none());
    }

    #[test]
    fn unrecognized_substructure_kind_is_other() {
        let sub: Substructure =
            serde_json::from_str(r#"{"kind": "expr_call", "name": "x"}"#).unwrap();
        assert_eq!(sub.kind, SubstructureKind::Other);
        assert!(!sub.is_var_parameter());
    }

    #[test]
    fn param_decls_filters_non_parameters() {
        let mut decl = Declaration::new("foo(a:)").with_param("a", "Int");
        decl.substructures.push(Substructure {
            kind: SubstructureKind::VarLocal,
            name: "tmp".to_string(),
            type_name: "Int".to_string(),
        });
        let names: Vec<_> = decl.param_decls().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn has_available_attribute_checks_kind() {
        let mut decl = Declaration::new("foo()");
        assert!(!decl.has_available_attribute());
        decl.attributes.push(AttributeRef {
            kind: "source.decl.attribute.objc".to_string(),
            span: None,
        });
        assert!(!decl.has_available_attribute());
        decl.attributes.push(AttributeRef {
            kind: AVAILABLE_ATTRIBUTE_KIND.to_string(),
            span: None,
        });
        assert!(decl.has_available_attribute());
    }

    #[test]
    fn span_slice_respects_bounds() {
        let content = "@available(iOS 13, *)\nfunc foo()";
        assert_eq!(Span::new(0, 21).slice(content), Some("@available(iOS 13, *)"));
        assert_eq!(Span::new(0, 500).slice(content), None);
        assert_eq!(Span::new(5, 2).slice(content), Some(""));
    }

    #[test]
    fn reversed_span_from_json_is_normalized() {
        let span: Span = serde_json::from_str(r#"{"start": 5, "end": 2}"#).unwrap();
        assert_eq!(span, Span { start: 5, end: 5 });
        let attr: AttributeRef = serde_json::from_str(
            r#"{"kind": "source.decl.attribute.available", "span": {"start": 9, "end": 3}}"#,
        )
        .unwrap();
        assert_eq!(attr.span, Some(Span::new(9, 9)));
    }
}
