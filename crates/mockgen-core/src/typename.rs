//! Type name utilities: identifier-safe display forms and default values.
//!
//! ## Display Forms
//!
//! Generated identifiers embed parameter and return types (`fooBarInt`,
//! `fetchIntStringDict`). [`display_for_type`] parses a type name into a small
//! type expression and renders it as a single identifier-safe token:
//!
//! | Type               | Display form          |
//! |--------------------|-----------------------|
//! | `Int`              | `Int`                 |
//! | `String?`          | `StringOptional`      |
//! | `[Int]`            | `IntArray`            |
//! | `[String: Int]`    | `StringIntDict`       |
//! | `Result<Int, E>`   | `ResultIntE`          |
//! | `(Int) -> Void`    | `IntToVoid`           |
//! | `()`               | `Void`                |
//!
//! Decoration is turned into words rather than dropped, so `Int?` and `Int`
//! stay distinct. Names that cannot be parsed fall back to their
//! identifier characters.
//!
//! ## Default Values
//!
//! [`TypeCategory`] is a closed classification of return types. Every
//! category maps to a [`DefaultValue`]; types outside the known categories
//! get [`DefaultValue::Placeholder`].

use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated, terminated};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};
use winnow::ModalResult;

use crate::types::UNKNOWN_TYPE;

/// Upper-case the first character of `s`, leaving the rest untouched.
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a type name as an identifier-safe token.
///
/// Empty input (no return type) renders as the empty string.
pub fn display_for_type(type_name: &str) -> String {
    let trimmed = type_name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match TypeExpr::parse(trimmed) {
        Some(expr) => {
            let mut out = String::new();
            expr.display(&mut out);
            out
        }
        None => trimmed
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect(),
    }
}

// ============================================================================
// Type Expressions
// ============================================================================

/// Parsed shape of a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr {
    /// Dotted path with generic arguments per segment: `Swift.Result<Int, E>`.
    Named(Vec<(String, Vec<TypeExpr>)>),
    Array(Box<TypeExpr>),
    Dictionary(Box<TypeExpr>, Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    Unwrapped(Box<TypeExpr>),
    Variadic(Box<TypeExpr>),
    /// Member access on a non-path type, e.g. `(Int).Type`.
    Member(Box<TypeExpr>, String),
    Tuple(Vec<TypeExpr>),
    Function {
        params: Vec<TypeExpr>,
        result: Box<TypeExpr>,
    },
    Composition(Vec<TypeExpr>),
}

/// Keywords that prefix a type without changing its identity for naming.
const TYPE_MODIFIERS: &[&str] = &[
    "inout",
    "some",
    "any",
    "borrowing",
    "consuming",
    "sending",
    "__owned",
    "__shared",
];

/// Keywords that may follow a function type's parameter list.
const EFFECT_KEYWORDS: &[&str] = &["async", "throws", "rethrows"];

impl TypeExpr {
    fn parse(s: &str) -> Option<TypeExpr> {
        terminated(parse_type, multispace0).parse(s).ok()
    }

    fn display(&self, out: &mut String) {
        match self {
            TypeExpr::Named(segments) => {
                for (name, args) in segments {
                    out.push_str(&capitalize_first_letter(name));
                    for arg in args {
                        arg.display(out);
                    }
                }
            }
            TypeExpr::Array(elem) => {
                elem.display(out);
                out.push_str("Array");
            }
            TypeExpr::Dictionary(key, value) => {
                key.display(out);
                value.display(out);
                out.push_str("Dict");
            }
            TypeExpr::Optional(inner) => {
                inner.display(out);
                out.push_str("Optional");
            }
            TypeExpr::Unwrapped(inner) => {
                inner.display(out);
                out.push_str("Unwrapped");
            }
            TypeExpr::Variadic(inner) => {
                inner.display(out);
                out.push_str("Variadic");
            }
            TypeExpr::Member(base, name) => {
                base.display(out);
                out.push_str(&capitalize_first_letter(name));
            }
            TypeExpr::Tuple(elems) => {
                if elems.is_empty() {
                    out.push_str("Void");
                } else {
                    for elem in elems {
                        elem.display(out);
                    }
                    out.push_str("Tuple");
                }
            }
            TypeExpr::Function { params, result } => {
                if params.is_empty() {
                    out.push_str("Void");
                }
                for param in params {
                    param.display(out);
                }
                out.push_str("To");
                result.display(out);
            }
            TypeExpr::Composition(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push_str("And");
                    }
                    part.display(out);
                }
            }
        }
    }
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

/// Parse a type, including `A & B` compositions.
fn parse_type(input: &mut &str) -> ModalResult<TypeExpr> {
    let _ = multispace0.parse_next(input)?;
    let first = parse_postfixed(input)?;

    let rest: Vec<TypeExpr> = repeat(
        0..,
        preceded((multispace0, '&', multispace0), parse_postfixed),
    )
    .parse_next(input)?;

    if rest.is_empty() {
        Ok(first)
    } else {
        let mut parts = vec![first];
        parts.extend(rest);
        Ok(TypeExpr::Composition(parts))
    }
}

/// Parse a primary type with its modifiers and postfix decoration.
fn parse_postfixed(input: &mut &str) -> ModalResult<TypeExpr> {
    let _: () = repeat(0.., parse_modifier).parse_next(input)?;
    let mut ty = parse_primary(input)?;

    loop {
        let _ = multispace0.parse_next(input)?;
        ty = if opt("...").parse_next(input)?.is_some() {
            TypeExpr::Variadic(Box::new(ty))
        } else if opt('?').parse_next(input)?.is_some() {
            TypeExpr::Optional(Box::new(ty))
        } else if opt('!').parse_next(input)?.is_some() {
            TypeExpr::Unwrapped(Box::new(ty))
        } else if let Some(member) = opt(preceded('.', parse_ident)).parse_next(input)? {
            TypeExpr::Member(Box::new(ty), member.to_string())
        } else {
            return Ok(ty);
        };
    }
}

/// Skip one attribute (`@escaping`, `@convention(c)`) or modifier keyword.
fn parse_modifier(input: &mut &str) -> ModalResult<()> {
    let checkpoint = *input;

    if opt('@').parse_next(input)?.is_some() {
        let name = parse_ident(input)?;
        // `@convention(c)` carries arguments; `@escaping (Int) -> Void` does not.
        if name == "convention" {
            let _ = opt(delimited('(', take_till(0.., |c| c == ')'), ')')).parse_next(input)?;
        }
        let _ = multispace0.parse_next(input)?;
        return Ok(());
    }

    let word = parse_ident(input)?;
    if TYPE_MODIFIERS.contains(&word) && input.starts_with(char::is_whitespace) {
        let _ = multispace0.parse_next(input)?;
        Ok(())
    } else {
        *input = checkpoint;
        Err(ErrMode::from_input(input))
    }
}

fn parse_primary(input: &mut &str) -> ModalResult<TypeExpr> {
    alt((parse_collection, parse_parenthesized, parse_path)).parse_next(input)
}

/// Parse `[T]` or `[K: V]`.
fn parse_collection(input: &mut &str) -> ModalResult<TypeExpr> {
    let _ = ('[', multispace0).parse_next(input)?;
    let elem = parse_type(input)?;
    let value = opt(preceded((multispace0, ':', multispace0), parse_type)).parse_next(input)?;
    let _ = (multispace0, ']').parse_next(input)?;

    Ok(match value {
        Some(value) => TypeExpr::Dictionary(Box::new(elem), Box::new(value)),
        None => TypeExpr::Array(Box::new(elem)),
    })
}

/// Parse a tuple, a parenthesized type, or a function type.
fn parse_parenthesized(input: &mut &str) -> ModalResult<TypeExpr> {
    let mut elems: Vec<TypeExpr> = delimited(
        ('(', multispace0),
        separated(0.., parse_tuple_element, (multispace0, ',', multispace0)),
        (multispace0, ')'),
    )
    .parse_next(input)?;

    let _: () = repeat(0.., preceded(multispace0, parse_effect)).parse_next(input)?;
    let result = opt(preceded((multispace0, "->", multispace0), parse_type)).parse_next(input)?;

    if let Some(result) = result {
        return Ok(TypeExpr::Function {
            params: elems,
            result: Box::new(result),
        });
    }
    if elems.len() == 1 {
        Ok(elems.remove(0))
    } else {
        Ok(TypeExpr::Tuple(elems))
    }
}

/// Parse one tuple element, dropping `a:` or `_ b:` labels.
fn parse_tuple_element(input: &mut &str) -> ModalResult<TypeExpr> {
    let _ = opt((
        parse_ident,
        multispace0,
        opt((parse_ident, multispace0)),
        ':',
        multispace0,
    ))
    .parse_next(input)?;
    parse_type(input)
}

/// Parse an effect keyword following a function type's parameter list.
fn parse_effect(input: &mut &str) -> ModalResult<()> {
    let checkpoint = *input;
    let word = parse_ident(input)?;

    if EFFECT_KEYWORDS.contains(&word) {
        Ok(())
    } else {
        *input = checkpoint;
        Err(ErrMode::from_input(input))
    }
}

/// Parse a dotted path with generic arguments: `Swift.Result<Int, E>`.
fn parse_path(input: &mut &str) -> ModalResult<TypeExpr> {
    let first = parse_segment(input)?;
    let rest: Vec<(String, Vec<TypeExpr>)> =
        repeat(0.., preceded('.', parse_segment)).parse_next(input)?;

    let mut segments = vec![first];
    segments.extend(rest);
    Ok(TypeExpr::Named(segments))
}

fn parse_segment(input: &mut &str) -> ModalResult<(String, Vec<TypeExpr>)> {
    let name = parse_ident(input)?;
    let args: Option<Vec<TypeExpr>> = opt(delimited(
        ('<', multispace0),
        separated(1.., parse_type, (multispace0, ',', multispace0)),
        (multispace0, '>'),
    ))
    .parse_next(input)?;

    Ok((name.to_string(), args.unwrap_or_default()))
}

fn parse_ident<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

// ============================================================================
// Type Categories and Default Values
// ============================================================================

/// Closed classification of return types, used to pick a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// No return value (`Void`, `()`, or no return clause).
    Void,
    /// Fixed-width or platform integers.
    Integer,
    /// Floating-point numbers.
    FloatingPoint,
    /// `Bool`.
    Boolean,
    /// `String` and `Substring`.
    Text,
    /// `T?`, `T!` and `Optional<T>`.
    Optional,
    /// `[T]` and `Array<T>`.
    Array,
    /// `[K: V]` and `Dictionary<K, V>`.
    Dictionary,
    /// `Set<T>`.
    Set,
    /// Everything else.
    Other,
}

/// The value a handler-less stub returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Nothing is returned.
    Void,
    /// A literal expression of the return type.
    Literal(String),
    /// No literal exists; the handler must be set before the stub is called.
    Placeholder,
}

const INTEGER_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
];

const FLOAT_TYPES: &[&str] = &[
    "Double",
    "Float",
    "Float16",
    "Float32",
    "Float64",
    "Float80",
    "CGFloat",
    "TimeInterval",
];

impl TypeCategory {
    /// Classify a return type name.
    pub fn classify(type_name: &str) -> TypeCategory {
        let trimmed = type_name.trim();
        if trimmed.is_empty() || trimmed == UNKNOWN_TYPE {
            return TypeCategory::Void;
        }
        match TypeExpr::parse(trimmed) {
            Some(expr) => Self::classify_expr(&expr),
            None => TypeCategory::Other,
        }
    }

    fn classify_expr(expr: &TypeExpr) -> TypeCategory {
        match expr {
            TypeExpr::Optional(_) | TypeExpr::Unwrapped(_) => TypeCategory::Optional,
            TypeExpr::Array(_) | TypeExpr::Variadic(_) => TypeCategory::Array,
            TypeExpr::Dictionary(_, _) => TypeCategory::Dictionary,
            TypeExpr::Tuple(elems) if elems.is_empty() => TypeCategory::Void,
            TypeExpr::Named(segments) => {
                // `Swift.Int` names the same type as `Int`.
                let last = match segments.as_slice() {
                    [(module, _), rest @ ..] if module == "Swift" && !rest.is_empty() => rest,
                    all => all,
                };
                match last {
                    [(name, args)] => Self::classify_named(name, args.len()),
                    _ => TypeCategory::Other,
                }
            }
            _ => TypeCategory::Other,
        }
    }

    fn classify_named(name: &str, generic_args: usize) -> TypeCategory {
        match (name, generic_args) {
            ("Void", 0) => TypeCategory::Void,
            ("Bool", 0) => TypeCategory::Boolean,
            ("String" | "Substring", 0) => TypeCategory::Text,
            ("Optional", 1) => TypeCategory::Optional,
            ("Array", 1) => TypeCategory::Array,
            ("Dictionary", 2) => TypeCategory::Dictionary,
            ("Set", 1) => TypeCategory::Set,
            (n, 0) if INTEGER_TYPES.contains(&n) => TypeCategory::Integer,
            (n, 0) if FLOAT_TYPES.contains(&n) => TypeCategory::FloatingPoint,
            _ => TypeCategory::Other,
        }
    }

    /// Default value for this category.
    pub fn default_value(self) -> DefaultValue {
        let literal = match self {
            TypeCategory::Void => return DefaultValue::Void,
            TypeCategory::Other => return DefaultValue::Placeholder,
            TypeCategory::Integer => "0",
            TypeCategory::FloatingPoint => "0.0",
            TypeCategory::Boolean => "false",
            TypeCategory::Text => "\"\"",
            TypeCategory::Optional => "nil",
            TypeCategory::Array | TypeCategory::Set => "[]",
            TypeCategory::Dictionary => "[:]",
        };
        DefaultValue::Literal(literal.to_string())
    }
}

/// Default value for a return type name.
pub fn default_value(type_name: &str) -> DefaultValue {
    TypeCategory::classify(type_name).default_value()
}
