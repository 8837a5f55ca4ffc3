//! Attribute text extraction.
//!
//! Model building only decides *whether* attributes are needed; pulling the
//! attribute text out of the source is delegated to an [`AttributeExtractor`].
//! Two extractors are provided, and any
//! `Fn(&Declaration, &str, &str) -> Vec<String>` also works:
//!
//! - [`SpanAttributeExtractor`] slices the source by the byte spans the
//!   syntax-tree layer recorded for each attribute.
//! - [`ScanAttributeExtractor`] scans the lines directly above the
//!   declaration for `@name(...)` text, for inputs that carry no spans.

use regex::Regex;
use tracing::warn;

use crate::types::Declaration;

/// Prefix shared by attribute kind tokens.
const ATTRIBUTE_KIND_PREFIX: &str = "source.decl.attribute.";

/// Extracts the source text of a declaration's attributes of one kind.
pub trait AttributeExtractor {
    /// Return the text of every attribute of `kind` attached to `decl`,
    /// in source order.
    fn extract(&self, decl: &Declaration, content: &str, kind: &str) -> Vec<String>;
}

impl<F> AttributeExtractor for F
where
    F: Fn(&Declaration, &str, &str) -> Vec<String>,
{
    fn extract(&self, decl: &Declaration, content: &str, kind: &str) -> Vec<String> {
        self(decl, content, kind)
    }
}

/// Slices attribute text using recorded byte spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanAttributeExtractor;

impl AttributeExtractor for SpanAttributeExtractor {
    fn extract(&self, decl: &Declaration, content: &str, kind: &str) -> Vec<String> {
        decl.attributes
            .iter()
            .filter(|attr| attr.kind == kind)
            .filter_map(|attr| {
                let span = attr.span?;
                let text = span.slice(content);
                if text.is_none() {
                    warn!(
                        "attribute span {}..{} of '{}' is outside the source",
                        span.start, span.end, decl.name
                    );
                }
                text
            })
            .map(|text| text.trim().to_string())
            .collect()
    }
}

/// Scans the source text preceding a declaration for `@name(...)` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanAttributeExtractor;

impl ScanAttributeExtractor {
    /// Attribute name for a kind token: `source.decl.attribute.available` -> `available`.
    fn attribute_name(kind: &str) -> &str {
        kind.strip_prefix(ATTRIBUTE_KIND_PREFIX).unwrap_or(kind)
    }
}

impl AttributeExtractor for ScanAttributeExtractor {
    fn extract(&self, decl: &Declaration, content: &str, kind: &str) -> Vec<String> {
        let name = Self::attribute_name(kind);
        let pattern = format!(r"@{}\s*\([^)]*\)", regex::escape(name));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!("cannot scan for attribute '{}': {}", name, e);
                return Vec::new();
            }
        };
        let block = attribute_block(content, decl.offset);
        re.find_iter(block)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// The declaration's own line up to `offset`, plus the contiguous lines above
/// it that start with `@`.
fn attribute_block(content: &str, offset: u64) -> &str {
    let mut end = usize::try_from(offset).unwrap_or(usize::MAX).min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    let head = &content[..end];

    let mut start = head.rfind('\n').map_or(0, |i| i + 1);
    while start > 0 {
        let prev_end = start - 1;
        let prev_start = head[..prev_end].rfind('\n').map_or(0, |i| i + 1);
        if head[prev_start..prev_end].trim_start().starts_with('@') {
            start = prev_start;
        } else {
            break;
        }
    }
    &head[start..]
}
