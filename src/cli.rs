//! CLI front door helpers.
//!
//! Provides the operations behind the `mockgen` binary:
//! - `generate` - build, resolve and render mocks for a declaration file
//! - `resolve` - report the identifier tier chosen for every method
//!
//! ## Input
//!
//! A JSON [`DeclarationFile`] as produced by the syntax-tree layer. The
//! source text it was parsed from is only needed for attribute extraction;
//! it is taken from `--source`, else from the file's `source` field
//! (relative to the declaration file), else treated as empty.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, MockGenError>`. Per-declaration failures
//! are not errors: they are reported inside the response and the run
//! continues.

use std::fs;
use std::path::{Path, PathBuf};

use mockgen_core::attributes::{
    AttributeExtractor, ScanAttributeExtractor, SpanAttributeExtractor,
};
use mockgen_core::config::GenConfig;
use mockgen_core::error::{MockGenError, MockGenResult};
use mockgen_core::output::{EntityTiers, GenerateResponse, MethodTier, ResolveResponse};
use mockgen_core::pipeline::{EntityReport, MockGenerator};
use mockgen_core::resolve::resolve_tiers;
use mockgen_core::types::DeclarationFile;

/// How attribute text is pulled from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeMode {
    /// Slice by recorded attribute spans.
    #[default]
    Span,
    /// Scan the lines above each declaration.
    Scan,
}

/// Read and decode a declaration file.
pub fn load_declarations(path: &Path) -> MockGenResult<DeclarationFile> {
    let text = read_file(path)?;
    let file: DeclarationFile = serde_json::from_str(&text)?;
    tracing::debug!(
        "loaded {} entit(ies) from {}",
        file.entities.len(),
        path.display()
    );
    Ok(file)
}

/// Locate and read the source text for `file`.
pub fn load_source(
    explicit: Option<&Path>,
    input: &Path,
    file: &DeclarationFile,
) -> MockGenResult<String> {
    let path: Option<PathBuf> = match (explicit, &file.source) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(source)) => {
            let base = input.parent().unwrap_or_else(|| Path::new(""));
            Some(base.join(source))
        }
        (None, None) => None,
    };
    match path {
        Some(path) => read_file(&path),
        None => Ok(String::new()),
    }
}

fn read_file(path: &Path) -> MockGenResult<String> {
    if !path.exists() {
        return Err(MockGenError::file_not_found(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|e| {
        MockGenError::internal(format!("failed to read {}: {}", path.display(), e))
    })
}

/// Generate mocks for every entity in `input`.
pub fn run_generate(
    input: &Path,
    source: Option<&Path>,
    config: &GenConfig,
    mode: AttributeMode,
) -> MockGenResult<GenerateResponse> {
    let file = load_declarations(input)?;
    let content = load_source(source, input, &file)?;
    let reports = match mode {
        AttributeMode::Span => generate_with(config, SpanAttributeExtractor, &file, &content),
        AttributeMode::Scan => generate_with(config, ScanAttributeExtractor, &file, &content),
    };
    Ok(GenerateResponse::new(reports))
}

fn generate_with<E: AttributeExtractor>(
    config: &GenConfig,
    extractor: E,
    file: &DeclarationFile,
    content: &str,
) -> Vec<EntityReport> {
    MockGenerator::new(config, extractor).generate_file(file, content)
}

/// Report the chosen identifier tier for every method in `input`.
///
/// Declarations that fail to build are left out.
pub fn run_resolve(input: &Path, config: &GenConfig) -> MockGenResult<ResolveResponse> {
    let file = load_declarations(input)?;
    let generator = MockGenerator::new(config, SpanAttributeExtractor);
    let entities = file
        .entities
        .iter()
        .map(|entity| {
            let (models, _failures) = generator.build_models(&entity.declarations, "");
            let methods = models
                .iter()
                .zip(resolve_tiers(&models))
                .map(|(model, tier)| MethodTier {
                    offset: model.offset,
                    tier,
                    identifier: model.identifier(tier).to_string(),
                    identifiers: model.identifiers.clone(),
                })
                .collect();
            EntityTiers {
                name: entity.name.clone(),
                methods,
            }
        })
        .collect();
    Ok(ResolveResponse::new(entities))
}

/// Concatenate the assembled mock types of a response.
pub fn render_source(response: &GenerateResponse) -> String {
    response
        .entities
        .iter()
        .filter_map(|entity| entity.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n\n")
}
