//! Batch generation: build, resolve and render every declaration of a type.
//!
//! Failures are per declaration. A declaration that cannot be built or
//! rendered is reported by name and offset, and the remaining stubs are
//! still produced; partial success is the normal outcome.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attributes::AttributeExtractor;
use crate::config::GenConfig;
use crate::error::{MockGenError, OutputErrorCode};
use crate::model::{IdentifierTier, MethodModel, RenderOptions};
use crate::resolve::resolve_tiers;
use crate::template::{expand_template, indent, TemplateVars};
use crate::types::{Declaration, DeclarationFile, Entity};

/// Indentation of stubs inside the mock type.
const STUB_INDENT: &str = "    ";

/// Stage at which a declaration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Model building rejected the declaration.
    Build,
    /// The stub could not be rendered.
    Render,
    /// The mock type could not be assembled.
    Assemble,
}

/// A declaration that produced no stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationFailure {
    /// Raw declaration name.
    pub name: String,
    /// Source offset of the declaration.
    pub offset: u64,
    pub stage: FailureStage,
    /// Error code (see [`OutputErrorCode`]).
    pub code: u8,
    pub message: String,
}

impl DeclarationFailure {
    fn new(name: &str, offset: u64, stage: FailureStage, err: &MockGenError) -> Self {
        DeclarationFailure {
            name: name.to_string(),
            offset,
            stage,
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// One rendered stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStub {
    /// Base name of the method.
    pub name: String,
    /// Chosen identifier.
    pub identifier: String,
    pub tier: IdentifierTier,
    pub offset: u64,
    pub text: String,
}

/// Result of generating the mock for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    /// Protocol name.
    pub name: String,
    /// Name of the generated mock type.
    pub mock_name: String,
    /// Stubs in source order.
    pub stubs: Vec<RenderedStub>,
    /// Declarations that produced no stub.
    pub failures: Vec<DeclarationFailure>,
    /// Assembled mock type, absent if assembly failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generates mocks from declarations.
#[derive(Debug, Clone)]
pub struct MockGenerator<E> {
    options: RenderOptions,
    mock_suffix: String,
    extractor: E,
}

impl<E: AttributeExtractor> MockGenerator<E> {
    /// Create a generator from resolved configuration.
    pub fn new(config: &GenConfig, extractor: E) -> Self {
        MockGenerator {
            options: config.render_options(),
            mock_suffix: config.mock_suffix.value.clone(),
            extractor,
        }
    }

    /// Build models for `decls`, sorted by source offset.
    ///
    /// Declarations that fail to build are returned as failures.
    pub fn build_models(
        &self,
        decls: &[Declaration],
        content: &str,
    ) -> (Vec<MethodModel>, Vec<DeclarationFailure>) {
        let mut models = Vec::with_capacity(decls.len());
        let mut failures = Vec::new();

        for decl in decls {
            match MethodModel::build(decl, content, &self.extractor) {
                Ok(model) => models.push(model),
                Err(e) => {
                    warn!("skipping {} at offset {}: {}", decl.name, decl.offset, e);
                    failures.push(DeclarationFailure::new(
                        &decl.name,
                        decl.offset,
                        FailureStage::Build,
                        &e,
                    ));
                }
            }
        }

        models.sort_by_key(|m| m.offset);
        (models, failures)
    }

    /// Generate the mock for one entity.
    pub fn generate_entity(&self, entity: &Entity, content: &str) -> EntityReport {
        let mock_name = format!("{}{}", entity.name, self.mock_suffix);
        let (models, mut failures) = self.build_models(&entity.declarations, content);
        let tiers = resolve_tiers(&models);

        let mut stubs = Vec::with_capacity(models.len());
        for (model, tier) in models.iter().zip(tiers) {
            match model.try_render(tier, &self.options) {
                Ok(text) => stubs.push(RenderedStub {
                    name: model.name().to_string(),
                    identifier: model.identifier(tier).to_string(),
                    tier,
                    offset: model.offset,
                    text,
                }),
                Err(e) => {
                    warn!("no stub for {} at offset {}: {}", model.name(), model.offset, e);
                    failures.push(DeclarationFailure::new(
                        model.name(),
                        model.offset,
                        FailureStage::Render,
                        &e,
                    ));
                }
            }
        }

        let body = stubs
            .iter()
            .map(|stub| indent(&stub.text, STUB_INDENT))
            .collect::<Vec<_>>()
            .join("\n\n");
        let acl = if entity.access_level.is_empty() {
            String::new()
        } else {
            format!("{} ", entity.access_level)
        };
        let vars = TemplateVars::new()
            .with("acl", acl)
            .with("mock_name", mock_name.as_str())
            .with("protocol", entity.name.as_str())
            .with("body", body);
        let text = match expand_template(&self.options.templates.mock_type, &vars) {
            Ok(text) => Some(text),
            Err(e) => {
                let err = MockGenError::from(e);
                warn!("cannot assemble {}: {}", mock_name, err);
                failures.push(DeclarationFailure::new(
                    &entity.name,
                    0,
                    FailureStage::Assemble,
                    &err,
                ));
                None
            }
        };

        debug!(
            "{}: {} stub(s), {} failure(s)",
            mock_name,
            stubs.len(),
            failures.len()
        );

        EntityReport {
            name: entity.name.clone(),
            mock_name,
            stubs,
            failures,
            text,
        }
    }

    /// Generate mocks for every entity of a file.
    pub fn generate_file(&self, file: &DeclarationFile, content: &str) -> Vec<EntityReport> {
        let reports: Vec<EntityReport> = file
            .entities
            .iter()
            .map(|entity| self.generate_entity(entity, content))
            .collect();
        let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
        info!(
            "generated {} mock(s) with {} failed declaration(s)",
            reports.len(),
            failed
        );
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ScanAttributeExtractor;
    use crate::template::Template;

    fn generator() -> MockGenerator<ScanAttributeExtractor> {
        MockGenerator::new(&GenConfig::default(), ScanAttributeExtractor)
    }

    fn entity(declarations: Vec<Declaration>) -> Entity {
        Entity {
            name: "Store".to_string(),
            access_level: String::new(),
            declarations,
        }
    }

    fn at(mut decl: Declaration, offset: u64) -> Declaration {
        decl.offset = offset;
        decl
    }

    #[test]
    fn failures_are_reported_and_others_rendered() {
        let report = generator().generate_entity(
            &entity(vec![
                at(Declaration::new("load()"), 10),
                at(Declaration::new("broken(a:b:)").with_param("a", "Int"), 20),
                at(Declaration::new("save(_:)").with_param("value", "Int"), 30),
            ]),
            "",
        );
        assert_eq!(report.stubs.len(), 2);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.name, "broken(a:b:)");
        assert_eq!(failure.offset, 20);
        assert_eq!(failure.stage, FailureStage::Build);
        assert_eq!(failure.code, OutputErrorCode::InternalError.code());
        assert!(report.text.is_some());
    }

    #[test]
    fn unrenderable_stubs_are_reported_at_render_stage() {
        let mut generator = generator();
        generator.options.templates.method = Template {
            name: "method",
            text: "func {{name}}({{params}}) {{{handler_body}",
        };
        let report = generator.generate_entity(
            &entity(vec![
                at(Declaration::new("load()"), 10),
                at(Declaration::new("broken(a:b:)").with_param("a", "Int"), 20),
                at(Declaration::new("save(_:)").with_param("value", "Int"), 30),
            ]),
            "",
        );
        assert!(report.stubs.is_empty());
        let stages: Vec<_> = report
            .failures
            .iter()
            .map(|f| (f.name.as_str(), f.offset, f.stage))
            .collect();
        assert_eq!(
            stages,
            vec![
                ("broken(a:b:)", 20, FailureStage::Build),
                ("load", 10, FailureStage::Render),
                ("save", 30, FailureStage::Render),
            ]
        );
        assert_eq!(report.failures[1].code, OutputErrorCode::RenderError.code());
        assert_eq!(
            report.text.as_deref(),
            Some("class StoreMock: Store {\n    init() {}\n\n}")
        );
    }

    #[test]
    fn unassembled_mock_keeps_stubs() {
        let mut generator = generator();
        generator.options.templates.mock_type = Template {
            name: "mock_type",
            text: "class {{mock_name}}: {{protocol}} {{footer}}",
        };
        let report = generator.generate_entity(
            &entity(vec![at(Declaration::new("count()").returning("Int"), 1)]),
            "",
        );
        assert_eq!(report.stubs.len(), 1);
        assert!(report.text.is_none());
        let failure = &report.failures[0];
        assert_eq!(failure.name, "Store");
        assert_eq!(failure.stage, FailureStage::Assemble);
        assert_eq!(failure.code, OutputErrorCode::RenderError.code());
    }

    #[test]
    fn stubs_follow_source_order() {
        let report = generator().generate_entity(
            &entity(vec![
                at(Declaration::new("second()"), 50),
                at(Declaration::new("first()"), 5),
            ]),
            "",
        );
        let names: Vec<_> = report.stubs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn overloads_get_distinct_handlers() {
        let report = generator().generate_entity(
            &entity(vec![
                at(Declaration::new("get(id:)").with_param("id", "Int").returning("String?"), 1),
                at(Declaration::new("get(name:)").with_param("name", "String").returning("String?"), 2),
            ]),
            "",
        );
        let idents: Vec<_> = report.stubs.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(idents, vec!["getId", "getName"]);
        assert!(report.stubs.iter().all(|s| s.tier == IdentifierTier::Medium));
        let text = report.text.unwrap();
        assert!(text.contains("var getIdHandler: ((Int) -> (String?))?"));
        assert!(text.contains("var getNameHandler: ((String) -> (String?))?"));
    }

    #[test]
    fn mock_type_wraps_indented_stubs() {
        let mut store = entity(vec![at(Declaration::new("count()").returning("Int"), 1)]);
        store.access_level = "public".to_string();
        let report = generator().generate_entity(&store, "");
        assert_eq!(report.mock_name, "StoreMock");
        let expected = "public class StoreMock: Store {
    public init() {}
    var countCallCount = 0
    var countHandler: (() -> (Int))?
    func count() -> Int {
        countCallCount += 1
        if let countHandler = countHandler {
            return countHandler()
        }
        return 0
    }
}";
        assert_eq!(report.text.unwrap(), expected);
    }

    #[test]
    fn generate_file_covers_all_entities() {
        let file = DeclarationFile {
            source: None,
            entities: vec![entity(vec![]), entity(vec![Declaration::new("a()")])],
        };
        let reports = generator().generate_file(&file, "");
        assert_eq!(reports.len(), 2);
        assert!(reports[0].stubs.is_empty());
        assert_eq!(reports[1].stubs.len(), 1);
    }
}
