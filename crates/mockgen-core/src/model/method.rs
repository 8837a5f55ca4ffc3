//! Method model: builds identifiers from a declaration and renders the stub.

use tracing::{debug, warn};

use crate::attributes::AttributeExtractor;
use crate::error::{MockGenError, MockGenResult};
use crate::model::{ClosureModel, IdentifierTier, Identifiers, ParamModel, RenderOptions};
use crate::template::{expand_template, TemplateVars};
use crate::typename::{default_value, display_for_type, DefaultValue};
use crate::types::{Declaration, AVAILABLE_ATTRIBUTE_KIND, STATIC_KIND, UNKNOWN_TYPE};

/// A mockable method, derived from one [`Declaration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    pub identifiers: Identifiers,
    /// Return type to render; empty when unknown.
    pub return_type: String,
    pub offset: u64,
    pub access_level: String,
    pub attributes: Vec<String>,
    pub default_value: DefaultValue,
    pub static_kind: String,
    pub params: Vec<ParamModel>,
    pub handler: ClosureModel,
}

impl MethodModel {
    /// Build the model for `decl`.
    ///
    /// `content` is the source text the declaration was parsed from; it is
    /// only handed to `extractor`, and only when the declaration carries an
    /// `@available` attribute.
    ///
    /// # Errors
    ///
    /// Returns `InputContractViolation` when the argument labels in the name
    /// do not line up with the parameter nodes, and `InvalidInput` when the
    /// name has no base identifier.
    pub fn build<E>(decl: &Declaration, content: &str, extractor: &E) -> MockGenResult<Self>
    where
        E: AttributeExtractor + ?Sized,
    {
        let mut fragments = decl
            .name
            .split([':', '(', ')'])
            .filter(|fragment| !fragment.is_empty());
        let name = fragments
            .next()
            .ok_or_else(|| MockGenError::InvalidInput {
                message: format!("declaration at offset {} has no name", decl.offset),
            })?
            .to_string();
        let labels: Vec<&str> = fragments.collect();

        let return_type = if decl.type_name == UNKNOWN_TYPE {
            String::new()
        } else {
            decl.type_name.clone()
        };
        let static_kind = if decl.is_static {
            STATIC_KIND.to_string()
        } else {
            String::new()
        };

        let param_decls: Vec<_> = decl.param_decls().collect();
        if param_decls.len() != labels.len() {
            return Err(MockGenError::InputContractViolation {
                name: decl.name.clone(),
                offset: decl.offset,
                labels: labels.len(),
                params: param_decls.len(),
            });
        }

        let params: Vec<ParamModel> = param_decls
            .iter()
            .zip(&labels)
            .enumerate()
            .map(|(index, (param, label))| ParamModel::new(param, label, index))
            .collect();

        let return_display = display_for_type(&return_type);
        let medium_name = format!(
            "{}{}",
            name,
            params.iter().map(ParamModel::name_token).collect::<String>()
        );
        let long_name = format!("{}{}", medium_name, return_display);
        let full_name = format!(
            "{}{}{}",
            name,
            params
                .iter()
                .map(|p| p.label_token() + &display_for_type(&p.type_name))
                .collect::<String>(),
            return_display
        );
        let identifiers = Identifiers {
            name,
            medium_name,
            long_name,
            full_name,
        };

        // An explicit default only applies to methods that return a value.
        let default_value = match (default_value(&return_type), &decl.default_value) {
            (DefaultValue::Void, _) => DefaultValue::Void,
            (_, Some(expr)) => DefaultValue::Literal(expr.clone()),
            (derived, None) => derived,
        };

        let handler = ClosureModel {
            identifiers: identifiers.clone(),
            param_names: params.iter().map(|p| p.name.clone()).collect(),
            param_types: params.iter().map(|p| p.type_name.clone()).collect(),
            return_type: return_type.clone(),
            static_kind: static_kind.clone(),
            default_value: default_value.clone(),
        };

        let attributes = if decl.has_available_attribute() {
            extractor.extract(decl, content, AVAILABLE_ATTRIBUTE_KIND)
        } else {
            Vec::new()
        };

        debug!(
            "built model for {}: medium={} long={} full={}",
            decl.name, identifiers.medium_name, identifiers.long_name, identifiers.full_name
        );

        Ok(MethodModel {
            identifiers,
            return_type,
            offset: decl.offset,
            access_level: decl.access_level.clone(),
            attributes,
            default_value,
            static_kind,
            params,
            handler,
        })
    }

    /// Base name with labels stripped.
    pub fn name(&self) -> &str {
        &self.identifiers.name
    }

    pub fn medium_name(&self) -> &str {
        &self.identifiers.medium_name
    }

    pub fn long_name(&self) -> &str {
        &self.identifiers.long_name
    }

    pub fn full_name(&self) -> &str {
        &self.identifiers.full_name
    }

    /// The identifier for `tier`.
    pub fn identifier(&self, tier: IdentifierTier) -> &str {
        self.identifiers.get(tier)
    }

    /// Tier of a chosen identifier string (name, medium, long, else full).
    pub fn tier_for(&self, identifier: &str) -> IdentifierTier {
        self.identifiers.tier_of(identifier)
    }

    /// Render the stub using the identifiers of `tier`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateRenderFailure` if the handler or method template
    /// cannot be expanded.
    pub fn try_render(&self, tier: IdentifierTier, options: &RenderOptions) -> MockGenResult<String> {
        let mut params = Vec::with_capacity(self.params.len());
        let mut kept = Vec::with_capacity(self.params.len());
        for param in &self.params {
            match param.render(&options.templates.param) {
                Some(rendered) => {
                    params.push(rendered);
                    kept.push(param);
                }
                None => warn!("dropping parameter '{}' of {}", param.name, self.name()),
            }
        }

        // The handler takes exactly the parameters the stub declares.
        let mut handler = self.handler.clone();
        handler.param_names = kept.iter().map(|p| p.name.clone()).collect();
        handler.param_types = kept.iter().map(|p| p.type_name.clone()).collect();

        let handler_var = handler.handler_name(tier, options);
        let handler_body = handler.try_render(tier, options)?;

        let return_clause = if self.return_type.is_empty() {
            String::new()
        } else {
            format!(" -> {}", self.return_type)
        };
        let static_prefix = if self.static_kind.is_empty() {
            String::new()
        } else {
            format!("{} ", self.static_kind)
        };
        let acl = if self.access_level.is_empty() {
            String::new()
        } else {
            format!("{} ", self.access_level)
        };
        let attributes: String = self
            .attributes
            .iter()
            .map(|attr| format!("{}\n", attr))
            .collect();

        let vars = TemplateVars::new()
            .with("name", self.name())
            .with("identifier", self.identifier(tier))
            .with("params", params.join(", "))
            .with("return_clause", return_clause)
            .with("static", static_prefix)
            .with("acl", acl)
            .with("attributes", attributes)
            .with("handler_var", handler_var)
            .with("handler_type", handler.handler_type())
            .with("handler_body", handler_body)
            .with("call_count_suffix", options.call_count_suffix.as_str());
        Ok(expand_template(&options.templates.method, &vars)?)
    }

    /// Render the stub using the identifiers of `tier`, or `None` on failure.
    pub fn render(&self, tier: IdentifierTier, options: &RenderOptions) -> Option<String> {
        match self.try_render(tier, options) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("failed to render {}: {}", self.name(), e);
                None
            }
        }
    }

    /// Render the stub for a chosen identifier string.
    pub fn render_identifier(&self, identifier: &str, options: &RenderOptions) -> Option<String> {
        self.render(self.tier_for(identifier), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ScanAttributeExtractor;
    use crate::template::Template;
    use crate::types::{AttributeRef, Substructure, SubstructureKind};

    fn no_attributes(_: &Declaration, _: &str, _: &str) -> Vec<String> {
        Vec::new()
    }

    fn build(decl: &Declaration) -> MockGenResult<MethodModel> {
        MethodModel::build(decl, "", &no_attributes)
    }

    mod build_tests {
        use super::*;

        #[test]
        fn single_labeled_param_unknown_return() {
            let decl = Declaration::new("foo(bar:)").with_param("b", "Int");
            let model = build(&decl).unwrap();
            assert_eq!(model.name(), "foo");
            assert_eq!(model.medium_name(), "fooB");
            assert_eq!(model.long_name(), "fooB");
            assert_eq!(model.full_name(), "fooBarInt");
            assert_eq!(model.return_type, "");
            assert_eq!(model.default_value, DefaultValue::Void);
        }

        #[test]
        fn zero_params_with_return() {
            let decl = Declaration::new("baz()").returning("String");
            let model = build(&decl).unwrap();
            assert_eq!(model.medium_name(), "baz");
            assert_eq!(model.long_name(), "bazString");
            assert_eq!(model.full_name(), "bazString");
            assert_eq!(model.default_value, DefaultValue::Literal("\"\"".to_string()));
        }

        #[test]
        fn count_mismatch_is_contract_violation() {
            let decl = Declaration::new("foo(bar:baz:)").with_param("b", "Int");
            match build(&decl) {
                Err(MockGenError::InputContractViolation { labels, params, .. }) => {
                    assert_eq!(labels, 2);
                    assert_eq!(params, 1);
                }
                other => panic!("expected contract violation, got {other:?}"),
            }
        }

        #[test]
        fn extra_param_is_contract_violation() {
            let decl = Declaration::new("foo()").with_param("b", "Int");
            assert!(matches!(
                build(&decl),
                Err(MockGenError::InputContractViolation { labels: 0, params: 1, .. })
            ));
        }

        #[test]
        fn empty_name_is_invalid_input() {
            let decl = Declaration::new("()");
            assert!(matches!(
                build(&decl),
                Err(MockGenError::InvalidInput { .. })
            ));
        }

        #[test]
        fn non_parameter_children_are_ignored() {
            let mut decl = Declaration::new("load(url:)").with_param("url", "URL");
            decl.substructures.insert(
                0,
                Substructure {
                    kind: SubstructureKind::Other,
                    name: "body".to_string(),
                    type_name: UNKNOWN_TYPE.to_string(),
                },
            );
            let model = build(&decl).unwrap();
            assert_eq!(model.params.len(), 1);
            assert_eq!(model.medium_name(), "loadUrl");
        }

        #[test]
        fn anonymous_label_uses_name_in_full() {
            let decl = Declaration::new("set(_:forKey:)")
                .with_param("value", "Int")
                .with_param("key", "String");
            let model = build(&decl).unwrap();
            assert_eq!(model.medium_name(), "setValueKey");
            assert_eq!(model.full_name(), "setValueIntForKeyString");
        }

        #[test]
        fn static_marker_and_access_level_carried() {
            let mut decl = Declaration::new("shared()").returning("Self");
            decl.is_static = true;
            decl.access_level = "public".to_string();
            decl.offset = 120;
            let model = build(&decl).unwrap();
            assert_eq!(model.static_kind, STATIC_KIND);
            assert_eq!(model.handler.static_kind, STATIC_KIND);
            assert_eq!(model.access_level, "public");
            assert_eq!(model.offset, 120);
        }

        #[test]
        fn handler_mirrors_identifiers() {
            let decl = Declaration::new("fetch(for:)")
                .with_param("key", "String")
                .returning("Int?");
            let model = build(&decl).unwrap();
            assert_eq!(model.handler.identifiers, model.identifiers);
            assert_eq!(model.handler.param_names, vec!["key".to_string()]);
            assert_eq!(model.handler.param_types, vec!["String".to_string()]);
            assert_eq!(model.handler.return_type, "Int?");
            assert_eq!(model.long_name(), "fetchKeyIntOptional");
        }

        #[test]
        fn explicit_default_value_wins() {
            let mut decl = Declaration::new("image()").returning("UIImage");
            assert_eq!(build(&decl).unwrap().default_value, DefaultValue::Placeholder);
            decl.default_value = Some("UIImage()".to_string());
            assert_eq!(
                build(&decl).unwrap().default_value,
                DefaultValue::Literal("UIImage()".to_string())
            );
        }

        #[test]
        fn explicit_default_ignored_without_return_value() {
            let mut decl = Declaration::new("reset()");
            decl.default_value = Some("nil".to_string());
            let model = build(&decl).unwrap();
            assert_eq!(model.default_value, DefaultValue::Void);
            assert_eq!(model.handler.default_value, DefaultValue::Void);
            let text = model
                .render(IdentifierTier::Name, &RenderOptions::default())
                .unwrap();
            assert!(!text.contains("return"));
        }

        #[test]
        fn attributes_only_extracted_when_flagged() {
            let content = "@available(iOS 13, *)\nfunc foo()";
            let mut decl = Declaration::new("foo()");
            decl.offset = content.find("func").unwrap() as u64;
            let model = MethodModel::build(&decl, content, &ScanAttributeExtractor).unwrap();
            assert!(model.attributes.is_empty());

            decl.attributes.push(AttributeRef {
                kind: AVAILABLE_ATTRIBUTE_KIND.to_string(),
                span: None,
            });
            let model = MethodModel::build(&decl, content, &ScanAttributeExtractor).unwrap();
            assert_eq!(model.attributes, vec!["@available(iOS 13, *)".to_string()]);
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn renders_full_stub() {
            let decl = Declaration::new("fetch(for:)")
                .with_param("key", "String")
                .returning("Int");
            let model = build(&decl).unwrap();
            let text = model
                .render(IdentifierTier::Name, &RenderOptions::default())
                .unwrap();
            let expected = "var fetchCallCount = 0
var fetchHandler: ((String) -> (Int))?
func fetch(for key: String) -> Int {
    fetchCallCount += 1
    if let fetchHandler = fetchHandler {
        return fetchHandler(key)
    }
    return 0
}";
            assert_eq!(text, expected);
        }

        #[test]
        fn static_public_void_stub() {
            let mut decl = Declaration::new("reset(_:)").with_param("flag", "Bool");
            decl.is_static = true;
            decl.access_level = "public".to_string();
            let model = build(&decl).unwrap();
            let text = model
                .render(IdentifierTier::Medium, &RenderOptions::default())
                .unwrap();
            let expected = "public static var resetFlagCallCount = 0
public static var resetFlagHandler: ((Bool) -> ())?
public static func reset(_ flag: Bool) {
    resetFlagCallCount += 1
    if let resetFlagHandler = resetFlagHandler {
        resetFlagHandler(flag)
    }
}";
            assert_eq!(text, expected);
        }

        #[test]
        fn attributes_precede_func() {
            let mut decl = Declaration::new("foo()");
            decl.attributes.push(AttributeRef {
                kind: AVAILABLE_ATTRIBUTE_KIND.to_string(),
                span: None,
            });
            let fixed = |_: &Declaration, _: &str, _: &str| vec!["@available(iOS 13, *)".to_string()];
            let model = MethodModel::build(&decl, "", &fixed).unwrap();
            let text = model
                .render(IdentifierTier::Name, &RenderOptions::default())
                .unwrap();
            assert!(text.contains("var fooHandler: (() -> ())?\n@available(iOS 13, *)\nfunc foo() {"));
        }

        #[test]
        fn stub_and_handler_names_follow_tier() {
            let decl = Declaration::new("fetch(for:)")
                .with_param("key", "String")
                .returning("Int");
            let model = build(&decl).unwrap();
            let opts = RenderOptions::default();
            for tier in IdentifierTier::ALL {
                let text = model.render(tier, &opts).unwrap();
                let ident = model.identifier(tier);
                assert!(text.contains(&format!("var {}CallCount = 0", ident)));
                assert!(text.contains(&format!("var {}Handler: ", ident)));
                assert!(text.contains(&format!("if let {0}Handler = {0}Handler", ident)));
                assert!(text.contains("func fetch(for key: String) -> Int"));
            }
        }

        #[test]
        fn render_identifier_matches_tier_render() {
            let decl = Declaration::new("fetch(for:)")
                .with_param("key", "String")
                .returning("Int");
            let model = build(&decl).unwrap();
            let opts = RenderOptions::default();
            assert_eq!(
                model.render_identifier("fetchKey", &opts),
                model.render(IdentifierTier::Medium, &opts)
            );
            assert_eq!(
                model.render_identifier("not-an-identifier", &opts),
                model.render(IdentifierTier::Full, &opts)
            );
        }

        #[test]
        fn rendering_is_idempotent() {
            let decl = Declaration::new("load(url:completion:)")
                .with_param("url", "URL")
                .with_param("completion", "@escaping (Data?) -> Void");
            let model = build(&decl).unwrap();
            let opts = RenderOptions::default();
            let first = model.render(IdentifierTier::Full, &opts);
            let second = model.render(IdentifierTier::Full, &opts);
            assert!(first.is_some());
            assert_eq!(first, second);
        }

        #[test]
        fn unrenderable_param_is_dropped() {
            let decl = Declaration::new("foo(a:b:)")
                .with_param("a", "Int")
                .with_param("b", UNKNOWN_TYPE);
            let model = build(&decl).unwrap();
            let text = model
                .render(IdentifierTier::Name, &RenderOptions::default())
                .unwrap();
            let expected = "var fooCallCount = 0
var fooHandler: ((Int) -> ())?
func foo(a: Int) {
    fooCallCount += 1
    if let fooHandler = fooHandler {
        fooHandler(a)
    }
}";
            assert_eq!(text, expected);
        }

        #[test]
        fn broken_handler_template_renders_nothing() {
            let model = build(&Declaration::new("count()").returning("Int")).unwrap();
            let mut opts = RenderOptions::default();
            opts.templates.closure = Template {
                name: "closure",
                text: "{{handler}}({{arguments}})",
            };
            assert!(model.render(IdentifierTier::Name, &opts).is_none());
            assert!(matches!(
                model.try_render(IdentifierTier::Name, &opts),
                Err(MockGenError::TemplateRenderFailure { .. })
            ));
        }

        #[test]
        fn broken_method_template_renders_nothing() {
            let model = build(&Declaration::new("count()").returning("Int")).unwrap();
            let mut opts = RenderOptions::default();
            opts.templates.method = Template {
                name: "method",
                text: "func {{name}}() {{{handler_body}",
            };
            assert!(model.render(IdentifierTier::Name, &opts).is_none());
        }
    }
}
