//! Overload-collision resolution.
//!
//! All stubs of one mock type share a namespace, so overloaded methods need
//! distinct call counter and handler names. For every method the resolver
//! picks the shortest [`IdentifierTier`] that no sibling shares at the same
//! tier, then escalates any methods whose chosen identifiers still collide
//! across tiers (`fooB()` next to `foo(b:)`).

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{IdentifierTier, MethodModel};

/// Choose an identifier tier for each model, in input order.
pub fn resolve_tiers(models: &[MethodModel]) -> Vec<IdentifierTier> {
    let mut tiers: Vec<IdentifierTier> = models
        .iter()
        .map(|model| shortest_unique_tier(model, models))
        .collect();

    loop {
        let counts = identifier_counts(models, &tiers);
        let mut changed = false;
        for (model, tier) in models.iter().zip(tiers.iter_mut()) {
            if counts[model.identifier(*tier)] > 1 {
                if let Some(next) = tier.next() {
                    debug!(
                        "escalating {} from {:?} to {:?}",
                        model.identifier(*tier),
                        tier,
                        next
                    );
                    *tier = next;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let counts = identifier_counts(models, &tiers);
    for (model, tier) in models.iter().zip(&tiers) {
        let identifier = model.identifier(*tier);
        if counts[identifier] > 1 {
            warn!(
                "'{}' at offset {} has the same signature as another method; stubs will collide",
                identifier, model.offset
            );
        }
    }

    tiers
}

fn shortest_unique_tier(model: &MethodModel, siblings: &[MethodModel]) -> IdentifierTier {
    IdentifierTier::ALL
        .into_iter()
        .find(|&tier| {
            let identifier = model.identifier(tier);
            siblings
                .iter()
                .filter(|other| other.identifier(tier) == identifier)
                .count()
                == 1
        })
        .unwrap_or(IdentifierTier::Full)
}

fn identifier_counts<'a>(
    models: &'a [MethodModel],
    tiers: &[IdentifierTier],
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for (model, tier) in models.iter().zip(tiers) {
        *counts.entry(model.identifier(*tier)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Declaration;

    fn model(decl: Declaration) -> MethodModel {
        let none = |_: &Declaration, _: &str, _: &str| Vec::<String>::new();
        MethodModel::build(&decl, "", &none).unwrap()
    }

    fn chosen(models: &[MethodModel]) -> Vec<String> {
        resolve_tiers(models)
            .into_iter()
            .zip(models)
            .map(|(tier, m)| m.identifier(tier).to_string())
            .collect()
    }

    #[test]
    fn distinct_names_use_name() {
        let models = vec![
            model(Declaration::new("load()")),
            model(Declaration::new("save(data:)").with_param("data", "Data")),
        ];
        assert_eq!(
            resolve_tiers(&models),
            vec![IdentifierTier::Name, IdentifierTier::Name]
        );
    }

    #[test]
    fn overloads_by_param_name_use_medium() {
        let models = vec![
            model(Declaration::new("fetch(id:)").with_param("id", "Int")),
            model(Declaration::new("fetch(name:)").with_param("name", "String")),
            model(Declaration::new("reset()")),
        ];
        assert_eq!(chosen(&models), vec!["fetchId", "fetchName", "reset"]);
    }

    #[test]
    fn overloads_by_return_type_use_long() {
        let models = vec![
            model(Declaration::new("value(for:)").with_param("key", "String").returning("Int")),
            model(Declaration::new("value(for:)").with_param("key", "String").returning("Bool")),
        ];
        assert_eq!(chosen(&models), vec!["valueKeyInt", "valueKeyBool"]);
    }

    #[test]
    fn overloads_by_label_only_use_full() {
        let models = vec![
            model(Declaration::new("move(to:)").with_param("point", "Point")),
            model(Declaration::new("move(by:)").with_param("point", "Point")),
        ];
        assert_eq!(chosen(&models), vec!["moveToPoint", "moveByPoint"]);
    }

    #[test]
    fn cross_tier_collision_is_escalated() {
        let models = vec![
            model(Declaration::new("fooB()")),
            model(Declaration::new("foo(b:)").with_param("b", "Int")),
            model(Declaration::new("foo()")),
        ];
        let names = chosen(&models);
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len(), "collision in {names:?}");
    }

    #[test]
    fn identical_signatures_stay_at_full() {
        let models = vec![
            model(Declaration::new("foo()")),
            model(Declaration::new("foo()")),
        ];
        assert_eq!(
            resolve_tiers(&models),
            vec![IdentifierTier::Full, IdentifierTier::Full]
        );
    }

    #[test]
    fn empty_input() {
        assert!(resolve_tiers(&[]).is_empty());
    }
}
