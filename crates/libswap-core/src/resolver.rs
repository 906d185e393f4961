//! Variant resolution
//!
//! Picks the member of a target variant group that best corresponds to the
//! source instance's variant properties:
//!
//! 1. A member whose property map equals the source map exactly
//! 2. Otherwise the member with a property map agreeing on the most source
//!    pairs; the first such member wins ties, even at zero agreement
//! 3. Otherwise (no member declares properties) the first member

use libswap_model::{ComponentInfo, VariantGroup, VariantProps};

/// How a variant was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantMatch {
    /// Property maps are equal
    Exact,
    /// Best partial agreement
    Partial { matched: usize },
    /// No member declares properties; first member
    Fallback,
}

/// Selected group member
#[derive(Debug, Clone, Copy)]
pub struct ResolvedVariant<'a> {
    pub component: &'a ComponentInfo,
    pub quality: VariantMatch,
}

/// Resolve the best member of `group` for `source` properties
///
/// Never fails: a group always has at least one member.
#[must_use]
pub fn resolve_variant<'a>(group: &'a VariantGroup, source: &VariantProps) -> ResolvedVariant<'a> {
    let members = group.members();

    if let Some(component) = members
        .iter()
        .find(|member| member.variant_props.as_ref() == Some(source))
    {
        return ResolvedVariant {
            component,
            quality: VariantMatch::Exact,
        };
    }

    let mut best: Option<(&ComponentInfo, usize)> = None;
    for member in members {
        let Some(props) = &member.variant_props else {
            continue;
        };
        let matched = agreement(props, source);
        match best {
            Some((_, score)) if matched <= score => {}
            _ => best = Some((member, matched)),
        }
    }

    match best {
        Some((component, matched)) => ResolvedVariant {
            component,
            quality: VariantMatch::Partial { matched },
        },
        None => ResolvedVariant {
            component: group.first(),
            quality: VariantMatch::Fallback,
        },
    }
}

/// Number of source pairs present in `props` with equal value
fn agreement(props: &VariantProps, source: &VariantProps) -> usize {
    source
        .iter()
        .filter(|(name, value)| props.get(*name) == Some(*value))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswap_model::VariantGroupRef;
    use proptest::prelude::*;

    fn props(pairs: &[(&str, &str)]) -> VariantProps {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn group_of(members: Vec<Option<VariantProps>>) -> VariantGroup {
        let info = VariantGroupRef {
            node_id: "20:0".into(),
            key: "app-chip".into(),
            name: "Chip".to_string(),
        };
        let members = members
            .into_iter()
            .enumerate()
            .map(|(i, p)| ComponentInfo {
                variant_props: p,
                ..ComponentInfo::new(format!("20:{}", i + 1), format!("chip-{i}"), "Chip")
            })
            .collect();
        VariantGroup::new(info, members).unwrap()
    }

    fn group(members: Vec<VariantProps>) -> VariantGroup {
        group_of(members.into_iter().map(Some).collect())
    }

    #[test]
    fn exact_match_wins() {
        let g = group(vec![
            props(&[("State", "Default"), ("Size", "M")]),
            props(&[("State", "Active"), ("Size", "M")]),
        ]);
        let resolved = resolve_variant(&g, &props(&[("State", "Active"), ("Size", "M")]));
        assert_eq!(resolved.component.key.as_str(), "chip-1");
        assert_eq!(resolved.quality, VariantMatch::Exact);
    }

    #[test]
    fn best_partial_match() {
        let g = group(vec![
            props(&[("State", "Default"), ("Size", "S")]),
            props(&[("State", "Active"), ("Size", "S")]),
            props(&[("State", "Active"), ("Size", "L")]),
        ]);
        let resolved = resolve_variant(
            &g,
            &props(&[("State", "Active"), ("Size", "L"), ("Theme", "Dark")]),
        );
        assert_eq!(resolved.component.key.as_str(), "chip-2");
        assert_eq!(resolved.quality, VariantMatch::Partial { matched: 2 });
    }

    #[test]
    fn ties_keep_earliest_member() {
        let g = group(vec![
            props(&[("State", "Default"), ("Size", "M")]),
            props(&[("State", "Active"), ("Size", "S")]),
            props(&[("State", "Default"), ("Size", "S")]),
        ]);
        let resolved = resolve_variant(&g, &props(&[("State", "Active"), ("Size", "M")]));
        assert_eq!(resolved.component.key.as_str(), "chip-0");
    }

    #[test]
    fn zero_agreement_keeps_first_member_with_props() {
        let g = group(vec![props(&[("Tone", "Warm")]), props(&[("Tone", "Cool")])]);
        let resolved = resolve_variant(&g, &props(&[("State", "Active")]));
        assert_eq!(resolved.component.key.as_str(), "chip-0");
        assert_eq!(resolved.quality, VariantMatch::Partial { matched: 0 });
    }

    #[test]
    fn members_without_props_are_skipped_when_scoring() {
        let g = group_of(vec![None, Some(props(&[("State", "Active")]))]);
        let resolved = resolve_variant(&g, &props(&[("Tone", "Warm")]));
        assert_eq!(resolved.component.key.as_str(), "chip-1");
    }

    #[test]
    fn falls_back_to_first_member() {
        let g = group_of(vec![None, None]);
        let resolved = resolve_variant(&g, &props(&[("State", "Active")]));
        assert_eq!(resolved.component.key.as_str(), "chip-0");
        assert_eq!(resolved.quality, VariantMatch::Fallback);
    }

    #[test]
    fn empty_source_matches_empty_map_exactly() {
        let g = group(vec![props(&[("Tone", "Warm")]), VariantProps::new()]);
        let resolved = resolve_variant(&g, &VariantProps::new());
        assert_eq!(resolved.component.key.as_str(), "chip-1");
        assert_eq!(resolved.quality, VariantMatch::Exact);
    }

    fn arb_props() -> impl Strategy<Value = VariantProps> {
        prop::collection::btree_map(
            prop::sample::select(vec!["State", "Size", "Tone"]).prop_map(String::from),
            prop::sample::select(vec!["a", "b", "c"]).prop_map(String::from),
            0..3,
        )
    }

    proptest! {
        #[test]
        fn resolution_is_a_member(
            members in prop::collection::vec(arb_props(), 1..6),
            source in arb_props(),
        ) {
            let g = group(members);
            let resolved = resolve_variant(&g, &source);
            prop_assert!(g.members().iter().any(|m| m.key == resolved.component.key));
        }

        #[test]
        fn equal_member_is_always_found(
            members in prop::collection::vec(arb_props(), 1..6),
            pick in 0usize..6,
        ) {
            let source = members[pick % members.len()].clone();
            let g = group(members);
            let resolved = resolve_variant(&g, &source);
            prop_assert_eq!(resolved.quality, VariantMatch::Exact);
            prop_assert_eq!(resolved.component.variant_props.as_ref(), Some(&source));
        }

        #[test]
        fn chosen_member_has_maximal_agreement(
            members in prop::collection::vec(arb_props(), 1..6),
            source in arb_props(),
        ) {
            let g = group(members);
            let resolved = resolve_variant(&g, &source);
            let score = |m: &ComponentInfo| m.variant_props.as_ref().map_or(0, |p| agreement(p, &source));
            let best = g.members().iter().map(score).max().unwrap_or(0);
            if resolved.quality != VariantMatch::Exact {
                prop_assert_eq!(score(resolved.component), best);
            }
        }
    }
}
