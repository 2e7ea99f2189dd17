use pcc_policy::{
    Collection, ComplianceCheck, ComplianceConditions, CompliancePolicy, ComplianceRule,
};

use crate::error::SchemaError;
use crate::schema::{ComplianceCheckBlock, ConditionsBlock, RuleBlock, MAX_CONDITIONS_BLOCKS};

/// Build the console policy from declarative rule blocks, in order.
///
/// Typed input leaves only one failure: more than one `conditions` block on
/// a rule.
pub fn parse(rules: &[RuleBlock]) -> Result<CompliancePolicy, SchemaError> {
    let mut policy = CompliancePolicy::compliance_container();
    policy.rules = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| parse_rule(index, rule))
        .collect::<Result<_, _>>()?;
    Ok(policy)
}

fn parse_rule(index: usize, rule: &RuleBlock) -> Result<ComplianceRule, SchemaError> {
    if rule.conditions.len() > MAX_CONDITIONS_BLOCKS {
        return Err(SchemaError::TooManyConditions {
            index,
            name: rule.name.clone(),
            max: MAX_CONDITIONS_BLOCKS,
            count: rule.conditions.len(),
        });
    }

    Ok(ComplianceRule {
        block_message: rule.block_message.clone(),
        collections: rule.collections.iter().map(Collection::named).collect(),
        conditions: rule
            .conditions
            .first()
            .map(parse_conditions)
            .unwrap_or_default(),
        disabled: rule.disabled,
        effect: rule.effect,
        name: rule.name.clone(),
        notes: rule.notes.clone(),
        show_passed_checks: rule.show_passed_checks,
        verbose: rule.verbose,
    })
}

fn parse_conditions(block: &ConditionsBlock) -> ComplianceConditions {
    ComplianceConditions {
        checks: block
            .compliance_check
            .iter()
            .map(|check| ComplianceCheck {
                id: check.id,
                block: check.block,
            })
            .collect(),
    }
}

/// Inverse of [`parse`]: one rule block per console rule, same order.
pub fn flatten(rules: &[ComplianceRule]) -> Vec<RuleBlock> {
    rules.iter().map(flatten_rule).collect()
}

fn flatten_rule(rule: &ComplianceRule) -> RuleBlock {
    RuleBlock {
        block_message: rule.block_message.clone(),
        collections: rule.collections.iter().map(|c| c.name.clone()).collect(),
        conditions: flatten_conditions(&rule.conditions),
        disabled: rule.disabled,
        effect: rule.effect,
        name: rule.name.clone(),
        notes: rule.notes.clone(),
        show_passed_checks: rule.show_passed_checks,
        verbose: rule.verbose,
    }
}

// No checks flattens to no block, so an unset block reads back unchanged.
fn flatten_conditions(conditions: &ComplianceConditions) -> Vec<ConditionsBlock> {
    if conditions.is_empty() {
        return Vec::new();
    }
    vec![ConditionsBlock {
        compliance_check: conditions
            .checks
            .iter()
            .map(|check| ComplianceCheckBlock {
                block: check.block,
                id: check.id,
            })
            .collect(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcc_policy::{Effect, POLICY_TYPE_COMPLIANCE_CONTAINER};

    fn example_rule() -> RuleBlock {
        RuleBlock {
            name: "r1".to_string(),
            effect: Some(Effect::Block),
            collections: vec!["prod".to_string()],
            conditions: vec![ConditionsBlock {
                compliance_check: vec![ComplianceCheckBlock { id: 14, block: true }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_example_rule() {
        let policy = parse(&[example_rule()]).expect("parse failed");
        assert_eq!(policy.policy_type, POLICY_TYPE_COMPLIANCE_CONTAINER);
        assert_eq!(policy.rules.len(), 1);

        let rule = &policy.rules[0];
        assert_eq!(rule.name, "r1");
        assert_eq!(rule.effect, Some(Effect::Block));
        assert_eq!(rule.collections, vec![Collection::named("prod")]);
        assert_eq!(
            rule.conditions.checks,
            vec![ComplianceCheck { id: 14, block: true }]
        );
    }

    #[test]
    fn test_flatten_example_rule() {
        let policy = parse(&[example_rule()]).unwrap();
        assert_eq!(flatten(&policy.rules), vec![example_rule()]);
    }

    #[test]
    fn test_no_conditions_block_yields_no_checks() {
        let rule = RuleBlock {
            name: "bare".to_string(),
            ..Default::default()
        };
        let policy = parse(&[rule]).unwrap();
        assert!(policy.rules[0].conditions.checks.is_empty());
    }

    #[test]
    fn test_conditions_block_keeps_every_check() {
        let checks: Vec<ComplianceCheckBlock> = (1..=5)
            .map(|id| ComplianceCheckBlock {
                id,
                block: id % 2 == 0,
            })
            .collect();
        let rule = RuleBlock {
            conditions: vec![ConditionsBlock {
                compliance_check: checks.clone(),
            }],
            ..Default::default()
        };

        let parsed = parse(&[rule]).unwrap();
        let got = &parsed.rules[0].conditions.checks;
        assert_eq!(got.len(), 5);
        for (check, want) in got.iter().zip(&checks) {
            assert_eq!(check.id, want.id);
            assert_eq!(check.block, want.block);
        }
    }

    #[test]
    fn test_empty_conditions_block_flattens_to_nothing() {
        let rule = RuleBlock {
            conditions: vec![ConditionsBlock::default()],
            ..Default::default()
        };
        let parsed = parse(&[rule]).unwrap();
        assert!(flatten(&parsed.rules)[0].conditions.is_empty());
    }

    #[test]
    fn test_two_conditions_blocks_rejected() {
        let rule = RuleBlock {
            name: "double".to_string(),
            conditions: vec![ConditionsBlock::default(), ConditionsBlock::default()],
            ..Default::default()
        };
        let err = parse(&[example_rule(), rule]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TooManyConditions {
                index: 1,
                name: "double".to_string(),
                max: 1,
                count: 2,
            }
        );
    }

    #[test]
    fn test_empty_rule_list() {
        let policy = parse(&[]).unwrap();
        assert!(policy.rules.is_empty());
        assert!(flatten(&policy.rules).is_empty());
    }

    #[test]
    fn test_rule_order_preserved() {
        let rules: Vec<RuleBlock> = ["c", "a", "b"]
            .iter()
            .map(|name| RuleBlock {
                name: name.to_string(),
                ..Default::default()
            })
            .collect();

        let names: Vec<String> = flatten(&parse(&rules).unwrap().rules)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_scalar_fields_copied() {
        let rule = RuleBlock {
            block_message: "stop".to_string(),
            disabled: true,
            effect: Some(Effect::AlertBlock),
            name: "all".to_string(),
            notes: "owned by platform".to_string(),
            show_passed_checks: true,
            verbose: true,
            ..Default::default()
        };
        let parsed = parse(std::slice::from_ref(&rule)).unwrap();
        let got = &parsed.rules[0];
        assert_eq!(got.block_message, "stop");
        assert!(got.disabled);
        assert_eq!(got.effect, Some(Effect::AlertBlock));
        assert_eq!(got.notes, "owned by platform");
        assert!(got.show_passed_checks);
        assert!(got.verbose);
        assert_eq!(flatten(&parsed.rules), vec![rule]);
    }
}
