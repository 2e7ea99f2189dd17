use pcc_policy::Effect;
use pcc_resource::{flatten, parse, ComplianceCheckBlock, ConditionsBlock, RuleBlock};
use proptest::prelude::*;

fn effect() -> impl Strategy<Value = Option<Effect>> {
    prop_oneof![
        Just(None),
        Just(Some(Effect::Ignore)),
        Just(Some(Effect::Alert)),
        Just(Some(Effect::Block)),
        Just(Some(Effect::AlertBlock)),
    ]
}

fn check() -> impl Strategy<Value = ComplianceCheckBlock> {
    (any::<i64>(), any::<bool>()).prop_map(|(id, block)| ComplianceCheckBlock { id, block })
}

// Either no conditions block, or exactly one holding at least one check.
fn conditions() -> impl Strategy<Value = Vec<ConditionsBlock>> {
    prop_oneof![
        Just(Vec::new()),
        prop::collection::vec(check(), 1..6)
            .prop_map(|compliance_check| vec![ConditionsBlock { compliance_check }]),
    ]
}

fn rule() -> impl Strategy<Value = RuleBlock> {
    (
        ".{0,16}",
        prop::collection::vec("[a-z0-9-]{1,12}", 0..4),
        conditions(),
        any::<bool>(),
        effect(),
        "[a-zA-Z0-9 _-]{0,24}",
        ".{0,32}",
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(
                block_message,
                collections,
                conditions,
                disabled,
                effect,
                name,
                notes,
                show_passed_checks,
                verbose,
            )| RuleBlock {
                block_message,
                collections,
                conditions,
                disabled,
                effect,
                name,
                notes,
                show_passed_checks,
                verbose,
            },
        )
}

proptest! {
    #[test]
    fn flatten_inverts_parse(rules in prop::collection::vec(rule(), 0..8)) {
        let policy = parse(&rules).expect("canonical rules always parse");
        prop_assert_eq!(flatten(&policy.rules), rules);
    }

    #[test]
    fn parse_keeps_rule_count_and_order(rules in prop::collection::vec(rule(), 0..8)) {
        let policy = parse(&rules).unwrap();
        prop_assert_eq!(policy.rules.len(), rules.len());
        for (parsed, declared) in policy.rules.iter().zip(&rules) {
            prop_assert_eq!(&parsed.name, &declared.name);
            let declared_checks = declared
                .conditions
                .first()
                .map(|c| c.compliance_check.len())
                .unwrap_or(0);
            prop_assert_eq!(parsed.conditions.checks.len(), declared_checks);
        }
    }

    #[test]
    fn wire_json_preserves_rules(rules in prop::collection::vec(rule(), 0..4)) {
        // Zero-valued fields are omitted on the wire and defaulted on the way back
        let policy = parse(&rules).unwrap();
        let json = policy.to_json().unwrap();
        let back = pcc_policy::CompliancePolicy::from_json(&json).unwrap();
        prop_assert_eq!(flatten(&back.rules), rules);
    }
}
