use anyhow::Result;
use pcc_resource::{ResourceData, RuleBlock};
use std::path::Path;

use crate::state::StateFile;

/// Print the state file
pub fn show(state_path: &Path, format: &str) -> Result<()> {
    let data = StateFile::new(state_path).load()?;

    if format == "json" {
        let data = data.unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    match data {
        Some(data) => print_state(&data),
        None => println!("No state at {}", state_path.display()),
    }
    Ok(())
}

fn print_state(data: &ResourceData) {
    println!("=== Container Compliance Policy ===");
    println!("ID: {}", data.id.as_deref().unwrap_or("(not created)"));
    println!("Rules: {}", data.rule.len());

    for (i, rule) in data.rule.iter().enumerate() {
        println!();
        print_rule(i + 1, rule);
    }
}

fn print_rule(position: usize, rule: &RuleBlock) {
    let name = if rule.name.is_empty() {
        "(unnamed)"
    } else {
        rule.name.as_str()
    };
    println!("[{}] {}{}", position, name, if rule.disabled { " (disabled)" } else { "" });
    println!(
        "    Effect: {}",
        rule.effect.map(|e| e.as_str()).unwrap_or("-")
    );

    if !rule.collections.is_empty() {
        println!("    Collections: {}", rule.collections.join(", "));
    }

    let checks: Vec<String> = rule
        .conditions
        .iter()
        .flat_map(|c| &c.compliance_check)
        .map(|check| {
            format!(
                "{} ({})",
                check.id,
                if check.block { "block" } else { "alert" }
            )
        })
        .collect();
    if !checks.is_empty() {
        println!("    Checks: {}", checks.join(", "));
    }

    if rule.show_passed_checks {
        println!("    Reports passed checks");
    }
    if rule.verbose {
        println!("    Verbose");
    }
    if !rule.block_message.is_empty() {
        println!("    Block message: {}", rule.block_message);
    }
    if !rule.notes.is_empty() {
        println!("    Notes: {}", rule.notes);
    }
}
