// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use platform::PLATFORM_INFO;
use regex::Regex;
use serde_json::Value;

/// Walks an ordered rule list and returns whether the gated item applies
/// to this platform and feature set.
///
/// Every rule that matches the platform and the caller features sets the
/// accumulator to its action; rules that do not match are skipped. The
/// initial state is deny, so an empty list denies.
///
/// The output depends only on the probed platform and the given features.
pub fn interpret_rules(rules: &[Value], features: &HashMap<String, bool>) -> bool {
    let mut allowed = false;
    for rule in rules {
        if !rule_matches_os(rule) || !rule_matches_features(rule, features) {
            continue;
        }
        match rule["action"].as_str() {
            Some("allow") => allowed = true,
            Some("disallow") => allowed = false,
            _ => {}
        }
    }
    allowed
}

fn rule_matches_os(rule: &Value) -> bool {
    let Some(os) = rule["os"].as_object() else {
        return true;
    };
    if let Some(name) = os.get("name").and_then(Value::as_str)
        && name != PLATFORM_INFO.os_family.to_string()
    {
        return false;
    }
    if let Some(arch) = os.get("arch").and_then(Value::as_str)
        && arch != PLATFORM_INFO.arch
    {
        return false;
    }
    if let Some(version) = os.get("version").and_then(Value::as_str)
        && !Regex::new(version)
            .map(|regex| regex.is_match(&PLATFORM_INFO.os_version))
            .unwrap_or(false)
    {
        return false;
    }
    true
}

fn rule_matches_features(rule: &Value, features: &HashMap<String, bool>) -> bool {
    let Some(wanted) = rule["features"].as_object() else {
        return true;
    };
    wanted.iter().all(|(name, expected)| {
        expected
            .as_bool()
            .is_some_and(|expected| features.get(name) == Some(&expected))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn no_features() -> HashMap<String, bool> {
        HashMap::new()
    }

    #[test]
    fn empty_rule_list_denies() {
        assert!(!interpret_rules(&[], &no_features()));
    }

    #[test]
    fn later_rules_override_earlier_ones() {
        let rules = [json!({"action": "allow"}), json!({"action": "disallow"})];
        assert!(!interpret_rules(&rules, &no_features()));
        let rules = [json!({"action": "disallow"}), json!({"action": "allow"})];
        assert!(interpret_rules(&rules, &no_features()));
    }

    #[test]
    fn os_name_gates_a_rule() {
        let this_os = PLATFORM_INFO.os_family.to_string();
        let rules = [json!({"action": "allow", "os": {"name": this_os}})];
        assert!(interpret_rules(&rules, &no_features()));
        let rules = [json!({"action": "allow", "os": {"name": "commodore64"}})];
        assert!(!interpret_rules(&rules, &no_features()));
    }

    #[test]
    fn os_version_is_matched_as_regex() {
        let rules = [json!({"action": "allow", "os": {"version": "."}})];
        assert!(interpret_rules(&rules, &no_features()));
        let rules = [json!({"action": "allow", "os": {"version": "^never-a-version$"}})];
        assert!(!interpret_rules(&rules, &no_features()));
    }

    #[test]
    fn features_must_all_match() {
        let rules = [json!({
            "action": "allow",
            "features": {"is_demo_user": true, "has_custom_resolution": false},
        })];
        let mut features = HashMap::new();
        features.insert("is_demo_user".to_string(), true);
        // Absent keys count as mismatch.
        assert!(!interpret_rules(&rules, &features));
        features.insert("has_custom_resolution".to_string(), false);
        assert!(interpret_rules(&rules, &features));
        features.insert("has_custom_resolution".to_string(), true);
        assert!(!interpret_rules(&rules, &features));
    }

    #[test]
    fn output_is_stable_for_identical_inputs() {
        let rules = [
            json!({"action": "allow"}),
            json!({"action": "disallow", "os": {"name": "commodore64"}}),
        ];
        let first = interpret_rules(&rules, &no_features());
        for _ in 0..10 {
            assert_eq!(interpret_rules(&rules, &no_features()), first);
        }
    }
}
