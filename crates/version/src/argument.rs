// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::rules::interpret_rules;

/// Flattens a mixed list of argument tokens into plain strings.
///
/// A token is either a literal string or an object whose optional `rules`
/// gate its inclusion; the object's `value` is a string appended as-is or a
/// list whose elements are all appended.
pub fn interpret_args(args: &[Value], features: &HashMap<String, bool>) -> Vec<String> {
    let mut interpreted = Vec::new();
    for arg in args {
        if let Some(literal) = arg.as_str() {
            interpreted.push(literal.to_string());
            continue;
        }
        if let Some(rules) = arg["rules"].as_array()
            && !interpret_rules(rules, features)
        {
            continue;
        }
        match &arg["value"] {
            Value::String(value) => interpreted.push(value.clone()),
            Value::Array(values) => {
                interpreted.extend(values.iter().filter_map(Value::as_str).map(str::to_string));
            }
            _ => {}
        }
    }
    interpreted
}

/// The JVM argument template used for metadata that predates the
/// `arguments` object, when only `minecraftArguments` is present.
pub static LEGACY_JVM_ARGUMENTS: Lazy<Vec<Value>> = Lazy::new(|| {
    vec![
        json!({
            "rules": [{"action": "allow", "os": {"name": "osx"}}],
            "value": ["-XstartOnFirstThread"]
        }),
        json!({
            "rules": [{"action": "allow", "os": {"name": "windows"}}],
            "value": "-XX:HeapDumpPath=MojangTricksIntelDriversForPerformance_javaw.exe_minecraft.exe.heapdump"
        }),
        json!({
            "rules": [{"action": "allow", "os": {"name": "windows", "version": "^10\\."}}],
            "value": ["-Dos.name=Windows 10", "-Dos.version=10.0"]
        }),
        json!("-Djava.library.path=${natives_directory}"),
        json!("-Dminecraft.launcher.brand=${launcher_name}"),
        json!("-Dminecraft.launcher.version=${launcher_version}"),
        json!("-cp"),
        json!("${classpath}"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn no_features() -> HashMap<String, bool> {
        HashMap::new()
    }

    #[test]
    fn literal_tokens_pass_through() {
        let args = [json!("--username"), json!("${auth_player_name}")];
        assert_eq!(
            interpret_args(&args, &no_features()),
            vec!["--username", "${auth_player_name}"]
        );
    }

    #[test]
    fn gated_tokens_expand_string_or_list_values() {
        let mut features = HashMap::new();
        features.insert("has_custom_resolution".to_string(), true);
        let args = [
            json!({
                "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                "value": ["--width", "${resolution_width}"]
            }),
            json!({
                "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                "value": "--demo"
            }),
        ];
        assert_eq!(
            interpret_args(&args, &features),
            vec!["--width", "${resolution_width}"]
        );
    }

    #[test]
    fn legacy_jvm_template_ends_with_classpath() {
        let interpreted = interpret_args(&LEGACY_JVM_ARGUMENTS, &no_features());
        let classpath_at = interpreted.iter().position(|arg| arg == "-cp").unwrap();
        assert_eq!(interpreted[classpath_at + 1], "${classpath}");
        assert!(interpreted.contains(&"-Djava.library.path=${natives_directory}".to_string()));
    }
}
