// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, path::Path};

use folder::{MinecraftLocation, WorkLocation};
use install::Prepared;
use platform::DELIMITER;
use shared::{LAUNCHER_NAME, LAUNCHER_VERSION};
use version::{LEGACY_JVM_ARGUMENTS, interpret_args};

use crate::error::*;
use crate::options::LaunchOptions;

/// A classloader that needs to be told where the game archive is through a
/// system property.
const LAUNCHWRAPPER_MAIN_CLASS: &str = "net.minecraft.launchwrapper.Launch";

/// Builds the full argument vector for the VM: JVM arguments, the logging
/// argument, the main class, then the game arguments and the post-template
/// extras. The caller prepends the JVM executable (and any user JVM
/// arguments) before spawning.
///
/// Metadata that predates the `arguments` object falls back to a built-in
/// JVM template and the space-delimited `minecraftArguments` string.
/// `${key}` substitution is literal text replacement; placeholders this
/// launcher does not know stay intact.
pub fn build_arguments(
    location: &MinecraftLocation,
    work: &WorkLocation,
    prepared: &Prepared,
    natives_dir: &Path,
    options: &LaunchOptions,
) -> Result<Vec<String>> {
    let version_meta = &prepared.version_meta;
    let features = options.features();
    let legacy_game_args = version_meta["minecraftArguments"].as_str();

    let mut raw_args: Vec<String> = Vec::new();
    match legacy_game_args {
        None => {
            let jvm_args = version_meta["arguments"]["jvm"]
                .as_array()
                .ok_or_else(|| Error::InvalidVersionJson("arguments.jvm".to_string()))?;
            raw_args.extend(interpret_args(jvm_args, &features));
        }
        Some(_) => raw_args.extend(interpret_args(&LEGACY_JVM_ARGUMENTS, &features)),
    }

    if let Some(logging_argument) = &prepared.logging_argument {
        raw_args.push(logging_argument.clone());
    }

    let main_class = version_meta["mainClass"]
        .as_str()
        .ok_or_else(|| Error::InvalidVersionJson("mainClass".to_string()))?;
    if main_class == LAUNCHWRAPPER_MAIN_CLASS {
        raw_args.push(format!(
            "-Dminecraft.client.jar={}",
            prepared.version_jar.to_string_lossy()
        ));
    }
    raw_args.push(main_class.to_string());

    match legacy_game_args {
        None => {
            let game_args = version_meta["arguments"]["game"]
                .as_array()
                .ok_or_else(|| Error::InvalidVersionJson("arguments.game".to_string()))?;
            raw_args.extend(interpret_args(game_args, &features));
        }
        Some(legacy) => raw_args.extend(legacy.split(' ').map(str::to_string)),
    }

    let classpath = prepared
        .classpath_libs
        .iter()
        .map(|lib| lib.to_string_lossy().to_string())
        .collect::<Vec<String>>()
        .join(DELIMITER);

    let mut replacements: HashMap<&str, String> = HashMap::from([
        // Game
        ("auth_player_name", options.username.clone()),
        ("version_name", prepared.version_id.clone()),
        ("game_directory", work.root.to_string_lossy().to_string()),
        ("assets_root", location.assets.to_string_lossy().to_string()),
        ("assets_index_name", prepared.assets_id.clone()),
        ("auth_uuid", options.uuid.clone()),
        ("auth_access_token", options.token_argument.clone()),
        ("user_type", "mojang".to_string()),
        ("version_type", prepared.version_type.clone()),
        // Game (legacy)
        ("auth_session", options.legacy_token_argument.clone()),
        (
            "game_assets",
            prepared.assets_virtual_dir.to_string_lossy().to_string(),
        ),
        ("user_properties", "{}".to_string()),
        // JVM
        ("natives_directory", natives_dir.to_string_lossy().to_string()),
        ("launcher_name", LAUNCHER_NAME.to_string()),
        ("launcher_version", LAUNCHER_VERSION.to_string()),
        ("classpath", classpath),
    ]);
    if let Some((width, height)) = options.resolution {
        replacements.insert("resolution_width", width.to_string());
        replacements.insert("resolution_height", height.to_string());
    }

    let mut arguments: Vec<String> = raw_args
        .into_iter()
        .map(|mut arg| {
            for (key, value) in &replacements {
                arg = arg.replace(&format!("${{{key}}}"), value);
            }
            arg
        })
        .collect();

    if options.disable_multiplayer {
        arguments.push("--disableMultiplayer".to_string());
    }
    if options.disable_chat {
        arguments.push("--disableChat".to_string());
    }
    if let Some(server) = &options.server {
        arguments.extend(["--server".to_string(), server.ip.clone()]);
        if let Some(port) = server.port {
            arguments.extend(["--port".to_string(), port.to_string()]);
        }
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use config::launch::{LaunchConfig, Server};

    use super::*;

    fn prepared(version_meta: serde_json::Value) -> Prepared {
        Prepared {
            version_id: "1.20.1".to_string(),
            version_type: "release".to_string(),
            version_meta,
            version_jar: PathBuf::from("/mc/versions/1.20.1/1.20.1.jar"),
            assets_id: "5".to_string(),
            assets_virtual_dir: PathBuf::from("/mc/assets/virtual/5"),
            classpath_libs: vec![
                PathBuf::from("/mc/libraries/a.jar"),
                PathBuf::from("/mc/versions/1.20.1/1.20.1.jar"),
            ],
            native_libs: vec![],
            logging_argument: None,
            jvm_executable: None,
            jvm_version: None,
        }
    }

    fn modern_meta() -> serde_json::Value {
        json!({
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "jvm": ["-Djava.library.path=${natives_directory}", "-cp", "${classpath}"],
                "game": ["--username", "${auth_player_name}", "--uuid", "${auth_uuid}",
                         "--custom", "${some_modded_placeholder}"],
            },
        })
    }

    fn options() -> LaunchOptions {
        let mut options = LaunchOptions::new(&LaunchConfig::default(), None);
        options.username = "Steve".to_string();
        options.uuid = "069a79f444e94726a5befca90e38aaf5".to_string();
        options
    }

    #[test]
    fn placeholders_are_substituted_literally() {
        let location = MinecraftLocation::new("/mc");
        let work = WorkLocation::new("/work");
        let arguments = build_arguments(
            &location,
            &work,
            &prepared(modern_meta()),
            Path::new("/work/bin/x"),
            &options(),
        )
        .unwrap();
        assert!(arguments.contains(&"-Djava.library.path=/work/bin/x".to_string()));
        let classpath_at = arguments.iter().position(|arg| arg == "-cp").unwrap();
        assert_eq!(
            arguments[classpath_at + 1],
            format!(
                "/mc/libraries/a.jar{DELIMITER}/mc/versions/1.20.1/1.20.1.jar"
            )
        );
        assert!(arguments.contains(&"Steve".to_string()));
        // Unknown placeholders are left intact.
        assert!(arguments.contains(&"${some_modded_placeholder}".to_string()));
    }

    #[test]
    fn launchwrapper_gets_the_client_jar_property() {
        let mut meta = modern_meta();
        meta["mainClass"] = json!("net.minecraft.launchwrapper.Launch");
        let location = MinecraftLocation::new("/mc");
        let work = WorkLocation::new("/work");
        let arguments = build_arguments(
            &location,
            &work,
            &prepared(meta),
            Path::new("/work/bin/x"),
            &options(),
        )
        .unwrap();
        let main_at = arguments
            .iter()
            .position(|arg| arg == "net.minecraft.launchwrapper.Launch")
            .unwrap();
        assert_eq!(
            arguments[main_at - 1],
            "-Dminecraft.client.jar=/mc/versions/1.20.1/1.20.1.jar"
        );
    }

    #[test]
    fn legacy_metadata_uses_the_builtin_jvm_template() {
        let meta = json!({
            "mainClass": "net.minecraft.client.Minecraft",
            "minecraftArguments": "--username ${auth_player_name} --session ${auth_session}",
        });
        let location = MinecraftLocation::new("/mc");
        let work = WorkLocation::new("/work");
        let arguments = build_arguments(
            &location,
            &work,
            &prepared(meta),
            Path::new("/work/bin/x"),
            &options(),
        )
        .unwrap();
        assert!(arguments.contains(&"-Dminecraft.launcher.brand=slingshot".to_string()));
        // The anonymous legacy session token.
        assert!(arguments.contains(&"notok".to_string()));
    }

    #[test]
    fn extra_tokens_are_appended_after_substitution() {
        let mut options = options();
        options.disable_multiplayer = true;
        options.disable_chat = true;
        options.server = Some(Server {
            ip: "play.example.org".to_string(),
            port: Some(25570),
        });
        let location = MinecraftLocation::new("/mc");
        let work = WorkLocation::new("/work");
        let arguments = build_arguments(
            &location,
            &work,
            &prepared(modern_meta()),
            Path::new("/work/bin/x"),
            &options,
        )
        .unwrap();
        let tail: Vec<_> = arguments[arguments.len() - 6..].to_vec();
        assert_eq!(
            tail,
            vec![
                "--disableMultiplayer",
                "--disableChat",
                "--server",
                "play.example.org",
                "--port",
                "25570",
            ]
        );
    }

    #[test]
    fn resolution_is_only_substituted_when_requested() {
        let mut meta = modern_meta();
        meta["arguments"]["game"] = json!([
            {
                "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                "value": ["--width", "${resolution_width}", "--height", "${resolution_height}"],
            },
        ]);
        let location = MinecraftLocation::new("/mc");
        let work = WorkLocation::new("/work");
        let mut with_resolution = options();
        with_resolution.resolution = Some((854, 480));
        let arguments = build_arguments(
            &location,
            &work,
            &prepared(meta.clone()),
            Path::new("/work/bin/x"),
            &with_resolution,
        )
        .unwrap();
        assert!(arguments.contains(&"854".to_string()));
        let without = build_arguments(
            &location,
            &work,
            &prepared(meta),
            Path::new("/work/bin/x"),
            &options(),
        )
        .unwrap();
        assert!(!without.iter().any(|arg| arg == "--width"));
    }
}
