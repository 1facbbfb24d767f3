//! Build script for touchdeck-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates deck.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate deck.toml configuration at compile time
///
/// The firmware's own parser clamps out-of-range values at boot. This check
/// catches what it would silently ignore or fall back on: syntax errors,
/// misspelled sections and keys, and wrong value types.
fn validate_config() {
    println!("cargo:rerun-if-changed=deck.toml");

    let config_path = Path::new("deck.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: deck.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a deck.toml configuration file.             ║\n\
            ║  Please create one in the touchdeck-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read deck.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in deck.toml                         ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}\n",
                e
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_power(&config, &mut errors);
    validate_screens(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid deck configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

enum Kind {
    Int,
    Bool,
    Str,
}

const SECTIONS: &[(&str, &[(&str, Kind)])] = &[
    (
        "power",
        &[
            ("policy", Kind::Str),
            ("initial_brightness", Kind::Int),
            ("min_brightness", Kind::Int),
            ("wake_threshold", Kind::Int),
            ("wake_brightness", Kind::Int),
            ("dimmed_brightness", Kind::Int),
            ("idle_timeout_s", Kind::Int),
            ("restore", Kind::Str),
            ("restore_after_s", Kind::Int),
        ],
    ),
    (
        "input",
        &[
            ("debounce_ms", Kind::Int),
            ("touch_resets_inactivity", Kind::Bool),
        ],
    ),
    (
        "loop",
        &[
            ("gui_interval_ms", Kind::Int),
            ("diagnostics_interval_s", Kind::Int),
        ],
    ),
    (
        "panel",
        &[
            ("width", Kind::Int),
            ("height", Kind::Int),
            ("buffer_lines", Kind::Int),
            ("swap_xy", Kind::Bool),
            ("invert_x", Kind::Bool),
            ("invert_y", Kind::Bool),
        ],
    ),
];

fn kind_matches(kind: &Kind, value: &toml::Value) -> bool {
    match kind {
        Kind::Int => matches!(value, toml::Value::Integer(v) if *v >= 0),
        Kind::Bool => value.is_bool(),
        Kind::Str => value.is_str(),
    }
}

/// Check section names, key names and value types
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        if name == "screen" {
            continue;
        }
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| *s == name.as_str()) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in table {
            match keys.iter().find(|(k, _)| *k == key.as_str()) {
                Some((_, kind)) if !kind_matches(kind, value) => {
                    errors.push(format!("[{}] {} has the wrong type", name, key));
                }
                Some(_) => {}
                None => errors.push(format!("[{}] unknown key '{}'", name, key)),
            }
        }
    }
}

fn validate_power(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(power) = config.get("power").and_then(|p| p.as_table()) else {
        return;
    };

    if let Some(toml::Value::String(policy)) = power.get("policy") {
        if policy != "dimming" && policy != "sleeping" {
            errors.push(format!("[power] unknown policy '{}'", policy));
        }
    }

    if let Some(toml::Value::String(restore)) = power.get("restore") {
        if restore != "touch" && restore != "after_idle" {
            errors.push(format!("[power] unknown restore mode '{}'", restore));
        }
    }
}

fn validate_screens(config: &toml::Value, errors: &mut Vec<String>) {
    let screens = match config.get("screen") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[screen] must hold named tables".to_string());
            return;
        }
        None => return,
    };

    if screens.len() > 8 {
        errors.push(format!("{} screens defined, at most 8 fit", screens.len()));
    }

    for (name, screen) in screens {
        if name.len() > 16 {
            errors.push(format!("[screen.{}] name longer than 16 bytes", name));
        }
        let Some(screen) = screen.as_table() else {
            errors.push(format!("[screen.{}] must be a table", name));
            continue;
        };
        for (key, value) in screen {
            match key.as_str() {
                "inactivity" | "inactivity_s" => {
                    if !kind_matches(&Kind::Int, value) {
                        errors.push(format!("[screen.{}] {} must be seconds", name, key));
                    }
                }
                _ => errors.push(format!("[screen.{}] unknown key '{}'", name, key)),
            }
        }
    }
}
