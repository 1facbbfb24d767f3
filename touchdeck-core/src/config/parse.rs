//! TOML-subset parser for device configuration
//!
//! This is a minimal parser that handles only the subset needed for
//! touchdeck configuration. It does NOT support the full TOML grammar and
//! needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - [screen.name] headers (also "screen name")
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Floats and datetimes
//!
//! Unknown keys are ignored so newer files still load on older firmware.

use heapless::String;

use super::types::{DeckConfig, PolicyKind, RestoreMode, ScreenConfig, MAX_NAME_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of the integer range
    InvalidValue,
    /// More screens than `MAX_SCREENS`
    TooManyItems,
    /// Screen name longer than `MAX_NAME_LEN` or empty
    NameTooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Power,
    Input,
    Loop,
    Panel,
    /// Index into `DeckConfig::screens`
    Screen(usize),
}

/// Parse TOML configuration into a [`DeckConfig`]
///
/// Values are returned as written; call [`DeckConfig::sanitized`] to clamp
/// them into range.
pub fn parse_config(input: &str) -> Result<DeckConfig, ParseError> {
    let mut config = DeckConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') || header.len() < 2 {
                return Err(ParseError::InvalidSection);
            }
            section = open_section(&header[1..header.len() - 1], &mut config)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse a section header and prepare storage for it
fn open_section(header: &str, config: &mut DeckConfig) -> Result<Section, ParseError> {
    let header = header.trim();

    let (kind, name) = match header.split_once('.') {
        Some((kind, name)) => (kind.trim(), Some(name.trim())),
        None => {
            let mut parts = header.split_whitespace();
            let kind = parts.next().ok_or(ParseError::InvalidSection)?;
            (kind, parts.next())
        }
    };

    match (kind, name) {
        ("power", None) => Ok(Section::Power),
        ("input", None) => Ok(Section::Input),
        ("loop", None) => Ok(Section::Loop),
        ("panel", None) => Ok(Section::Panel),
        ("screen", Some(name)) => {
            let name = parse_string(name);
            if name.is_empty() {
                return Err(ParseError::NameTooLong);
            }
            let name: String<MAX_NAME_LEN> =
                String::try_from(name).map_err(|_| ParseError::NameTooLong)?;
            config
                .screens
                .push(ScreenConfig {
                    name,
                    inactivity_s: 0,
                })
                .map_err(|_| ParseError::TooManyItems)?;
            Ok(Section::Screen(config.screens.len() - 1))
        }
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim(),
            _ => {}
        }
    }
    text.trim()
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, accepting TOML `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for ch in value.chars().filter(|c| *c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.as_str().parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a seconds value into milliseconds
fn parse_seconds_as_ms(value: &str) -> Result<u32, ParseError> {
    let seconds: u32 = parse_int(value)?;
    Ok(seconds.saturating_mul(1000))
}

/// Parse the power policy
fn parse_policy(value: &str) -> Result<PolicyKind, ParseError> {
    match parse_string(value) {
        "dimming" | "dim" | "Dimming" => Ok(PolicyKind::Dimming),
        "sleeping" | "sleep" | "Sleeping" => Ok(PolicyKind::Sleeping),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse restore mode
fn parse_restore(value: &str) -> Result<RestoreMode, ParseError> {
    match parse_string(value) {
        "touch" | "Touch" => Ok(RestoreMode::Touch),
        "after_idle" | "AfterIdle" => Ok(RestoreMode::AfterIdle),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeckConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Power => {
            let p = &mut config.power;
            match key {
                "policy" => p.policy = parse_policy(value)?,
                "initial_brightness" => p.initial_brightness = parse_int(value)?,
                "min_brightness" => p.min_brightness = parse_int(value)?,
                "wake_threshold" => p.wake_threshold = parse_int(value)?,
                "wake_brightness" => p.wake_brightness = parse_int(value)?,
                "dimmed_brightness" => p.dimmed_brightness = parse_int(value)?,
                "idle_timeout_s" => p.idle_timeout_ms = parse_seconds_as_ms(value)?,
                "restore" => p.restore = parse_restore(value)?,
                "restore_after_s" => p.restore_after_ms = parse_seconds_as_ms(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Input => {
            let i = &mut config.input;
            match key {
                "debounce_ms" => i.debounce_ms = parse_int(value)?,
                "touch_resets_inactivity" => i.touch_resets_inactivity = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Loop => {
            let l = &mut config.scheduler;
            match key {
                "gui_interval_ms" => l.gui_interval_ms = parse_int(value)?,
                "diagnostics_interval_s" => {
                    l.diagnostics_interval_ms = parse_seconds_as_ms(value)?
                }
                _ => {}
            }
        }
        Section::Panel => {
            let p = &mut config.panel;
            match key {
                "width" => p.width = parse_int(value)?,
                "height" => p.height = parse_int(value)?,
                "buffer_lines" => p.buffer_lines = parse_int(value)?,
                "swap_xy" => p.swap_xy = parse_bool(value)?,
                "invert_x" => p.invert_x = parse_bool(value)?,
                "invert_y" => p.invert_y = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Screen(index) => {
            let s = config
                .screens
                .get_mut(index)
                .ok_or(ParseError::InvalidSection)?;
            match key {
                "inactivity" | "inactivity_s" => s.inactivity_s = parse_int(value)?,
                _ => {}
            }
        }
        Section::Root => {
            // No root-level keys are defined
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_header() {
        let mut config = DeckConfig::new();
        assert_eq!(open_section("power", &mut config).unwrap(), Section::Power);
        assert_eq!(open_section(" loop ", &mut config).unwrap(), Section::Loop);
        assert_eq!(
            open_section("screen.home", &mut config).unwrap(),
            Section::Screen(0)
        );
        assert_eq!(
            open_section("screen settings", &mut config).unwrap(),
            Section::Screen(1)
        );
        assert_eq!(config.screens[1].name.as_str(), "settings");
        assert_eq!(
            open_section("stepper.spin", &mut config),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("30 # seconds"), "30");
        assert_eq!(strip_comment("\"a#b\" # note"), "\"a#b\"");
    }

    #[test]
    fn test_parse_int_with_separators() {
        let value: u32 = parse_int("60_000").unwrap();
        assert_eq!(value, 60_000);
        assert_eq!(parse_int::<u8>("300"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("-1"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Panel on the kitchen wall
[power]
policy = "dimming"
min_brightness = 20      # never fully dark
dimmed_brightness = 20
idle_timeout_s = 45
restore = "after_idle"
restore_after_s = 600

[input]
debounce_ms = 5
touch_resets_inactivity = false

[loop]
gui_interval_ms = 10
diagnostics_interval_s = 120

[panel]
width = 480
height = 320
buffer_lines = 20
swap_xy = true

[screen.home]
inactivity = 0

[screen.lights]
inactivity = 90
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.power.policy, PolicyKind::Dimming);
        assert_eq!(config.power.min_brightness, 20);
        assert_eq!(config.power.idle_timeout_ms, 45_000);
        assert_eq!(config.power.restore, RestoreMode::AfterIdle);
        assert_eq!(config.power.restore_after_ms, 600_000);
        assert!(!config.input.touch_resets_inactivity);
        assert_eq!(config.scheduler.diagnostics_interval_ms, 120_000);
        assert_eq!(config.panel.width, 480);
        assert_eq!(config.screens.len(), 2);
        assert_eq!(config.screens[1].name.as_str(), "lights");
        assert_eq!(config.screens[1].inactivity_s, 90);
    }

    #[test]
    fn test_parse_sleeping_policy() {
        let config = parse_config("[power]\npolicy = \"sleeping\"\n").unwrap();
        assert_eq!(config.power.policy, PolicyKind::Sleeping);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[power]\ncolor = \"blue\"\n").unwrap();
        assert_eq!(config.power, Default::default());
    }

    #[test]
    fn test_invalid_value_rejected() {
        assert_eq!(
            parse_config("[power]\npolicy = \"strobe\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[input]\ntouch_resets_inactivity = yes\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_screen_limits() {
        assert_eq!(
            parse_config("[screen.a_very_long_screen_name]\n"),
            Err(ParseError::NameTooLong)
        );

        let mut many = String::<256>::new();
        for i in 0..9u8 {
            let _ = many.push_str("[screen.s");
            let _ = many.push((b'0' + i) as char);
            let _ = many.push_str("]\n");
        }
        assert_eq!(parse_config(&many), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(parse_config("[power\n"), Err(ParseError::InvalidSection));
    }
}
