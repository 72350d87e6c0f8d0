//! Scenario line codec.
//!
//! The host stores vessel state as `KEY value...` text lines. This module
//! splits and parses those lines; which keys exist is decided by
//! `xrvessel-core::persistence`. Parsing never panics: malformed values
//! produce a [`ParseIssue`] that the caller logs before moving on.

use std::fmt;

use crate::door::{reconcile_status, DoorId, DoorStatus};

/// A value that could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseIssue {
    pub key: String,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ParseIssue {}

fn issue(key: &str, value: &str, reason: &'static str) -> ParseIssue {
    ParseIssue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Split a line into its key and the rest. Blank lines yield `None`.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((key, rest)) => Some((key, rest.trim())),
        None => Some((line, "")),
    }
}

/// Clamp `value` into `[low, high]`; NaN becomes `low`.
pub fn validate(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        low
    } else {
        value.clamp(low, high)
    }
}

pub fn parse_f64(key: &str, value: &str) -> Result<f64, ParseIssue> {
    value
        .split_whitespace()
        .next()
        .ok_or_else(|| issue(key, value, "missing value"))?
        .parse::<f64>()
        .map_err(|_| issue(key, value, "not a number"))
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseIssue> {
    match value.split_whitespace().next() {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(issue(key, value, "expected 0 or 1")),
    }
}

/// Parse `STATUS [proc]`. A missing proc defaults from the status.
pub fn parse_door_line(key: &str, value: &str) -> Result<(DoorStatus, f64), ParseIssue> {
    let mut parts = value.split_whitespace();
    let status = parts
        .next()
        .and_then(DoorStatus::from_token)
        .ok_or_else(|| issue(key, value, "unknown door status"))?;
    let proc = match parts.next() {
        Some(p) => validate(
            p.parse::<f64>()
                .map_err(|_| issue(key, value, "bad door position"))?,
            0.0,
            1.0,
        ),
        None => {
            if status == DoorStatus::Open {
                1.0
            } else {
                0.0
            }
        }
    };
    // a terminal status must match the recorded position
    Ok((reconcile_status(status, proc), proc))
}

pub fn format_door_line(id: DoorId, status: DoorStatus, proc: f64) -> String {
    format!("{} {} {:.6}", id.scenario_key(), status.token(), proc)
}

/// Free text is stored on one line with spaces replaced by `_`.
pub fn encode_text(text: &str) -> String {
    text.replace(' ', "_")
}

pub fn decode_text(text: &str) -> String {
    text.trim().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("  GEAR OPEN 1.0 "), Some(("GEAR", "OPEN 1.0")));
        assert_eq!(split_line("IS_CRASHED"), Some(("IS_CRASHED", "")));
        assert_eq!(split_line("   "), None);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(1.5, 0.0, 1.0), 1.0);
        assert_eq!(validate(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(validate(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(validate(0.37, 0.0, 1.0), 0.37);
    }

    #[test]
    fn test_parse_door_line() {
        assert_eq!(
            parse_door_line("GEAR", "OPENING 0.370000"),
            Ok((DoorStatus::Opening, 0.37))
        );
        assert_eq!(parse_door_line("GEAR", "1"), Ok((DoorStatus::Open, 1.0)));
        assert_eq!(
            parse_door_line("GEAR", "CLOSED 7.5"),
            Ok((DoorStatus::Open, 1.0))
        );
        assert_eq!(
            parse_door_line("RADIATOR", "OPEN 0.0"),
            Ok((DoorStatus::Closed, 0.0))
        );
        assert_eq!(
            parse_door_line("RADIATOR", "FAILED 0.4"),
            Ok((DoorStatus::Failed, 0.4))
        );
        assert!(parse_door_line("GEAR", "WIDE 0.5").is_err());
        assert!(parse_door_line("GEAR", "OPEN x").is_err());
    }

    #[test]
    fn test_format_door_line() {
        assert_eq!(
            format_door_line(DoorId::LandingGear, DoorStatus::Opening, 0.37),
            "GEAR OPENING 0.370000"
        );
    }

    #[test]
    fn test_text_encoding() {
        let msg = "NOSECONE BREACH at Mach 5.2";
        assert_eq!(decode_text(&encode_text(msg)), msg);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("K", "1"), Ok(true));
        assert_eq!(parse_bool("K", "FALSE"), Ok(false));
        assert!(parse_bool("K", "maybe").is_err());
    }
}
