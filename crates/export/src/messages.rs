//! Readable messages for encoder failures
//!
//! Encoders report failures such as
//! `bwipp.ean13badLength#4907: EAN-13 must be 12 or 13 digits`. The error
//! marker in a slot shows a short sentence instead.

use crate::EncodeError;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Shown when nothing useful is left after cleanup
pub const FALLBACK_MESSAGE: &str = "Invalid data for the selected symbology";

fn prefix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)(?:bwipp|bwip-js)[.:]([\w-]+)(?:#\d+)?:\s*").ok())
        .as_ref()
}

fn known_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "ean13badlength" => "EAN-13 must have 12 or 13 digits",
        "ean8badlength" => "EAN-8 must have 7 or 8 digits",
        "upcabadlength" => "UPC-A must have 11 or 12 digits",
        "upcebadlength" => "UPC-E must have 6, 7 or 8 digits",
        "itf14badlength" => "ITF-14 must have 13 or 14 digits",
        "isbn10badlength" => "ISBN-10 must have 9 or 10 digits (without hyphens)",
        "isbn13badlength" => "ISBN-13 must have 12 or 13 digits (without hyphens)",
        "code39badcharacter" => "Code 39 contains a character it cannot encode",
        "code128badcharacter" => "Code 128 contains a character it cannot encode",
        "itfbadcharacter" => "ITF (Interleaved 2 of 5) accepts digits only",
        "postnetbadcharacter" => "POSTNET accepts digits only",
        "badcheckdigit" => "Invalid check digit",
        "badchecksum" => "Invalid checksum",
        "qrcodetoolong" | "datamatrixtoolong" | "pdf417toolong" => "Too much data for this symbol",
        _ => return None,
    };
    Some(message)
}

/// Error code embedded in a raw encoder message, lowercased
pub fn error_code(raw: &str) -> Option<String> {
    prefix_pattern()?
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|code| code.as_str().to_ascii_lowercase())
}

/// Turn a raw encoder message into one line suitable for an error marker
pub fn friendly_message(raw: &str) -> String {
    if let Some(message) = error_code(raw).as_deref().and_then(known_message) {
        return message.to_string();
    }

    let trimmed = raw.trim_start();
    let without_label = match trimmed.split_once(':') {
        Some((label, rest)) if label.eq_ignore_ascii_case("error") => rest,
        _ => trimmed,
    };
    let stripped = match prefix_pattern() {
        Some(pattern) => pattern.replace_all(without_label, "").into_owned(),
        None => without_label.to_string(),
    };
    // drop any stack trace
    let line = match stripped.find(" at ") {
        Some(at) => &stripped[..at],
        None => stripped.as_str(),
    };
    let line = line.trim().trim_end_matches(['.', ':']).trim();

    if line.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        line.to_string()
    }
}

/// Message for an [`EncodeError`], preferring its structured code
pub fn describe(error: &EncodeError) -> String {
    error
        .code
        .as_deref()
        .map(str::to_ascii_lowercase)
        .as_deref()
        .and_then(known_message)
        .map(str::to_string)
        .unwrap_or_else(|| friendly_message(&error.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            friendly_message("bwipp.ean13badLength#4907: EAN-13 must be 12 or 13 digits"),
            "EAN-13 must have 12 or 13 digits"
        );
        assert_eq!(
            friendly_message("Error: bwip-js.code128badCharacter: Invalid character"),
            "Code 128 contains a character it cannot encode"
        );
    }

    #[test]
    fn test_unknown_code_keeps_text() {
        assert_eq!(
            friendly_message("Error: bwipp.gs1badAi#12: Unknown AI (99).   at render (x.js:1)"),
            "Unknown AI (99)"
        );
        assert_eq!(friendly_message("  "), FALLBACK_MESSAGE);
        assert_eq!(friendly_message("bwipp.weird:"), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_describe_prefers_code() {
        let error = EncodeError::with_code("upcaBadLength", "whatever");
        assert_eq!(describe(&error), "UPC-A must have 11 or 12 digits");
        assert_eq!(describe(&EncodeError::new("plain failure.")), "plain failure");
        assert_eq!(error_code("bwipp.itf14badLength#1: x").as_deref(), Some("itf14badlength"));
    }
}
