//! Component value strings.
//!
//! A value is a decimal number, an optional SI prefix and an optional unit:
//!
//! ```text
//! value  = ws number ws [prefix] [unit] ws
//! number = digit+ ['.' digit*] [exp] | '.' digit+ [exp]
//! exp    = ('e' | 'E') ['+' | '-'] digit+
//! prefix = 'p' | 'n' | 'u' | 'µ' | 'μ' | 'm' | 'k' | 'K' | 'M' | 'G'
//! unit   = 'Ω' | 'F' | 'H' | 'V' | 'A' | "ohm" | "ohms" | "Hz"
//! ```
//!
//! The unit is matched before the prefix, so `"10mH"` is 10 milli-henry and
//! `"2M"` is 2 mega. Strings that do not match the whole grammar do not
//! parse; callers substitute a per-kind default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical unit written after a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Ohm,
    Farad,
    Henry,
    Volt,
    Ampere,
    Hertz,
}

impl Unit {
    fn from_suffix(s: &str) -> Option<Unit> {
        match s {
            "Ω" | "\u{2126}" => return Some(Unit::Ohm),
            "F" => return Some(Unit::Farad),
            "H" => return Some(Unit::Henry),
            "V" => return Some(Unit::Volt),
            "A" => return Some(Unit::Ampere),
            _ => {}
        }
        match s.to_ascii_lowercase().as_str() {
            "ohm" | "ohms" => Some(Unit::Ohm),
            "hz" => Some(Unit::Hertz),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Ohm => "Ω",
            Unit::Farad => "F",
            Unit::Henry => "H",
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Hertz => "Hz",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A successfully parsed value string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedValue {
    /// Magnitude in SI base units (prefix applied)
    pub magnitude: f64,
    /// Unit written after the number, if any
    pub unit: Option<Unit>,
}

fn prefix_multiplier(ch: char) -> Option<f64> {
    match ch {
        'p' => Some(1e-12),
        'n' => Some(1e-9),
        'u' | 'µ' | 'μ' => Some(1e-6),
        'm' => Some(1e-3),
        'k' | 'K' => Some(1e3),
        'M' => Some(1e6),
        'G' => Some(1e9),
        _ => None,
    }
}

/// Length in bytes of the leading number in `s`, if it starts with one.
fn number_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only when it is complete; a bare 'e' is left for the suffix
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(i)
}

/// Parse a value string such as `"10Ω"`, `"4.7 kΩ"`, `"1µF"` or `"120V"`.
pub fn parse_value(text: &str) -> Option<ParsedValue> {
    let text = text.trim();
    let len = number_len(text)?;
    let number: f64 = text[..len].parse().ok()?;
    let rest = text[len..].trim_start();

    if rest.is_empty() {
        return Some(ParsedValue {
            magnitude: number,
            unit: None,
        });
    }

    if let Some(unit) = Unit::from_suffix(rest) {
        return Some(ParsedValue {
            magnitude: number,
            unit: Some(unit),
        });
    }

    let mut chars = rest.chars();
    let prefix = chars.next()?;
    let multiplier = prefix_multiplier(prefix)?;
    let after = chars.as_str();

    let unit = if after.is_empty() {
        None
    } else {
        Some(Unit::from_suffix(after)?)
    };

    Some(ParsedValue {
        magnitude: number * multiplier,
        unit,
    })
}

/// Parse a value string and return only its magnitude.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    parse_value(text).map(|v| v.magnitude)
}
