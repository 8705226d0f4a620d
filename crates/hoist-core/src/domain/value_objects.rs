//! Domain value objects: AppState and ByteSize.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── AppState ─────────────────────────────────────────────────────────────────

/// Lifecycle state of a remote application as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    #[default]
    Stopped,
    Started,
    Crashed,
    Unknown,
}

impl AppState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Started => "started",
            Self::Crashed => "crashed",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppState {
    type Err = std::convert::Infallible;

    /// Platforms report more states than we branch on; anything
    /// unrecognised maps to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "stopped" => Self::Stopped,
            "started" | "running" => Self::Started,
            "crashed" | "flapping" => Self::Crashed,
            _ => Self::Unknown,
        })
    }
}

// ── ByteSize ──────────────────────────────────────────────────────────────────

const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = 1024 * KILOBYTE;
const GIGABYTE: u64 = 1024 * MEGABYTE;
const TERABYTE: u64 = 1024 * GIGABYTE;

/// A quantity of bytes.
///
/// Parsed from user input such as `256M` or `1G` (memory and disk quotas)
/// and displayed in the short human form used for upload summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn from_megabytes(megabytes: u64) -> Self {
        Self(megabytes * MEGABYTE)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Whole megabytes, rounded down. Quotas are expressed in megabytes.
    pub const fn megabytes(self) -> u64 {
        self.0 / MEGABYTE
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, unit) = match self.0 {
            0 => return f.write_str("0"),
            b if b >= TERABYTE => (b as f64 / TERABYTE as f64, "T"),
            b if b >= GIGABYTE => (b as f64 / GIGABYTE as f64, "G"),
            b if b >= MEGABYTE => (b as f64 / MEGABYTE as f64, "M"),
            b if b >= KILOBYTE => (b as f64 / KILOBYTE as f64, "K"),
            b => (b as f64, "B"),
        };

        let rendered = format!("{value:.1}");
        let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
        write!(f, "{rendered}{unit}")
    }
}

impl FromStr for ByteSize {
    type Err = DomainError;

    /// Accepts `<digits><unit>[B]` with unit one of `T`, `G`, `M`, `K`,
    /// case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidByteQuantity { input: s.to_string() };

        let upper = s.trim().to_ascii_uppercase();
        let body = upper.strip_suffix('B').unwrap_or(&upper);
        let split = body
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = body.split_at(split);
        if digits.is_empty() {
            return Err(invalid());
        }

        let value: u64 = digits.parse().map_err(|_| invalid())?;
        let scale = match unit {
            "T" => TERABYTE,
            "G" => GIGABYTE,
            "M" => MEGABYTE,
            "K" => KILOBYTE,
            _ => return Err(invalid()),
        };

        value.checked_mul(scale).map(Self).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_quota_forms() {
        assert_eq!("256M".parse::<ByteSize>().unwrap().megabytes(), 256);
        assert_eq!("1G".parse::<ByteSize>().unwrap().megabytes(), 1024);
        assert_eq!("1gb".parse::<ByteSize>().unwrap().megabytes(), 1024);
        assert_eq!(" 512MB ".parse::<ByteSize>().unwrap().megabytes(), 512);
        assert_eq!("2T".parse::<ByteSize>().unwrap().megabytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn kilobytes_round_down_to_megabytes() {
        assert_eq!("1536K".parse::<ByteSize>().unwrap().megabytes(), 1);
        assert_eq!("512K".parse::<ByteSize>().unwrap().megabytes(), 0);
    }

    #[test]
    fn rejects_missing_or_unknown_units() {
        for input in ["256", "M", "", "12X", "-5M", "1.5G", "G1"] {
            assert!(
                matches!(
                    input.parse::<ByteSize>(),
                    Err(DomainError::InvalidByteQuantity { .. })
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn displays_short_human_form() {
        assert_eq!(ByteSize::from_bytes(0).to_string(), "0");
        assert_eq!(ByteSize::from_bytes(100).to_string(), "100B");
        assert_eq!(ByteSize::from_bytes(2048).to_string(), "2K");
        assert_eq!(ByteSize::from_bytes(1536).to_string(), "1.5K");
        assert_eq!(ByteSize::from_megabytes(1024).to_string(), "1G");
    }

    #[test]
    fn app_state_parses_platform_strings() {
        assert_eq!("STARTED".parse::<AppState>().unwrap(), AppState::Started);
        assert_eq!("stopped".parse::<AppState>().unwrap(), AppState::Stopped);
        assert_eq!("pending".parse::<AppState>().unwrap(), AppState::Unknown);
        assert!(AppState::default().is_stopped());
    }
}
