// Presentation helpers: size units, duration labels, ratio labels.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Unit for displaying byte counts (binary multiples).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    #[default]
    B,
    KB,
    MB,
    GB,
}

impl SizeUnit {
    fn divisor(self) -> f64 {
        match self {
            Self::B => 1.0,
            Self::KB => 1024.0,
            Self::MB => 1024.0 * 1024.0,
            Self::GB => 1024.0 * 1024.0 * 1024.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::KB => "KB",
            Self::MB => "MB",
            Self::GB => "GB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size unit '{0}' (expected B, KB, MB or GB)")]
pub struct UnknownUnit(pub String);

impl FromStr for SizeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(Self::B),
            "KB" | "K" => Ok(Self::KB),
            "MB" | "M" => Ok(Self::MB),
            "GB" | "G" => Ok(Self::GB),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

/// `bytes` expressed in `unit`.
pub fn to_size(bytes: u64, unit: SizeUnit) -> f64 {
    bytes as f64 / unit.divisor()
}

/// `bytes` in `unit` with two decimals (none for plain bytes), e.g. `1.50 MB`.
pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
    match unit {
        SizeUnit::B => format!("{bytes} B"),
        _ => format!("{:.2} {unit}", to_size(bytes, unit)),
    }
}

/// Milliseconds rounded to one decimal, e.g. `12.3ms` or `4ms`.
pub fn format_duration_ms(duration: Duration) -> String {
    let ms = duration.as_secs_f64() * 1000.0;
    format!("{}ms", (ms * 10.0).round() / 10.0)
}

/// Ratio with three decimals, or `n/a` when undefined.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{r:.3}"),
        None => "n/a".to_string(),
    }
}
