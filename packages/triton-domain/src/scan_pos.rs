use std::{fmt, str::FromStr};

/// Where the scanned term sits in the returned window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPos {
	/// The term is the inclusive lower bound.
	#[default]
	First,
	/// The term is the inclusive upper bound.
	Last,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pos must be one of first or last, got {value:?}.")]
pub struct ScanPosError {
	pub value: String,
}

impl FromStr for ScanPos {
	type Err = ScanPosError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"first" => Ok(Self::First),
			"last" => Ok(Self::Last),
			_ => Err(ScanPosError { value: s.to_string() }),
		}
	}
}

impl fmt::Display for ScanPos {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::First => f.write_str("first"),
			Self::Last => f.write_str("last"),
		}
	}
}
