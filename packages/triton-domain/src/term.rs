use std::sync::LazyLock;

use regex::Regex;

// Optional subfield marker (`#245a`) and/or limiter (`(bog)`), in that order, at the end.
const RESERVED_SUFFIX_PATTERN: &str =
	r"(?s)^(.*?)\s+(#[\p{L}\p{N}]+(?:\s*\([\p{L}\p{N}]+\))?|\([\p{L}\p{N}]+\))$";

static RESERVED_SUFFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(RESERVED_SUFFIX_PATTERN).expect("reserved suffix regex"));

/// A scan term split into the part that goes through analysis and the trailing markers
/// that must pass through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTerm<'a> {
	pub body: &'a str,
	pub reserved_suffix: Option<&'a str>,
}
impl<'a> SplitTerm<'a> {
	pub fn split(term: &'a str) -> Self {
		let captures = RESERVED_SUFFIX.captures(term);
		match captures.and_then(|caps| Some((caps.get(1)?, caps.get(2)?))) {
			Some((body, suffix)) =>
				Self { body: body.as_str(), reserved_suffix: Some(suffix.as_str()) },
			None => Self { body: term, reserved_suffix: None },
		}
	}

	/// Reattaches the reserved suffix to an analyzed body.
	pub fn rejoin(&self, analyzed_body: &str) -> String {
		match self.reserved_suffix {
			Some(suffix) if analyzed_body.is_empty() => suffix.to_string(),
			Some(suffix) => format!("{analyzed_body} {suffix}"),
			None => analyzed_body.to_string(),
		}
	}
}
