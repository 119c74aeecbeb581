use serde::Serialize;

use triton_solr::FieldTerms;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
	pub value: String,
	pub frequency: u64,
}
impl Term {
	pub fn new(value: impl Into<String>, frequency: u64) -> Self {
		Self { value: value.into(), frequency }
	}
}

/// Terms of a single scanned field, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub index: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub terms: Vec<Term>,
}
impl ScanResult {
	pub const EMPTY: Self = Self { index: None, terms: Vec::new() };

	/// Builds a result from a raw terms response. A response without fields is
	/// [`ScanResult::EMPTY`]; more than one field is rejected.
	pub fn of(fields: Vec<FieldTerms>) -> Result<Self, UnexpectedFields> {
		if fields.len() > 1 {
			return Err(UnexpectedFields {
				fields: fields.into_iter().map(|field| field.field).collect(),
			});
		}

		let Some(field) = fields.into_iter().next() else {
			return Ok(Self::EMPTY);
		};
		let terms =
			field.terms.into_iter().map(|(value, frequency)| Term { value, frequency }).collect();
		Ok(Self { index: Some(field.field), terms })
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Scan response covers {} fields ({}), expected one.", .fields.len(), .fields.join(", "))]
pub struct UnexpectedFields {
	pub fields: Vec<String>,
}
