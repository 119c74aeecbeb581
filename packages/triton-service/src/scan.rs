use std::sync::Arc;

use triton_domain::{ScanPos, query};
use triton_solr::{TermsBound, TermsQuery};

use crate::{Error, Result, ScanResult, SearchEngine};

/// Issues bounded term scans and tells an empty field apart from an unknown one.
pub struct ScanExecutor {
	engine: Arc<dyn SearchEngine>,
}
impl ScanExecutor {
	pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
		Self { engine }
	}

	pub async fn execute(
		&self,
		collection: &str,
		field: &str,
		term: &str,
		pos: ScanPos,
		limit: u32,
		include: Option<&str>,
	) -> Result<ScanResult> {
		let bound = match pos {
			ScanPos::First => TermsBound::Lower(term.to_string()),
			ScanPos::Last => TermsBound::Upper(term.to_string()),
		};
		let query = TermsQuery {
			field: field.to_string(),
			bound,
			limit,
			regex: include.filter(|regex| !regex.is_empty()).map(str::to_string),
		};
		let fields = self.engine.terms(collection, &query).await?;
		let mut result = ScanResult::of(fields)
			.map_err(|err| Error::internal("Unexpected scan response.", err))?;
		let excess = result.terms.len().saturating_sub(limit as usize);

		// Keep the entries nearest the bound.
		match pos {
			ScanPos::First => result.terms.truncate(limit as usize),
			ScanPos::Last => {
				result.terms.drain(..excess);
			},
		}

		if result.terms.is_empty() {
			// The terms component answers an unknown field with an empty list. A search on the
			// field makes the engine report it.
			self.engine.count(collection, &query::field_probe(field)).await?;
		}
		Ok(result)
	}
}
