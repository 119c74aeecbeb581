use std::{sync::Arc, time::Instant};

use triton_domain::SplitTerm;

use crate::{Result, SearchEngine};

/// Runs scan terms through field-type analysis, keeping reserved trailing markers verbatim.
pub struct TermNormalizer {
	engine: Arc<dyn SearchEngine>,
}
impl TermNormalizer {
	pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
		Self { engine }
	}

	pub async fn normalize_by_field_type(
		&self,
		collection: &str,
		field_type: &str,
		term: &str,
	) -> Result<String> {
		let started = Instant::now();
		let split = SplitTerm::split(term);
		let analyzed = self.engine.analyze_field_type(collection, field_type, split.body).await?;
		let normalized = split.rejoin(&analyzed);
		tracing::info!(
			term,
			normalized,
			field_type,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Normalized scan term."
		);
		Ok(normalized)
	}
}
