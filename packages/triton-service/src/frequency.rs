use std::{sync::Arc, time::Duration};

use tokio::{
	task::JoinSet,
	time::{Instant, timeout_at},
};

use triton_domain::query;

use crate::{Error, Result, SearchEngine, Term};

/// Replaces approximate scan frequencies with exact phrase-match counts.
///
/// One task per term, all joined under a single deadline. Each task owns its term's value and
/// hands back a new [`Term`], so no two tasks ever touch the same term.
pub struct FrequencyCorrector {
	engine: Arc<dyn SearchEngine>,
	timeout: Duration,
}
impl FrequencyCorrector {
	pub fn new(engine: Arc<dyn SearchEngine>, timeout: Duration) -> Self {
		Self { engine, timeout }
	}

	pub async fn correct(
		&self,
		collection: &str,
		field: &str,
		terms: Vec<Term>,
	) -> Result<Vec<Term>> {
		let started = Instant::now();
		let deadline = started + self.timeout;
		let mut tasks = JoinSet::new();
		for (idx, term) in terms.into_iter().enumerate() {
			let engine = self.engine.clone();
			let collection = collection.to_string();
			let query = query::exact_phrase(field, &term.value);
			tasks.spawn(async move {
				let frequency = engine
					.count(&collection, &query)
					.await
					.map_err(|err| Error::internal("Exact frequency count failed.", err))?;

				Ok::<_, Error>((idx, Term { value: term.value, frequency }))
			});
		}

		let mut slots: Vec<Option<Term>> = vec![None; tasks.len()];
		// Dropping the set on any early return aborts whatever is still running.
		let joined = timeout_at(deadline, async {
			while let Some(joined) = tasks.join_next().await {
				let (idx, term) = joined
					.map_err(|err| Error::internal("Frequency correction task failed.", err))??;

				slots[idx] = Some(term);
			}

			Ok::<_, Error>(())
		})
		.await;

		joined.map_err(|elapsed| {
			Error::internal(
				format!("Frequency correction exceeded {} ms.", self.timeout.as_millis()),
				elapsed,
			)
		})??;

		let terms = slots
			.into_iter()
			.map(|slot| {
				slot.ok_or_else(|| Error::Internal {
					message: "Frequency correction lost a term.".to_string(),
					source: None,
				})
			})
			.collect::<Result<Vec<_>>>()?;

		tracing::info!(
			collection,
			field,
			terms = terms.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Corrected term frequencies."
		);
		Ok(terms)
	}
}
