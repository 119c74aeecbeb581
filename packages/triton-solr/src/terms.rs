use serde_json::Value;

use crate::{Error, Result, SolrClient, named_list};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermsBound {
	/// Start at this value, inclusive, and walk forward.
	Lower(String),
	/// End at this value, inclusive.
	///
	/// Solr has no backward walk, so the whole field below the bound is transferred and all but
	/// the last `limit` entries are discarded. On a field with millions of distinct values this
	/// is one large response per request.
	Upper(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsQuery {
	pub field: String,
	pub bound: TermsBound,
	pub limit: u32,
	pub regex: Option<String>,
}

/// Index-ordered terms of one field with their document frequencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTerms {
	pub field: String,
	pub terms: Vec<(String, u64)>,
}

impl SolrClient {
	/// Runs the terms component against `collection`, returning one entry per field present in
	/// the response.
	pub async fn terms(&self, collection: &str, query: &TermsQuery) -> Result<Vec<FieldTerms>> {
		let url = self.collection_url(collection, "terms");
		let json = self.get_json(&url, &terms_params(query)).await?;
		let mut fields = parse_terms_response(&json)?;

		// The terms component only walks forward, so an upper-bounded scan reads everything up
		// to the bound and keeps the tail.
		if let TermsBound::Upper(_) = query.bound {
			for field in &mut fields {
				let excess = field.terms.len().saturating_sub(query.limit as usize);
				field.terms.drain(..excess);
			}
		}
		Ok(fields)
	}
}

fn terms_params(query: &TermsQuery) -> Vec<(&'static str, String)> {
	let mut params = vec![
		("terms", "true".to_string()),
		("distrib", "true".to_string()),
		("shards.qt", "/terms".to_string()),
		("terms.fl", query.field.clone()),
		("terms.sort", "index".to_string()),
	];

	match &query.bound {
		TermsBound::Lower(value) => {
			params.push(("terms.lower", value.clone()));
			params.push(("terms.lower.incl", "true".to_string()));
			params.push(("terms.limit", query.limit.to_string()));
		},
		TermsBound::Upper(value) => {
			params.push(("terms.upper", value.clone()));
			params.push(("terms.upper.incl", "true".to_string()));
			// Unbounded: cost grows with the number of terms below the bound.
			params.push(("terms.limit", "-1".to_string()));
		},
	}

	if let Some(regex) = query.regex.as_deref().filter(|regex| !regex.is_empty()) {
		params.push(("terms.regex", regex.to_string()));
	}

	params
}

fn parse_terms_response(json: &Value) -> Result<Vec<FieldTerms>> {
	let Some(terms) = json.get("terms") else {
		return Err(Error::invalid_response("Terms response is missing terms."));
	};
	let fields =
		named_list(terms).ok_or_else(|| Error::invalid_response("Terms are not a named list."))?;
	let mut out = Vec::with_capacity(fields.len());
	for (field, entries) in fields {
		let entries = named_list(entries).ok_or_else(|| {
			Error::invalid_response(format!("Terms of field {field} are not a named list."))
		})?;
		let mut terms = Vec::with_capacity(entries.len());
		for (value, frequency) in entries {
			let frequency = frequency.as_u64().ok_or_else(|| {
				Error::invalid_response(format!("Frequency of term {value:?} is not a count."))
			})?;

			terms.push((value.to_string(), frequency));
		}

		out.push(FieldTerms { field: field.to_string(), terms });
	}
	Ok(out)
}
