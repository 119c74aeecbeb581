use serde_json::Value;

use crate::{Error, Result, SolrClient, named_list};

impl SolrClient {
	/// Runs `value` through the index-time analysis chain of `field_type` and returns the
	/// resulting tokens joined by single spaces.
	pub async fn analyze_field_type(
		&self,
		collection: &str,
		field_type: &str,
		value: &str,
	) -> Result<String> {
		let url = self.collection_url(collection, "analysis/field");
		let params = [
			("analysis.fieldtype", field_type.to_string()),
			("analysis.fieldvalue", value.to_string()),
		];
		let json = self.get_json(&url, &params).await?;
		index_output(&json, field_type)
	}
}

fn index_output(json: &Value, field_type: &str) -> Result<String> {
	let field_types = json
		.get("analysis")
		.and_then(|analysis| analysis.get("field_types"))
		.and_then(named_list)
		.ok_or_else(|| Error::invalid_response("Analysis response is missing field_types."))?;
	let (_, phases) =
		field_types.into_iter().find(|(name, _)| *name == field_type).ok_or_else(|| {
			Error::invalid_response(format!("Analysis response has no entry for {field_type}."))
		})?;
	let stages = phases
		.get("index")
		.or_else(|| {
			named_list(phases)?.into_iter().find(|(phase, _)| *phase == "index").map(|(_, v)| v)
		})
		.and_then(named_list)
		.ok_or_else(|| Error::invalid_response("Analysis response has no index phase."))?;
	let Some((_, last)) = stages.last() else {
		return Ok(String::new());
	};

	match last {
		// Char filters report their output as a plain string.
		Value::String(text) => Ok(text.clone()),
		Value::Array(tokens) => {
			let texts: Vec<&str> = tokens
				.iter()
				.filter_map(|token| token.get("text").and_then(Value::as_str))
				.collect();
			Ok(texts.join(" "))
		},
		_ => Err(Error::invalid_response("Analysis stage output is neither text nor tokens.")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn joins_tokens_of_the_last_index_stage() {
		let json = serde_json::json!({
			"analysis": {
				"field_types": [["dbc-scan", {
					"index": [
						["org.apache.lucene.analysis.core.KeywordTokenizer", [{ "text": "Harry Potter" }]],
						["org.apache.lucene.analysis.core.LowerCaseFilter", [
							{ "text": "harry", "position": 1 },
							{ "text": "potter", "position": 2 }
						]]
					]
				}]]
			}
		});

		assert_eq!(index_output(&json, "dbc-scan").expect("output"), "harry potter");
	}

	#[test]
	fn char_filter_output_is_used_verbatim() {
		let json = serde_json::json!({
			"analysis": {
				"field_types": { "dbc-scan": { "index": [["MappingCharFilter", "aeble"]] } }
			}
		});

		assert_eq!(index_output(&json, "dbc-scan").expect("output"), "aeble");
	}

	#[test]
	fn unknown_field_type_is_invalid() {
		let json = serde_json::json!({ "analysis": { "field_types": [] } });

		assert!(index_output(&json, "dbc-scan").is_err());
	}
}
