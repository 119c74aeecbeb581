use serde_json::Value;

use crate::{Error, Result, SolrClient};

impl SolrClient {
	/// Number of documents in `collection` matching `query`. No documents are fetched.
	pub async fn count(&self, collection: &str, query: &str) -> Result<u64> {
		let url = self.collection_url(collection, "select");
		let params = [("q", query.to_string()), ("rows", "0".to_string())];
		let json = self.get_json(&url, &params).await?;
		num_found(&json)
	}
}

fn num_found(json: &Value) -> Result<u64> {
	json.get("response")
		.and_then(|response| response.get("numFound"))
		.and_then(Value::as_u64)
		.ok_or_else(|| Error::invalid_response("Select response is missing response.numFound."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_num_found() {
		let json = serde_json::json!({
			"responseHeader": { "status": 0, "QTime": 3 },
			"response": { "numFound": 42, "start": 0, "docs": [] }
		});

		assert_eq!(num_found(&json).expect("count"), 42);
	}

	#[test]
	fn missing_response_is_invalid() {
		let err = num_found(&serde_json::json!({ "responseHeader": {} })).expect_err("error");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
