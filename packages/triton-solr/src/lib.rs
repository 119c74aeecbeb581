pub mod analysis;
pub mod cluster;
pub mod search;
pub mod terms;

mod error;

pub use cluster::{ClusterStatus, CollectionState, Replica};
pub use error::{Error, Result};
pub use terms::{FieldTerms, TermsBound, TermsQuery};

use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Semaphore;

/// Pooled HTTP client for one SolrCloud cluster.
///
/// Every request holds a permit for its whole lifetime, so at most
/// `max_connections` requests are in flight across all hosts.
#[derive(Clone)]
pub struct SolrClient {
	base_url: String,
	http: Client,
	permits: Arc<Semaphore>,
}
impl SolrClient {
	pub fn new(cfg: &triton_config::Solr) -> Result<Self> {
		let http = Client::builder()
			.connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
			.read_timeout(Duration::from_millis(cfg.read_timeout_ms))
			.pool_max_idle_per_host(cfg.max_connections_per_host as usize)
			.build()?;
		Ok(Self {
			base_url: cfg.url.trim_end_matches('/').to_string(),
			http,
			permits: Arc::new(Semaphore::new(cfg.max_connections as usize)),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Pings `collection` through its ping handler.
	pub async fn ping(&self, collection: &str) -> Result<Ping> {
		let url = self.collection_url(collection, "admin/ping");
		let json = self.get_json(&url, &[]).await?;
		let status = json
			.get("status")
			.and_then(Value::as_str)
			.ok_or_else(|| Error::invalid_response("Ping response is missing status."))?;
		let qtime_ms = json
			.get("responseHeader")
			.and_then(|header| header.get("QTime"))
			.and_then(Value::as_u64)
			.unwrap_or(0);
		Ok(Ping { status: status.to_string(), qtime_ms })
	}

	fn collection_url(&self, collection: &str, handler: &str) -> String {
		format!("{}/{collection}/{handler}", self.base_url)
	}

	async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
		let _permit = self.permits.acquire().await.map_err(|_| Error::PoolClosed)?;
		tracing::debug!(url, "Sending Solr request.");

		let res = self
			.http
			.get(url)
			.query(params)
			.query(&[("wt", "json"), ("json.nl", "arrarr")])
			.send()
			.await?;
		let status = res.status();
		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();
			return Err(Error::Remote {
				status: status.as_u16(),
				message: remote_message(status, &body),
			});
		}
		Ok(res.json().await?)
	}

	/// Fetches a text resource, mapping HTTP 404 to `None`.
	async fn get_text_optional(
		&self,
		url: &str,
		params: &[(&str, &str)],
	) -> Result<Option<String>> {
		let _permit = self.permits.acquire().await.map_err(|_| Error::PoolClosed)?;
		let res = self.http.get(url).query(params).send().await?;
		let status = res.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();
			return Err(Error::Remote {
				status: status.as_u16(),
				message: remote_message(status, &body),
			});
		}
		Ok(Some(res.text().await?))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ping {
	pub status: String,
	pub qtime_ms: u64,
}
impl Ping {
	pub fn is_ok(&self) -> bool {
		self.status.eq_ignore_ascii_case("OK")
	}
}

fn remote_message(status: StatusCode, body: &str) -> String {
	if let Ok(json) = serde_json::from_str::<Value>(body)
		&& let Some(msg) = json.get("error").and_then(|err| err.get("msg")).and_then(Value::as_str)
	{
		return msg.to_string();
	}

	let trimmed = body.trim();
	if trimmed.is_empty() || trimmed.starts_with('<') {
		return status.canonical_reason().unwrap_or("Unknown error").to_string();
	}

	trimmed.chars().take(512).collect()
}

/// Reads a Solr named list in any of its JSON renderings: `arrarr` (`[[k, v], ...]`),
/// `flat` (`[k, v, ...]`) or `map` (`{k: v, ...}`). Order is preserved for the array forms.
pub(crate) fn named_list(value: &Value) -> Option<Vec<(&str, &Value)>> {
	match value {
		Value::Object(map) => Some(map.iter().map(|(key, value)| (key.as_str(), value)).collect()),
		Value::Array(items) if items.iter().all(Value::is_array) => items
			.iter()
			.map(|item| match item.as_array().map(Vec::as_slice) {
				Some([key, value]) => key.as_str().map(|key| (key, value)),
				_ => None,
			})
			.collect(),
		Value::Array(items) if items.len() % 2 == 0 => items
			.chunks(2)
			.map(|pair| pair[0].as_str().map(|key| (key, &pair[1])))
			.collect(),
		_ => None,
	}
}
