pub mod frequency;
pub mod normalize;
pub mod scan;
pub mod scan_map;

mod error;
mod result;

pub use error::{Error, Result};
pub use frequency::FrequencyCorrector;
pub use normalize::TermNormalizer;
pub use result::{ScanResult, Term, UnexpectedFields};
pub use scan::ScanExecutor;
pub use scan_map::{AliasMap, AliasStore};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use triton_config::Config;
use triton_domain::ScanPos;
use triton_solr::{ClusterStatus, FieldTerms, Ping, SolrClient, TermsQuery};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Requests the scan path issues against the search engine.
pub trait SearchEngine
where
	Self: Send + Sync,
{
	fn terms<'a>(
		&'a self,
		collection: &'a str,
		query: &'a TermsQuery,
	) -> BoxFuture<'a, triton_solr::Result<Vec<FieldTerms>>>;

	fn count<'a>(
		&'a self,
		collection: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<u64>>;

	fn analyze_field_type<'a>(
		&'a self,
		collection: &'a str,
		field_type: &'a str,
		value: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<String>>;

	fn ping<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, triton_solr::Result<Ping>>;
}

/// Cluster topology and config-set storage, read once at startup.
pub trait ClusterCoordinator
where
	Self: Send + Sync,
{
	fn cluster_status(&self) -> BoxFuture<'_, triton_solr::Result<ClusterStatus>>;

	fn fetch_config_file<'a>(
		&'a self,
		core_url: &'a str,
		file: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<Option<String>>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
	pub default_collection: String,
	pub default_size: u32,
	pub default_field_type: String,
	pub exact_frequency_timeout: Duration,
}
impl ScanSettings {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			default_collection: cfg.solr.default_collection.clone(),
			default_size: cfg.scan.default_size,
			default_field_type: cfg.scan.default_field_type.clone(),
			exact_frequency_timeout: Duration::from_millis(cfg.scan.exact_frequency_timeout_ms),
		}
	}
}

/// One `/scan` call. Optional fields fall back to [`ScanSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
	pub term: Option<String>,
	pub index: Option<String>,
	pub collection: Option<String>,
	pub pos: ScanPos,
	pub size: Option<u32>,
	pub include: Option<String>,
	pub with_exact_frequency: bool,
	pub field_type: Option<String>,
}
impl Default for ScanRequest {
	fn default() -> Self {
		Self {
			term: None,
			index: None,
			collection: None,
			pos: ScanPos::First,
			size: None,
			include: None,
			with_exact_frequency: true,
			field_type: None,
		}
	}
}

pub struct ScanService {
	engine: Arc<dyn SearchEngine>,
	aliases: Arc<AliasStore>,
	settings: ScanSettings,
	normalizer: TermNormalizer,
	executor: ScanExecutor,
	corrector: FrequencyCorrector,
}
impl ScanService {
	pub fn new(
		engine: Arc<dyn SearchEngine>,
		aliases: Arc<AliasStore>,
		settings: ScanSettings,
	) -> Self {
		Self {
			normalizer: TermNormalizer::new(engine.clone()),
			executor: ScanExecutor::new(engine.clone()),
			corrector: FrequencyCorrector::new(engine.clone(), settings.exact_frequency_timeout),
			engine,
			aliases,
			settings,
		}
	}

	pub fn settings(&self) -> &ScanSettings {
		&self.settings
	}

	pub fn aliases(&self) -> &AliasStore {
		&self.aliases
	}

	pub async fn scan(&self, req: ScanRequest) -> Result<ScanResult> {
		let term = required("term", req.term.as_deref())?;
		let index_alias = required("index", req.index.as_deref())?;
		let limit = match req.size {
			Some(0) => return Err(Error::validation("size must be greater than zero.")),
			Some(size) => size,
			None => self.settings.default_size,
		};
		let collection = non_blank(req.collection.as_deref())
			.unwrap_or(self.settings.default_collection.as_str());
		let field_type = non_blank(req.field_type.as_deref())
			.unwrap_or(self.settings.default_field_type.as_str());
		let field = self.aliases.resolve(collection, index_alias);
		tracing::info!(collection, index = index_alias, field, "Resolved index alias.");

		let normalized = self.normalizer.normalize_by_field_type(collection, field_type, term).await?;
		let result = self
			.executor
			.execute(collection, field, &normalized, req.pos, limit, req.include.as_deref())
			.await?;

		if !req.with_exact_frequency || result.terms.is_empty() {
			return Ok(result);
		}

		let terms = self.corrector.correct(collection, field, result.terms).await?;
		Ok(ScanResult { index: result.index, terms })
	}

	/// Pings the default collection.
	pub async fn ping(&self) -> Result<Ping> {
		Ok(self.engine.ping(&self.settings.default_collection).await?)
	}
}

impl SearchEngine for SolrClient {
	fn terms<'a>(
		&'a self,
		collection: &'a str,
		query: &'a TermsQuery,
	) -> BoxFuture<'a, triton_solr::Result<Vec<FieldTerms>>> {
		Box::pin(SolrClient::terms(self, collection, query))
	}

	fn count<'a>(
		&'a self,
		collection: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<u64>> {
		Box::pin(SolrClient::count(self, collection, query))
	}

	fn analyze_field_type<'a>(
		&'a self,
		collection: &'a str,
		field_type: &'a str,
		value: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<String>> {
		Box::pin(SolrClient::analyze_field_type(self, collection, field_type, value))
	}

	fn ping<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, triton_solr::Result<Ping>> {
		Box::pin(SolrClient::ping(self, collection))
	}
}

impl ClusterCoordinator for SolrClient {
	fn cluster_status(&self) -> BoxFuture<'_, triton_solr::Result<ClusterStatus>> {
		Box::pin(SolrClient::cluster_status(self))
	}

	fn fetch_config_file<'a>(
		&'a self,
		core_url: &'a str,
		file: &'a str,
	) -> BoxFuture<'a, triton_solr::Result<Option<String>>> {
		Box::pin(SolrClient::fetch_config_file(self, core_url, file))
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
	non_blank(value).ok_or_else(|| Error::validation(format!("{name} parameter is mandatory.")))
}
