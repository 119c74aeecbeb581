use std::sync::Arc;

use color_eyre::eyre;

use triton_config::Config;
use triton_service::{AliasStore, ScanService, ScanSettings};
use triton_solr::SolrClient;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScanService>,
}
impl AppState {
	/// Connects to the cluster, pings the default collection and loads every scan map. Any
	/// failure here is fatal.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let solr = Arc::new(SolrClient::new(&config.solr)?);
		let collection = config.solr.default_collection.as_str();
		let ping = solr.ping(collection).await?;
		if !ping.is_ok() {
			return Err(eyre::eyre!(
				"Unable to ping collection {collection}, status {}.",
				ping.status
			));
		}

		tracing::info!(collection, qtime_ms = ping.qtime_ms, "Pinged default collection.");

		let aliases =
			AliasStore::initialize(&*solr, collection, &config.scan.scan_map_file).await?;

		tracing::info!(collections = aliases.len(), "Scan maps loaded.");

		let service = ScanService::new(solr, Arc::new(aliases), ScanSettings::from_config(&config));
		Ok(Self::from_service(service))
	}

	pub fn from_service(service: ScanService) -> Self {
		Self { service: Arc::new(service) }
	}
}
