//! Per-collection index alias maps, loaded once at startup from each collection's config set.

use std::{collections::HashMap, sync::Arc};

use triton_domain::properties;
use triton_solr::ClusterStatus;

use crate::{ClusterCoordinator, Error, Result};

/// Index alias to field name for one collection.
pub type AliasMap = HashMap<String, String>;

/// Immutable snapshot of every collection's [`AliasMap`].
///
/// Collection aliases share the map of the collection they point at.
#[derive(Debug, Clone, Default)]
pub struct AliasStore {
	maps: HashMap<String, Arc<AliasMap>>,
}
impl AliasStore {
	pub fn from_maps<I, C>(maps: I) -> Self
	where
		I: IntoIterator<Item = (C, AliasMap)>,
		C: Into<String>,
	{
		let maps = maps.into_iter().map(|(collection, map)| (collection.into(), Arc::new(map)));
		Self { maps: maps.collect() }
	}

	/// Reads the cluster topology and fetches `file` for every collection, plus
	/// `default_collection` when the cluster does not list it directly.
	pub async fn initialize(
		coordinator: &dyn ClusterCoordinator,
		default_collection: &str,
		file: &str,
	) -> Result<Self> {
		let status = coordinator
			.cluster_status()
			.await
			.map_err(|err| Error::internal("Failed to read cluster status.", err))?;
		let mut maps = HashMap::new();
		for collection in &status.collections {
			let Some(replica) = status.live_replica(collection) else {
				tracing::warn!(
					collection = collection.name.as_str(),
					"No live replica, using an empty scan map."
				);
				maps.insert(collection.name.clone(), Arc::new(AliasMap::new()));

				continue;
			};

			tracing::debug!(
				collection = collection.name.as_str(),
				config_name = collection.config_name.as_deref(),
				shard = replica.shard.as_str(),
				core = replica.core.as_str(),
				"Reading scan map from live replica."
			);

			let map = load_map(coordinator, &collection.name, &replica.core_url(), file).await?;
			maps.insert(collection.name.clone(), Arc::new(map));
		}

		for alias in status.aliases.keys() {
			let Some(target) = status.alias_target(alias) else { continue };
			let Some(map) = maps.get(target).cloned() else { continue };
			tracing::info!(alias = alias.as_str(), target, "Collection alias shares scan map.");
			maps.entry(alias.clone()).or_insert(map);
		}

		if !maps.contains_key(default_collection) {
			let map = load_default(coordinator, &status, default_collection, file).await?;
			maps.insert(default_collection.to_string(), Arc::new(map));
		}
		Ok(Self { maps })
	}

	/// Field name for `index_alias` in `collection`, or the alias itself when either is unknown.
	pub fn resolve<'a>(&'a self, collection: &str, index_alias: &'a str) -> &'a str {
		self.maps
			.get(collection)
			.and_then(|map| map.get(index_alias))
			.map(String::as_str)
			.unwrap_or(index_alias)
	}

	pub fn get(&self, collection: &str) -> Option<&AliasMap> {
		self.maps.get(collection).map(Arc::as_ref)
	}

	pub fn contains(&self, collection: &str) -> bool {
		self.maps.contains_key(collection)
	}

	pub fn len(&self) -> usize {
		self.maps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}

	/// Whether both collections are backed by the same map instance.
	pub fn shares_map(&self, a: &str, b: &str) -> bool {
		match (self.maps.get(a), self.maps.get(b)) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

async fn load_map(
	coordinator: &dyn ClusterCoordinator,
	collection: &str,
	core_url: &str,
	file: &str,
) -> Result<AliasMap> {
	let text = coordinator.fetch_config_file(core_url, file).await.map_err(|err| {
		Error::internal(format!("Failed to fetch {file} for collection {collection}."), err)
	})?;
	let Some(text) = text else {
		tracing::info!(collection, "No scan map found.");
		return Ok(AliasMap::new());
	};
	let map = properties::parse(&text).map_err(|err| {
		Error::internal(format!("Malformed {file} for collection {collection}."), err)
	})?;

	tracing::info!(collection, aliases = map.len(), "Loaded scan map.");
	Ok(map)
}

/// The default collection may be an alias the topology does not list. Its map is fetched by
/// substituting its name for the core of any live replica, which the engine resolves.
async fn load_default(
	coordinator: &dyn ClusterCoordinator,
	status: &ClusterStatus,
	default_collection: &str,
	file: &str,
) -> Result<AliasMap> {
	let Some(replica) =
		status.collections.iter().find_map(|collection| status.live_replica(collection))
	else {
		tracing::warn!(
			collection = default_collection,
			"No live replica to resolve the default collection, using an empty scan map."
		);
		return Ok(AliasMap::new());
	};
	let url = format!("{}/{default_collection}", replica.base_url.trim_end_matches('/'));
	tracing::info!(
		collection = default_collection,
		url = url.as_str(),
		"Resolving default collection scan map."
	);

	load_map(coordinator, default_collection, &url, file).await
}
