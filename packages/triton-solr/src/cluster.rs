use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::{Error, Result, SolrClient, named_list};

/// Snapshot of the cluster topology as reported by the collections API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStatus {
	pub collections: Vec<CollectionState>,
	/// Alias name to its comma-separated target list.
	pub aliases: BTreeMap<String, String>,
	pub live_nodes: BTreeSet<String>,
}
impl ClusterStatus {
	/// First target of `alias`, or `None` when the name is not an alias.
	pub fn alias_target(&self, alias: &str) -> Option<&str> {
		self.aliases
			.get(alias)
			.and_then(|targets| targets.split(',').map(str::trim).find(|target| !target.is_empty()))
	}

	/// First active replica of `collection` hosted on a live node.
	pub fn live_replica<'a>(&self, collection: &'a CollectionState) -> Option<&'a Replica> {
		collection
			.replicas
			.iter()
			.find(|replica| replica.is_active() && self.live_nodes.contains(&replica.node_name))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
	pub name: String,
	pub config_name: Option<String>,
	pub replicas: Vec<Replica>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replica {
	pub shard: String,
	pub core: String,
	pub base_url: String,
	pub node_name: String,
	pub state: String,
}
impl Replica {
	pub fn is_active(&self) -> bool {
		self.state.eq_ignore_ascii_case("active")
	}

	pub fn core_url(&self) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), self.core)
	}
}

impl SolrClient {
	pub async fn cluster_status(&self) -> Result<ClusterStatus> {
		let url = format!("{}/admin/collections", self.base_url());
		let params = [("action", "CLUSTERSTATUS".to_string())];
		let json = self.get_json(&url, &params).await?;
		parse_cluster_status(&json)
	}

	/// Reads `file` from the config set of the core at `core_url`. A missing file yields `None`.
	pub async fn fetch_config_file(&self, core_url: &str, file: &str) -> Result<Option<String>> {
		let url = format!("{}/admin/file", core_url.trim_end_matches('/'));
		self.get_text_optional(&url, &[("file", file), ("contentType", "text/plain;charset=utf-8")])
			.await
	}
}

fn parse_cluster_status(json: &Value) -> Result<ClusterStatus> {
	let cluster = json
		.get("cluster")
		.or_else(|| lookup(json, "cluster"))
		.ok_or_else(|| Error::invalid_response("Cluster status is missing cluster."))?;
	let mut status = ClusterStatus::default();
	if let Some(collections) = lookup(cluster, "collections").and_then(named_list) {
		for (name, state) in collections {
			status.collections.push(parse_collection(name, state));
		}
	}
	if let Some(aliases) = lookup(cluster, "aliases").and_then(named_list) {
		for (alias, targets) in aliases {
			if let Some(targets) = targets.as_str() {
				status.aliases.insert(alias.to_string(), targets.to_string());
			}
		}
	}
	if let Some(nodes) = lookup(cluster, "live_nodes").and_then(Value::as_array) {
		status.live_nodes = nodes.iter().filter_map(Value::as_str).map(str::to_string).collect();
	}
	Ok(status)
}

fn parse_collection(name: &str, state: &Value) -> CollectionState {
	let config_name = lookup(state, "configName").and_then(Value::as_str).map(str::to_string);
	let mut replicas = Vec::new();
	for (shard, shard_state) in lookup(state, "shards").and_then(named_list).unwrap_or_default() {
		for (core_node, replica) in
			lookup(shard_state, "replicas").and_then(named_list).unwrap_or_default()
		{
			let field = |key: &str| {
				lookup(replica, key).and_then(Value::as_str).unwrap_or_default().to_string()
			};
			let core = field("core");
			replicas.push(Replica {
				shard: shard.to_string(),
				core: if core.is_empty() { core_node.to_string() } else { core },
				base_url: field("base_url"),
				node_name: field("node_name"),
				state: field("state"),
			});
		}
	}

	CollectionState { name: name.to_string(), config_name, replicas }
}

/// Key lookup that works for both object and named-list renderings.
fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
	match value {
		Value::Object(map) => map.get(key),
		_ => named_list(value)?.into_iter().find(|(name, _)| *name == key).map(|(_, v)| v),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Value {
		serde_json::json!({
			"responseHeader": { "status": 0, "QTime": 1 },
			"cluster": [
				["collections", [
					["corepo-20240101", {
						"configName": "corepo-config",
						"shards": {
							"shard1": {
								"replicas": {
									"core_node1": {
										"core": "corepo_shard1_replica_n1",
										"base_url": "http://solr-a:8983/solr",
										"node_name": "solr-a:8983_solr",
										"state": "down"
									},
									"core_node2": {
										"core": "corepo_shard1_replica_n2",
										"base_url": "http://solr-b:8983/solr/",
										"node_name": "solr-b:8983_solr",
										"state": "active"
									}
								}
							}
						}
					}]
				]],
				["aliases", { "corepo": "corepo-20240101,corepo-old" }],
				["live_nodes", ["solr-a:8983_solr", "solr-b:8983_solr"]]
			]
		})
	}

	#[test]
	fn parses_collections_aliases_and_live_nodes() {
		let status = parse_cluster_status(&sample()).expect("parse failed");
		let collection = &status.collections[0];

		assert_eq!(collection.name, "corepo-20240101");
		assert_eq!(collection.config_name.as_deref(), Some("corepo-config"));
		assert_eq!(collection.replicas.len(), 2);
		assert_eq!(status.alias_target("corepo"), Some("corepo-20240101"));
		assert_eq!(status.alias_target("corepo-20240101"), None);
		assert_eq!(status.live_nodes.len(), 2);
	}

	#[test]
	fn picks_active_replica_on_live_node() {
		let status = parse_cluster_status(&sample()).expect("parse failed");
		let replica = status.live_replica(&status.collections[0]).expect("live replica");

		assert_eq!(replica.shard, "shard1");
		assert_eq!(replica.core_url(), "http://solr-b:8983/solr/corepo_shard1_replica_n2");
	}

	#[test]
	fn no_live_replica_when_node_is_gone() {
		let mut status = parse_cluster_status(&sample()).expect("parse failed");

		status.live_nodes.remove("solr-b:8983_solr");

		assert_eq!(status.live_replica(&status.collections[0]), None);
	}
}
