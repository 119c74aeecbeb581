use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub solr: Solr,
	#[serde(default)]
	pub scan: Scan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Solr {
	/// Base URL of any node in the cluster, e.g. "http://solr:8983/solr".
	pub url: String,
	/// Collection used when a request names none, and the target of health pings.
	pub default_collection: String,
	#[serde(default = "default_max_connections")]
	pub max_connections: u32,
	#[serde(default = "default_max_connections")]
	pub max_connections_per_host: u32,
	#[serde(default = "default_solr_timeout_ms")]
	pub connect_timeout_ms: u64,
	#[serde(default = "default_solr_timeout_ms")]
	pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scan {
	pub default_size: u32,
	pub default_field_type: String,
	/// Name of the alias map file inside each collection's config set.
	pub scan_map_file: String,
	/// Deadline for the whole exact-frequency fan-out of one request.
	pub exact_frequency_timeout_ms: u64,
}
impl Default for Scan {
	fn default() -> Self {
		Self {
			default_size: 20,
			default_field_type: "dbc-scan".to_string(),
			scan_map_file: "scanMap.txt".to_string(),
			exact_frequency_timeout_ms: 10_000,
		}
	}
}

fn default_max_connections() -> u32 {
	32
}

fn default_solr_timeout_ms() -> u64 {
	5_000
}
