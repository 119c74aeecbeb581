mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Scan, Service, Solr};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;
	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if !(cfg.solr.url.starts_with("http://") || cfg.solr.url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "solr.url must be an http:// or https:// URL.".to_string(),
		});
	}
	if cfg.solr.default_collection.is_empty() {
		return Err(Error::Validation {
			message: "solr.default_collection must be non-empty.".to_string(),
		});
	}
	if cfg.solr.max_connections == 0 {
		return Err(Error::Validation {
			message: "solr.max_connections must be greater than zero.".to_string(),
		});
	}
	if cfg.solr.max_connections_per_host == 0 {
		return Err(Error::Validation {
			message: "solr.max_connections_per_host must be greater than zero.".to_string(),
		});
	}
	if cfg.solr.max_connections_per_host > cfg.solr.max_connections {
		return Err(Error::Validation {
			message: "solr.max_connections_per_host must not exceed solr.max_connections."
				.to_string(),
		});
	}

	for (label, value) in [
		("solr.connect_timeout_ms", cfg.solr.connect_timeout_ms),
		("solr.read_timeout_ms", cfg.solr.read_timeout_ms),
		("scan.exact_frequency_timeout_ms", cfg.scan.exact_frequency_timeout_ms),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.scan.default_size == 0 {
		return Err(Error::Validation {
			message: "scan.default_size must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("scan.default_field_type", &cfg.scan.default_field_type),
		("scan.scan_map_file", &cfg.scan.scan_map_file),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	Ok(())
}

fn normalize(cfg: &mut Config) {
	let url = cfg.solr.url.trim().trim_end_matches('/');
	cfg.solr.url = url.to_string();
	cfg.solr.default_collection = cfg.solr.default_collection.trim().to_string();
}
