use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use triton_config::Error;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let table = root
		.as_table_mut()
		.and_then(|root| root.get_mut(section))
		.and_then(Value::as_table_mut)
		.expect("Sample config must include the section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn sample_toml_without(section: &str) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");

	root.as_table_mut().expect("Sample config must be a table.").remove(section);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("triton_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> triton_config::Result<triton_config::Config> {
	let path = write_temp_config(payload);
	let result = triton_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_message(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn loads_and_normalizes_sample_config() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Failed to load config.");

	assert_eq!(cfg.solr.url, "http://localhost:8983/solr");
	assert_eq!(cfg.solr.default_collection, "corepo");
	assert_eq!(cfg.scan.default_field_type, "dbc-scan");
	assert_eq!(cfg.scan.exact_frequency_timeout_ms, 10_000);
}

#[test]
fn scan_section_falls_back_to_reference_defaults() {
	let cfg = load_payload(sample_toml_without("scan")).expect("Failed to load config.");

	assert_eq!(cfg.scan.default_size, 20);
	assert_eq!(cfg.scan.default_field_type, "dbc-scan");
	assert_eq!(cfg.scan.scan_map_file, "scanMap.txt");
	assert_eq!(cfg.scan.exact_frequency_timeout_ms, 10_000);
}

#[test]
fn solr_url_must_be_http() {
	expect_validation_message(
		sample_toml_with("solr", "url", Value::String("zk1:2181/solr".to_string())),
		"solr.url must be an http:// or https:// URL.",
	);
}

#[test]
fn default_collection_must_be_non_empty() {
	expect_validation_message(
		sample_toml_with("solr", "default_collection", Value::String("   ".to_string())),
		"solr.default_collection must be non-empty.",
	);
}

#[test]
fn per_host_pool_must_fit_total_pool() {
	expect_validation_message(
		sample_toml_with("solr", "max_connections_per_host", Value::Integer(64)),
		"solr.max_connections_per_host must not exceed solr.max_connections.",
	);
}

#[test]
fn timeouts_must_be_positive() {
	expect_validation_message(
		sample_toml_with("solr", "read_timeout_ms", Value::Integer(0)),
		"solr.read_timeout_ms must be greater than zero.",
	);
	expect_validation_message(
		sample_toml_with("scan", "exact_frequency_timeout_ms", Value::Integer(0)),
		"scan.exact_frequency_timeout_ms must be greater than zero.",
	);
}

#[test]
fn default_size_must_be_positive() {
	expect_validation_message(
		sample_toml_with("scan", "default_size", Value::Integer(0)),
		"scan.default_size must be greater than zero.",
	);
}

#[test]
fn scan_map_file_must_be_non_empty() {
	expect_validation_message(
		sample_toml_with("scan", "scan_map_file", Value::String(String::new())),
		"scan.scan_map_file must be non-empty.",
	);
}

#[test]
fn missing_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("triton_config_test_does_not_exist.toml");

	let err = triton_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_is_a_parse_error() {
	let err = load_payload("[service\nhttp_bind =".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}
