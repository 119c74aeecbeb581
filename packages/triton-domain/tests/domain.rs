use triton_domain::{ScanPos, SplitTerm, properties, query};

#[test]
fn scan_pos_rejects_empty() {
	assert!("".parse::<ScanPos>().is_err());
}

#[test]
fn scan_pos_rejects_unknown() {
	let err = "middle".parse::<ScanPos>().expect_err("expected error");

	assert_eq!(err.to_string(), "pos must be one of first or last, got \"middle\".");
}

#[test]
fn scan_pos_parses_case_insensitively() {
	assert_eq!("first".parse::<ScanPos>().expect("first"), ScanPos::First);
	assert_eq!("LAST".parse::<ScanPos>().expect("last"), ScanPos::Last);
	assert_eq!(ScanPos::default(), ScanPos::First);
	assert_eq!(ScanPos::Last.to_string(), "last");
}

#[test]
fn scan_map_file_parses_aliases() {
	let text = "\
# Scan aliases for the bibliographic collection
mti = scan.mti
! legacy names
tit: scan.tit
fo  scan.fo
";
	let map = properties::parse(text).expect("parse failed");

	assert_eq!(map.get("mti").map(String::as_str), Some("scan.mti"));
	assert_eq!(map.get("tit").map(String::as_str), Some("scan.tit"));
	assert_eq!(map.get("fo").map(String::as_str), Some("scan.fo"));
	assert_eq!(map.len(), 3);
}

#[test]
fn reserved_suffix_survives_rejoin() {
	for (input, expected) in [
		("Test Phrase", "test phrase"),
		("Test Phrase (bog)", "test phrase (bog)"),
		("Test Phrase #245a", "test phrase #245a"),
		("Test Phrase #245a (bog)", "test phrase #245a (bog)"),
	] {
		let split = SplitTerm::split(input);

		assert_eq!(split.rejoin(&split.body.to_lowercase()), expected, "input: {input}");
	}
}

#[test]
fn field_probe_targets_the_field() {
	assert_eq!(query::field_probe("scan.mti"), "scan.mti:test");
}
