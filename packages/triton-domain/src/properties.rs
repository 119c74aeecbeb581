//! Reader for flat `key=value` files following `java.util.Properties` load rules.
//!
//! Comment lines start with `#` or `!`, a line ending in an odd number of
//! backslashes continues on the next line, and the key ends at the first
//! unescaped `=`, `:` or whitespace.

use std::collections::HashMap;

const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertiesError {
	#[error("Malformed \\uxxxx escape {escape:?} on logical line {line}.")]
	MalformedUnicodeEscape { line: usize, escape: String },
}

/// Parses properties text into a map. Later definitions of a key win.
pub fn parse(input: &str) -> Result<HashMap<String, String>, PropertiesError> {
	let mut entries = HashMap::new();
	for (index, line) in logical_lines(input).iter().enumerate() {
		let (key, value) = split_entry(line);
		let line_no = index + 1;
		entries.insert(unescape(key, line_no)?, unescape(value, line_no)?);
	}
	Ok(entries)
}

fn logical_lines(input: &str) -> Vec<String> {
	let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
	let mut lines = Vec::new();
	let mut pending: Option<String> = None;
	for natural in normalized.split('\n') {
		let trimmed = natural.trim_start_matches(WHITESPACE);
		if pending.is_none() && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
			continue;
		}

		let mut buf = pending.take().unwrap_or_default();
		if continues(trimmed) {
			buf.push_str(&trimmed[..trimmed.len() - 1]);
			pending = Some(buf);
		} else {
			buf.push_str(trimmed);
			lines.push(buf);
		}
	}

	if let Some(buf) = pending {
		lines.push(buf);
	}

	lines
}

fn continues(line: &str) -> bool {
	line.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
	let mut escaped = false;
	let mut key_end = line.len();
	for (idx, ch) in line.char_indices() {
		if escaped {
			escaped = false;

			continue;
		}

		match ch {
			'\\' => escaped = true,
			'=' | ':' => {
				key_end = idx;

				break;
			},
			ch if WHITESPACE.contains(&ch) => {
				key_end = idx;

				break;
			},
			_ => {},
		}
	}

	let rest = line[key_end..].trim_start_matches(WHITESPACE);
	let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
	(&line[..key_end], rest.trim_start_matches(WHITESPACE))
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars().peekable();
	while let Some(ch) = chars.next() {
		if ch != '\\' {
			out.push(ch);

			continue;
		}

		match chars.next() {
			Some('t') => out.push('\t'),
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('f') => out.push('\u{c}'),
			Some('u') => {
				let unit = read_code_unit(&mut chars, line)?;
				if (0xD800..0xDC00).contains(&unit) {
					let mut lookahead = chars.clone();
					if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
						let low = read_code_unit(&mut lookahead, line)?;
						if (0xDC00..0xE000).contains(&low) {
							let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
							out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
							chars = lookahead;

							continue;
						}
					}
				}

				out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
			},
			Some(other) => out.push(other),
			None => {},
		}
	}
	Ok(out)
}

fn read_code_unit(
	chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
	line: usize,
) -> Result<u32, PropertiesError> {
	let escape: String = chars.by_ref().take(4).collect();
	if escape.len() != 4 {
		return Err(PropertiesError::MalformedUnicodeEscape { line, escape });
	}

	u32::from_str_radix(&escape, 16)
		.map_err(|_| PropertiesError::MalformedUnicodeEscape { line, escape })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn get<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
		map.get(key).map(String::as_str)
	}

	#[test]
	fn supports_all_separators() {
		let map = parse("a=1\nb:2\nc 3\nd = 4\ne\t:\t5\nf").expect("parse failed");

		assert_eq!(get(&map, "a"), Some("1"));
		assert_eq!(get(&map, "b"), Some("2"));
		assert_eq!(get(&map, "c"), Some("3"));
		assert_eq!(get(&map, "d"), Some("4"));
		assert_eq!(get(&map, "e"), Some("5"));
		assert_eq!(get(&map, "f"), Some(""));
	}

	#[test]
	fn skips_comments_and_blank_lines() {
		let map = parse("# heading\n  ! bang\n\n   \nmti=scan.mti\r\n").expect("parse failed");

		assert_eq!(map.len(), 1);
		assert_eq!(get(&map, "mti"), Some("scan.mti"));
	}

	#[test]
	fn joins_continued_lines() {
		let map = parse("fruits = apple, \\\n    banana\nnext=1").expect("parse failed");

		assert_eq!(get(&map, "fruits"), Some("apple, banana"));
		assert_eq!(get(&map, "next"), Some("1"));
	}

	#[test]
	fn even_backslashes_do_not_continue() {
		let map = parse("path=c:\\\\\nnext=1").expect("parse failed");

		assert_eq!(get(&map, "path"), Some("c:\\"));
		assert_eq!(get(&map, "next"), Some("1"));
	}

	#[test]
	fn continuation_keeps_comment_markers() {
		let map = parse("key=a\\\n#b").expect("parse failed");

		assert_eq!(get(&map, "key"), Some("a#b"));
	}

	#[test]
	fn escaped_separators_belong_to_the_key() {
		let map = parse("scan\\:title=scan.ti\nmy\\ key=v").expect("parse failed");

		assert_eq!(get(&map, "scan:title"), Some("scan.ti"));
		assert_eq!(get(&map, "my key"), Some("v"));
	}

	#[test]
	fn decodes_escapes() {
		let map = parse("k=tab\\there\\u00e6\\q\nsmile=\\uD83D\\uDE00").expect("parse failed");

		assert_eq!(get(&map, "k"), Some("tab\there\u{e6}q"));
		assert_eq!(get(&map, "smile"), Some("\u{1F600}"));
	}

	#[test]
	fn later_definitions_win() {
		let map = parse("mti=first\nmti=second").expect("parse failed");

		assert_eq!(get(&map, "mti"), Some("second"));
	}

	#[test]
	fn rejects_malformed_unicode_escapes() {
		let err = parse("ok=1\nbad=\\u12g4").expect_err("expected error");

		assert_eq!(
			err,
			PropertiesError::MalformedUnicodeEscape { line: 2, escape: "12g4".to_string() }
		);
	}
}
