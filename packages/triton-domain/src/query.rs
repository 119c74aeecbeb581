const SPECIAL_CHARS: [char; 20] =
	['\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', ';', '/'];

/// Escapes characters with special meaning in the standard query parser.
pub fn escape_query_chars(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 8);
	for ch in value.chars() {
		if is_special(ch) {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

/// Exact phrase match of `value` in `field`.
pub fn exact_phrase(field: &str, value: &str) -> String {
	format!("{field}:\"{}\"", escape_query_chars(value))
}

/// Cheap query that makes the engine validate `field` without matching anything in particular.
pub fn field_probe(field: &str) -> String {
	format!("{field}:test")
}

fn is_special(ch: char) -> bool {
	SPECIAL_CHARS.contains(&ch) || ch.is_whitespace()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_braces_inside_phrase() {
		assert_eq!(exact_phrase("index", "{value}"), "index:\"\\{value\\}\"");
	}

	#[test]
	fn escapes_whitespace_and_operators() {
		assert_eq!(escape_query_chars("a b+c"), "a\\ b\\+c");
		assert_eq!(escape_query_chars("x:\"y\""), "x\\:\\\"y\\\"");
		assert_eq!(escape_query_chars("plain"), "plain");
	}
}
