use std::fmt::Write;

use triton_service::ScanResult;

/// Element-wrapped XML rendering of a scan result. A missing index and an empty term list are
/// left out, as in the JSON rendering.
pub fn scan_result(result: &ScanResult) -> String {
	let mut out = String::from("<ScanResult>\n");
	if let Some(index) = &result.index {
		let _ = writeln!(out, "  <index>{}</index>", escape(index));
	}
	if !result.terms.is_empty() {
		out.push_str("  <terms>\n");

		for term in &result.terms {
			let _ = writeln!(
				out,
				"    <term>\n      <value>{}</value>\n      <frequency>{}</frequency>\n    </term>",
				escape(&term.value),
				term.frequency
			);
		}

		out.push_str("  </terms>\n");
	}

	out.push_str("</ScanResult>\n");

	out
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&apos;"),
			// Not representable in XML 1.0.
			ch if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') => {},
			ch => out.push(ch),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use triton_service::Term;

	use super::*;

	#[test]
	fn wraps_terms() {
		let result = ScanResult {
			index: Some("scan.mti".to_string()),
			terms: vec![Term::new("harry", 2), Term::new("tom & jerry <3>", 1)],
		};

		assert_eq!(
			scan_result(&result),
			"<ScanResult>
  <index>scan.mti</index>
  <terms>
    <term>
      <value>harry</value>
      <frequency>2</frequency>
    </term>
    <term>
      <value>tom &amp; jerry &lt;3&gt;</value>
      <frequency>1</frequency>
    </term>
  </terms>
</ScanResult>
"
		);
	}

	#[test]
	fn empty_result_has_no_children() {
		assert_eq!(scan_result(&ScanResult::EMPTY), "<ScanResult>\n</ScanResult>\n");
	}
}
