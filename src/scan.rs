//! Narrow response-text scanning shared by every fetcher.
//!
//! The public APIs consumed by the pages return small JSON, ICS or RSS bodies;
//! none of them need (or get) a conforming parser. These helpers implement the
//! one contract the fetch layer relies on: find the value for a key, tolerate
//! whitespace, and return `None` on absence instead of panicking or inventing
//! a zero. "No value" is always distinguishable from the number zero.
//!
//! All scanning is byte-offset based on the original body so a caller can
//! restrict a search to a region (e.g. inside the `"current_condition"`
//! block) by passing `from`.

/// Case-insensitive substring search starting at `from`.
///
/// ASCII-only folding, which matches the keys these APIs use.
pub fn index_of_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    let hay = haystack.as_bytes();
    let ndl = needle.as_bytes();
    hay[from..]
        .windows(ndl.len())
        .position(|w| w.eq_ignore_ascii_case(ndl))
        .map(|p| p + from)
}

/// Find `"key"` at or after `from` and return the byte offset of the opening
/// quote, or `None`.
fn find_key(body: &str, key: &str, from: usize) -> Option<usize> {
    let quoted = format!("\"{key}\"");
    index_of_ci(body, &quoted, from)
}

/// Extract the string value of `"key": "value"` at or after `from`.
///
/// The value is returned without quotes. Whitespace around the colon is
/// tolerated; escape sequences are left as-is (the UIs render them verbatim
/// after sanitization).
pub fn find_string_value(body: &str, key: &str, from: usize) -> Option<String> {
    let k = find_key(body, key, from)?;
    let colon = body[k..].find(':')? + k;
    let open = body[colon + 1..].find('"')? + colon + 1;
    let close = body[open + 1..].find('"')? + open + 1;
    Some(body[open + 1..close].to_string())
}

/// Extract the numeric value of `"key": 12.5` at or after `from`.
///
/// Tolerates whitespace after the colon and a quoted number (`"temp_C":"18"`).
/// Returns `None` when the key is absent or the token does not parse, never
/// zero as a stand-in.
pub fn find_number_value(body: &str, key: &str, from: usize) -> Option<f64> {
    let k = find_key(body, key, from)?;
    let colon = body[k..].find(':')? + k;
    let bytes = body.as_bytes();
    let mut s = colon + 1;
    while s < bytes.len() && (bytes[s].is_ascii_whitespace() || bytes[s] == b'"') {
        s += 1;
    }
    let mut e = s;
    while e < bytes.len() {
        match bytes[e] {
            b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E' => e += 1,
            _ => break,
        }
    }
    if e == s {
        return None;
    }
    body[s..e].parse().ok()
}

/// Extract the balanced `{ ... }` object following `"key"`, or `None`.
///
/// Used to restrict numeric scans to one block (e.g. the open-meteo `hourly`
/// object) so identical keys elsewhere in the body cannot shadow it.
pub fn extract_object_block<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let k = find_key(body, key, 0)?;
    let open = body[k..].find('{')? + k;
    let mut depth = 0usize;
    for (i, c) in body[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[open..=open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// First numeric element of the array following `"key"`, or `None`.
///
/// `"pm2_5": [7.8, 9.1, ...]` → `Some(7.8)`. A leading string element means
/// the array is not numeric and yields `None`.
pub fn first_array_number(body: &str, key: &str) -> Option<f64> {
    let k = find_key(body, key, 0)?;
    let open = body[k..].find('[')? + k;
    let bytes = body.as_bytes();
    let mut s = open + 1;
    while s < bytes.len() && bytes[s].is_ascii_whitespace() {
        s += 1;
    }
    if s >= bytes.len() || bytes[s] == b'"' {
        return None;
    }
    let mut e = s;
    while e < bytes.len() && bytes[e] != b',' && bytes[e] != b']' {
        e += 1;
    }
    body[s..e].trim().parse().ok()
}

/// All numeric elements of the array following `"key"`, in order.
///
/// Non-numeric elements are skipped. Returns an empty vec when the key or
/// array is absent.
pub fn array_numbers(body: &str, key: &str) -> Vec<f64> {
    let Some(k) = find_key(body, key, 0) else {
        return Vec::new();
    };
    let Some(open) = body[k..].find('[').map(|p| p + k) else {
        return Vec::new();
    };
    let Some(close) = body[open..].find(']').map(|p| p + open) else {
        return Vec::new();
    };
    body[open + 1..close]
        .split(',')
        .filter_map(|tok| tok.trim().parse().ok())
        .collect()
}

/// Content of the first `<tag>...</tag>` at or after `from`, plus the offset
/// just past the closing tag for resuming the scan.
///
/// `<![CDATA[...]]>` wrappers are stripped, as RSS feeds routinely use them.
pub fn find_tag(body: &str, tag: &str, from: usize) -> Option<(String, usize)> {
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");
    let open = index_of_ci(body, &open_tag, from)?;
    let open_end = body[open..].find('>')? + open + 1;
    let close = index_of_ci(body, &close_tag, open_end)?;
    let mut inner = body[open_end..close].trim();
    if let Some(stripped) = inner.strip_prefix("<![CDATA[") {
        inner = stripped.strip_suffix("]]>").unwrap_or(stripped);
    }
    Some((inner.trim().to_string(), close + close_tag.len()))
}

/// Drop characters the panel font cannot draw and collapse whitespace runs.
///
/// Applied to every string that came off the network before it reaches a
/// renderer (API bodies carry HTML entities, emoji and newlines).
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = true;
    for c in input.chars() {
        let keep = c.is_ascii_graphic() || c == ' ';
        let c = if c.is_whitespace() { ' ' } else if keep { c } else { continue };
        if c == ' ' {
            if last_space {
                continue;
            }
            last_space = true;
        } else {
            last_space = false;
        }
        out.push(c);
    }
    out.trim_end().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of_ci() {
        let body = r#"{"WeatherDesc":[{"value":"Sunny"}]}"#;
        assert_eq!(index_of_ci(body, "\"weatherdesc\"", 0), Some(1));
        assert_eq!(index_of_ci(body, "missing", 0), None);
        assert_eq!(index_of_ci(body, "value", 20), None, "search starts past the match");
    }

    #[test]
    fn test_find_string_value() {
        let body = r#"{"temp_C" : "18", "weatherDesc":[{"value":"Sunny"}]}"#;
        assert_eq!(find_string_value(body, "temp_C", 0).as_deref(), Some("18"));
        assert_eq!(find_string_value(body, "value", 0).as_deref(), Some("Sunny"));
        assert_eq!(find_string_value(body, "nope", 0), None);
    }

    #[test]
    fn test_find_number_value_plain_and_quoted() {
        let body = r#"{"EUR":0.943,"JPY": 171.2,"quoted":"18","neg":-3.5}"#;
        assert_eq!(find_number_value(body, "EUR", 0), Some(0.943));
        assert_eq!(find_number_value(body, "JPY", 0), Some(171.2));
        assert_eq!(find_number_value(body, "quoted", 0), Some(18.0));
        assert_eq!(find_number_value(body, "neg", 0), Some(-3.5));
    }

    #[test]
    fn test_find_number_value_absent_is_none_not_zero() {
        let body = r#"{"EUR":0.943}"#;
        assert_eq!(find_number_value(body, "USD", 0), None, "absence must not become 0.0");
        assert_eq!(find_number_value(r#"{"EUR":}"#, "EUR", 0), None, "empty token must not parse");
    }

    #[test]
    fn test_extract_object_block_balanced() {
        let body = r#"{"hourly":{"pm10":[20.1],"nested":{"x":1}},"tail":2}"#;
        let blk = extract_object_block(body, "hourly").expect("block");
        assert!(blk.starts_with('{') && blk.ends_with('}'));
        assert!(blk.contains("nested"), "nested object must stay inside the block");
        assert!(!blk.contains("tail"), "block must stop at its matching brace");
    }

    #[test]
    fn test_first_array_number() {
        let blk = r#"{"pm2_5":[7.8,9.1],"time":["2025-01-01T00:00"]}"#;
        assert_eq!(first_array_number(blk, "pm2_5"), Some(7.8));
        assert_eq!(first_array_number(blk, "time"), None, "string arrays are not numbers");
        assert_eq!(first_array_number(blk, "pm10"), None);
    }

    #[test]
    fn test_array_numbers() {
        let blk = r#"{"temperature_2m_mean":[3.1, 4.0,5.2,"x",6.3]}"#;
        assert_eq!(array_numbers(blk, "temperature_2m_mean"), vec![3.1, 4.0, 5.2, 6.3]);
        assert!(array_numbers(blk, "missing").is_empty());
    }

    #[test]
    fn test_find_tag_with_cdata() {
        let rss = "<channel><title>Feed</title><item><title><![CDATA[Breaking news]]></title></item></channel>";
        let (first, next) = find_tag(rss, "title", 0).expect("channel title");
        assert_eq!(first, "Feed");
        let (second, _) = find_tag(rss, "title", next).expect("item title");
        assert_eq!(second, "Breaking news", "CDATA wrapper must be stripped");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Sunny \n day\t\t here "), "Sunny day here");
        assert_eq!(sanitize_text("caf\u{e9} 18\u{b0}C"), "caf 18C", "non-ASCII glyphs are dropped");
    }
}
