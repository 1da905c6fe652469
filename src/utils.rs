//! Utility helpers shared across the WASM frontend.
//!
//! Everything in here is deliberately free of DOM handles so the functions
//! can be unit-tested on the host target as well as in the browser.

/// Return the current timestamp in **milliseconds** since UNIX epoch.
///
/// We use JS Date here because it is available in browser/WASM without
/// pulling a clock source of our own.
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Current wall-clock time as an ISO-8601 string (what `LogEntry` records).
pub fn iso_now() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

/// Short local "HH:MM" stamp for footers like "Generated at 14:32".
pub fn local_time_short() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

/// Extract a query parameter from a search string (`"?tab=general&x=1"` or
/// `"tab=general&x=1"`).  Returns the decoded value of the **first** match.
pub fn query_param(search: &str, key: &str) -> Option<String> {
    let qs = search.strip_prefix('?').unwrap_or(search);
    for pair in qs.split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.splitn(2, '=');
        let k = parts.next().unwrap_or("");
        if k == key {
            return Some(url_decode(parts.next().unwrap_or("")));
        }
    }
    None
}

/// Percent-decode a query-string component.  `+` is treated as a space,
/// malformed escapes are passed through verbatim rather than erroring –
/// these values come from our own URLs, not hostile input.
pub fn url_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a query-string component.  Unreserved characters per
/// RFC 3986 stay as-is, everything else is `%XX`-escaped per byte.  Needed
/// because Signal group ids are base64 and routinely contain `+` and `=`.
pub fn url_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Assemble a query string (`k=v&k2=v2`) from key/value pairs.  Keys are our
/// own identifiers and pass through untouched; values are percent-encoded.
pub fn query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Minimal HTML escaping for text we interpolate into `innerHTML` fragments
/// (server error strings, display names).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn query_param_basic() {
        assert_eq!(query_param("?tab=general&debug=1", "tab").as_deref(), Some("general"));
        assert_eq!(query_param("tab=general&debug=1", "debug").as_deref(), Some("1"));
        assert_eq!(query_param("?tab=general", "missing"), None);
        assert_eq!(query_param("", "tab"), None);
    }

    #[test]
    fn query_param_decodes() {
        assert_eq!(
            query_param("?group_id=abc%2Bdef%3D&x=1", "group_id").as_deref(),
            Some("abc+def=")
        );
        assert_eq!(query_param("?q=a+b", "q").as_deref(), Some("a b"));
    }

    #[test]
    fn query_param_takes_first_match() {
        assert_eq!(query_param("?tab=a&tab=b", "tab").as_deref(), Some("a"));
    }

    #[test]
    fn encode_round_trips_group_ids() {
        let group_id = "x7Kp/q2v+base64id==";
        assert_eq!(url_decode(&url_encode(group_id)), group_id);
        // '+' must not survive unencoded or it would decode back to a space
        assert!(!url_encode(group_id).contains('+'));
    }

    #[test]
    fn query_string_encodes_values() {
        let qs = query_string(&[
            ("analysis_type", "daily summary".to_string()),
            ("group_id", "abc+def=".to_string()),
        ]);
        assert_eq!(qs, "analysis_type=daily%20summary&group_id=abc%2Bdef%3D");
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }
}
