use std::borrow::Cow;

const MAX_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes redacted together with the token that follows them.
const KEY_PREFIXES: [&str; 3] = ["sk-", "gsk_", "xai-"];

/// Markers kept in place; only the value after them is redacted.
const VALUE_MARKERS: [&str; 6] = [
    "Bearer ",
    "bearer ",
    "api_key=",
    "\"api_key\":\"",
    "access_token=",
    "\"access_token\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_token_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

/// Redact every `marker` occurrence followed by a token. Returns true on change.
fn redact_after(text: &mut String, marker: &str, keep_marker: bool) -> bool {
    let mut modified = false;
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find(marker) {
        let start = search_from + rel;
        let value_start = start + marker.len();
        let end = token_end(text, value_start);
        // Key prefixes only count at a word start ("risk-free" is not a key).
        let mid_word = !keep_marker
            && text[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        if end == value_start || mid_word {
            search_from = value_start;
            continue;
        }
        let replace_from = if keep_marker { value_start } else { start };
        text.replace_range(replace_from..end, REDACTED);
        modified = true;
        search_from = replace_from + REDACTED.len();
    }
    modified
}

/// Scrub API keys and bearer tokens from provider error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let suspicious = KEY_PREFIXES.iter().any(|p| input.contains(p))
        || VALUE_MARKERS.iter().any(|m| input.contains(m));
    if !suspicious {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in VALUE_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    for prefix in KEY_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and truncate, for text that ends up in logs or reports.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_ERROR_CHARS {
        return scrubbed.into_owned();
    }
    let truncated: String = scrubbed.chars().take(MAX_ERROR_CHARS).collect();
    format!("{truncated}...")
}
