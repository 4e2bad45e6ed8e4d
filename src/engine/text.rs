//! Text heuristics shared by the decomposer and the reply parsers.

/// Trim `text[start..end]` and return the trimmed byte range, if non-empty.
pub(crate) fn trim_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let slice = text.get(start..end)?;
    let lead = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some((start + lead, start + lead + trimmed.len()))
}

/// Sentence byte ranges: split after `.`, `!` or `?` followed by whitespace,
/// and at newlines. `$4.5B` stays in one piece.
pub(crate) fn sentences(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let (end, next_start) = match c {
            '\n' => (i, i + 1),
            '.' | '!' | '?' => match chars.peek() {
                Some((_, next)) if !next.is_whitespace() => continue,
                _ => (i + 1, i + 1),
            },
            _ => continue,
        };
        out.extend(trim_range(text, start, end));
        start = next_start;
    }
    out.extend(trim_range(text, start, text.len()));
    out
}

/// Lowercased alphanumeric words.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Compiled keyword. A trailing `*` matches any word with that prefix;
/// multi-word keywords match consecutive words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Keyword {
    parts: Vec<String>,
    prefix: bool,
}

impl Keyword {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (body, prefix) = match raw.strip_suffix('*') {
            Some(body) => (body, true),
            None => (raw, false),
        };
        let parts = words(body);
        (!parts.is_empty()).then_some(Self { parts, prefix })
    }

    pub(crate) fn matches(&self, words: &[String]) -> bool {
        let last = self.parts.len() - 1;
        words.windows(self.parts.len()).any(|window| {
            window.iter().zip(&self.parts).enumerate().all(|(i, (word, part))| {
                if self.prefix && i == last {
                    word.starts_with(part.as_str())
                } else {
                    word == part
                }
            })
        })
    }
}

pub(crate) fn compile_keywords(raw: &[String]) -> Vec<Keyword> {
    raw.iter().filter_map(|k| Keyword::parse(k)).collect()
}

/// Indices of the keywords present in `words`.
pub(crate) fn keyword_hits(keywords: &[Keyword], words: &[String]) -> Vec<usize> {
    keywords
        .iter()
        .enumerate()
        .filter(|(_, k)| k.matches(words))
        .map(|(i, _)| i)
        .collect()
}

/// A line that may open a section: `Problem:`, `## Market`, `**Ask**`.
///
/// Returns the lowercased title and the byte offset, within the line, where
/// the section body starts. The caller decides whether the title is known.
pub(crate) fn parse_heading(line: &str) -> Option<(String, usize)> {
    let rest = line.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '#' | '*' | '_' | '>' | '-')
    });
    let offset = line.len() - rest.len();

    let (title, body_offset) = match rest.find(':') {
        Some(colon) => {
            let after = &rest[colon + 1..];
            let skip = after.len() - after.trim_start_matches(['*', '_']).len();
            (&rest[..colon], offset + colon + 1 + skip)
        }
        None => (rest, line.len()),
    };

    let title = normalize_title(title);
    (!title.is_empty()).then_some((title, body_offset))
}

fn normalize_title(raw: &str) -> String {
    raw.trim()
        .trim_matches(['*', '_', '#'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First JSON object embedded in a model reply. Code fences and prose on
/// either side are ignored, including prose that contains braces.
pub(crate) fn first_json_object(text: &str) -> Option<serde_json::Value> {
    text.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<serde_json::Value>()
            .next()?
            .ok()
            .filter(serde_json::Value::is_object)
    })
}

/// First sentence of `text`, or all of it when there is no terminator.
pub(crate) fn first_sentence(text: &str) -> &str {
    sentences(text)
        .first()
        .map_or("", |&(start, end)| &text[start..end])
}
