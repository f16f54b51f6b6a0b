//! Markdown normalization into the two-marker convention.
//!
//! A single forward pass per line replaces the usual chain of regex
//! substitutions. Precedence is explicit, highest first:
//!
//! 1. Protected spans: fenced code blocks and inline code are copied verbatim.
//! 2. Embedded media: `![alt](src)` keeps its alt text, `![[embed]]` is dropped.
//! 3. Links: `[text](url)` keeps `text`, `[[target|alias]]` keeps the alias.
//! 4. Emphasis delimiters (`*`, `_`, `~~`, `==`) are removed.
//! 5. Block markers: `#` headings become `[Hn]`, `> [!kind]` callouts become
//!    `[CALLOUT:kind]`, quote prefixes and horizontal rules disappear.
//!
//! Normalization never fails; unrecognized syntax passes through as text.

use super::markers::{callout_marker, heading_marker};

/// Normalize Markdown source into marker-annotated plain text.
pub fn normalize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut lines = source.lines().peekable();

    if lines.peek().is_some_and(|line| line.trim_end() == "---") {
        lines.next();
        for line in lines.by_ref() {
            if line.trim_end() == "---" {
                break;
            }
        }
    }

    let mut fence: Option<String> = None;
    for line in lines {
        let trimmed = line.trim_start();

        if let Some(open) = &fence {
            if trimmed.starts_with(open.as_str()) {
                fence = None;
            } else {
                out.push_str(line);
                out.push('\n');
            }
            continue;
        }
        if let Some(open) = fence_opener(trimmed) {
            fence = Some(open);
            continue;
        }

        out.push_str(&normalize_block(trimmed));
        out.push('\n');
    }

    out
}

/// Opening code fence (three or more backticks or tildes).
fn fence_opener(line: &str) -> Option<String> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = line.chars().take_while(|c| *c == ch).count();
    (run >= 3).then(|| ch.to_string().repeat(run))
}

fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|rule| compact.chars().all(|c| c == *rule))
}

fn normalize_block(line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }
    if is_horizontal_rule(line) {
        return String::new();
    }

    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        let rest = &line[hashes..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let title = rest.trim().trim_end_matches('#').trim_end();
            #[allow(clippy::cast_possible_truncation)]
            let marker = heading_marker(hashes as u8);
            return format!("{marker}{}", normalize_inline(title).trim_start());
        }
    }

    if line.starts_with('>') {
        let body = line.trim_start_matches(|c: char| c == '>' || c.is_whitespace());
        if let Some((kind, title)) = callout_header(body) {
            let marker = callout_marker(&kind);
            return format!("{marker}{}", normalize_inline(title).trim_start());
        }
        return normalize_inline(body);
    }

    if let Some(bullet_len) = bullet_prefix(line) {
        let (bullet, rest) = line.split_at(bullet_len);
        return format!("{bullet}{}", normalize_inline(rest));
    }

    normalize_inline(line)
}

/// Parse `[!kind]` (optionally followed by `+`/`-`) at the start of a quote body.
fn callout_header(body: &str) -> Option<(String, &str)> {
    let rest = body.strip_prefix("[!")?;
    let end = rest.find(']')?;
    let kind = &rest[..end];
    if kind.is_empty()
        || !kind
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return None;
    }
    let title = rest[end + 1..].trim_start_matches(['+', '-']).trim();
    Some((kind.to_ascii_lowercase(), title))
}

/// Length of a list bullet (`- `, `* `, `+ `, `• `) including its space.
fn bullet_prefix(line: &str) -> Option<usize> {
    let mut chars = line.chars();
    let bullet = chars.next().filter(|c| matches!(c, '-' | '*' | '+' | '•'))?;
    chars
        .next()
        .filter(|c| *c == ' ')
        .map(|_| bullet.len_utf8() + 1)
}

/// Inline pass over one line of text.
fn normalize_inline(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() => {
                out.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                let run = count_run(&chars, i, '`');
                if let Some(close) = find_run(&chars, i + run, '`', run) {
                    let code: String = chars[i + run..close].iter().collect();
                    out.push_str(code.trim());
                    i = close + run;
                } else {
                    out.extend(&chars[i..i + run]);
                    i += run;
                }
            }
            '!' if chars.get(i + 1) == Some(&'[') => {
                if let Some((alt, next)) = parse_media(&chars, i + 1) {
                    out.push_str(&alt);
                    i = next;
                } else {
                    out.push(c);
                    i += 1;
                }
            }
            '[' => {
                if let Some((label, next)) = parse_link(&chars, i) {
                    out.push_str(&normalize_inline(&label));
                    i = next;
                } else {
                    out.push(c);
                    i += 1;
                }
            }
            '*' | '_' => {
                let run = count_run(&chars, i, c);
                let before = i.checked_sub(1).map(|p| chars[p]);
                let after = chars.get(i + run).copied();
                let spaced = before.map_or(true, char::is_whitespace)
                    && after.map_or(true, char::is_whitespace);
                let intraword = c == '_'
                    && before.is_some_and(char::is_alphanumeric)
                    && after.is_some_and(char::is_alphanumeric);
                if spaced || intraword {
                    out.extend(&chars[i..i + run]);
                }
                i += run;
            }
            '~' | '=' if chars.get(i + 1) == Some(&c) => {
                i += count_run(&chars, i, c);
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn count_run(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|c| **c == ch).count()
}

/// Find a closing run of exactly `len` copies of `ch` at or after `from`.
fn find_run(chars: &[char], from: usize, ch: char, len: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == ch {
            let run = count_run(chars, i, ch);
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn find_char(chars: &[char], from: usize, ch: char) -> Option<usize> {
    chars[from..].iter().position(|c| *c == ch).map(|p| p + from)
}

/// `[[target|alias]]` starting at `start` (which points at the first `[`).
fn parse_wikilink(chars: &[char], start: usize) -> Option<(String, usize)> {
    if chars.get(start + 1) != Some(&'[') {
        return None;
    }
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == ']' && chars[i + 1] == ']' {
            let inner: String = chars[start + 2..i].iter().collect();
            let label = inner.rsplit('|').next().unwrap_or_default().to_string();
            return Some((label, i + 2));
        }
        i += 1;
    }
    None
}

/// `[text](url)` or a wikilink, starting at `start` (the `[`).
fn parse_link(chars: &[char], start: usize) -> Option<(String, usize)> {
    if let Some(wiki) = parse_wikilink(chars, start) {
        return Some(wiki);
    }
    let close = find_char(chars, start + 1, ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let end = find_char(chars, close + 2, ')')?;
    let label: String = chars[start + 1..close].iter().collect();
    Some((label, end + 1))
}

/// `![alt](src)` keeps alt text, `![[embed]]` is dropped. `start` points at `[`.
fn parse_media(chars: &[char], start: usize) -> Option<(String, usize)> {
    if let Some((_, next)) = parse_wikilink(chars, start) {
        return Some((String::new(), next));
    }
    parse_link(chars, start)
}
