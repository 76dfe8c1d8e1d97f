//! Ant-style pattern matching for request paths and message destinations.
//!
//! # Pattern Syntax
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within a segment
//! - `**` matches zero or more segments
//! - `{name}` matches exactly one segment
//!
//! Segments are separated by `/` by default. Brokers that use dotted
//! destinations (`/topic/stocks.nasdaq`) can switch the separator to `.`.
//!
//! ```rust
//! use actix_messaging_security_core::http::security::ant_matcher::AntMatcher;
//!
//! let matcher = AntMatcher::new("/topic/**");
//! assert!(matcher.matches("/topic/news/sport"));
//!
//! let dotted = AntMatcher::with_separator("stocks.*.price", '.');
//! assert!(dotted.matches("stocks.nasdaq.price"));
//! ```
//!
//! # Spring Equivalent
//!
//! `org.springframework.util.AntPathMatcher`

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`, `?` or `{var}` inside a single segment
    Wildcard(String),
    /// `**`
    Any,
}

/// A compiled Ant-style pattern.
#[derive(Debug, Clone)]
pub struct AntMatcher {
    pattern: String,
    separator: char,
    segments: Vec<Segment>,
    case_sensitive: bool,
}

impl AntMatcher {
    /// Compiles a `/`-separated pattern.
    pub fn new(pattern: &str) -> Self {
        Self::with_separator(pattern, '/')
    }

    /// Compiles a pattern using a custom segment separator.
    pub fn with_separator(pattern: &str, separator: char) -> Self {
        let segments = split(pattern, separator)
            .map(|part| {
                if part == "**" {
                    Segment::Any
                } else if part.contains(['*', '?']) || (part.starts_with('{') && part.ends_with('}')) {
                    Segment::Wildcard(part.to_string())
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();

        AntMatcher {
            pattern: pattern.to_string(),
            separator,
            segments,
            case_sensitive: true,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns `true` when `path` matches the whole pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split(path, self.separator).collect();
        star_match(
            &self.segments,
            &parts,
            |segment| *segment == Segment::Any,
            |segment, part| match segment {
                Segment::Literal(literal) => self.segment_eq(literal, part),
                Segment::Wildcard(pattern) => self.wildcard_matches(pattern, part),
                Segment::Any => true,
            },
        )
    }

    fn segment_eq(&self, left: &str, right: &str) -> bool {
        if self.case_sensitive {
            left == right
        } else {
            left.eq_ignore_ascii_case(right)
        }
    }

    fn wildcard_matches(&self, pattern: &str, text: &str) -> bool {
        if pattern.starts_with('{') && pattern.ends_with('}') {
            return !text.is_empty();
        }

        let normalize = |s: &str| -> Vec<char> {
            if self.case_sensitive {
                s.chars().collect()
            } else {
                s.to_lowercase().chars().collect()
            }
        };
        glob(&normalize(pattern), &normalize(text))
    }
}

impl fmt::Display for AntMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl PartialEq for AntMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.separator == other.separator
            && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for AntMatcher {}

fn split(path: &str, separator: char) -> impl Iterator<Item = &str> {
    path.split(separator).filter(|s| !s.is_empty())
}

/// Single-segment glob over `*` and `?`.
fn glob(pattern: &[char], text: &[char]) -> bool {
    star_match(pattern, text, |c| *c == '*', |c, t| *c == '?' || c == t)
}

/// Matches `text` against `pattern`, where star elements absorb any run of
/// text and every other element consumes exactly one item.
///
/// Only the most recent star is retried, which keeps the work bounded by
/// `pattern.len() * text.len()`.
fn star_match<P, T>(
    pattern: &[P],
    text: &[T],
    is_star: impl Fn(&P) -> bool,
    matches_one: impl Fn(&P, &T) -> bool,
) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut retry: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && is_star(&pattern[p]) {
            retry = Some((p, t));
            p += 1;
        } else if p < pattern.len() && matches_one(&pattern[p], &text[t]) {
            p += 1;
            t += 1;
        } else if let Some((star, consumed)) = retry {
            p = star + 1;
            t = consumed + 1;
            retry = Some((star, t));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(is_star)
}
