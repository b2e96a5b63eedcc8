//! Restricted glob matching with capture tracking.
//!
//! Supported syntax, per `/`-separated segment:
//!
//! | Token | Matches | Capture |
//! |-------|---------|---------|
//! | literal | the exact segment text | none |
//! | `*` inside a segment | any run of characters except `/` | [`Capture::Segment`] per `*` |
//! | `**` as a whole segment | zero or more whole segments | [`Capture::SegmentRun`] |
//!
//! Patterns are compiled once into a token list. Directory traversal consults
//! [`Pattern::matches_prefix`] to skip subtrees the pattern can never reach.

use crate::bundler::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The text matched by one wildcard for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Text matched by a single `*`.
    Segment(String),
    /// Whole segments absorbed by a `**`, possibly none.
    SegmentRun(Vec<String>),
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Segment that must match exactly.
    Literal(String),
    /// Segment containing `*`; literal pieces between the stars.
    Wildcard(Vec<String>),
    /// `**`
    Globstar,
}

impl Token {
    fn parse(segment: &str) -> Self {
        if segment == "**" {
            return Token::Globstar;
        }
        if !segment.contains('*') {
            return Token::Literal(segment.to_string());
        }
        // Consecutive stars inside a segment behave as one.
        let mut collapsed = String::with_capacity(segment.len());
        for c in segment.chars() {
            if c == '*' && collapsed.ends_with('*') {
                continue;
            }
            collapsed.push(c);
        }
        Token::Wildcard(collapsed.split('*').map(str::to_string).collect())
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile a `/`-separated pattern. Empty and `.` segments are ignored.
    pub fn new(pattern: &str) -> Self {
        let tokens = pattern
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(Token::parse)
            .collect();
        Self {
            source: pattern.to_string(),
            tokens,
        }
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of `**` tokens and `*` wildcards, in that order.
    pub fn wildcard_counts(&self) -> (usize, usize) {
        self.tokens.iter().fold((0, 0), |(runs, stars), token| match token {
            Token::Globstar => (runs + 1, stars),
            Token::Wildcard(pieces) => (runs, stars + pieces.len() - 1),
            Token::Literal(_) => (runs, stars),
        })
    }

    /// Match a full relative path, returning captures in pattern order.
    ///
    /// `**` is greedy: it absorbs as many segments as still allow a match.
    pub fn captures(&self, segments: &[&str]) -> Option<Vec<Capture>> {
        let mut captures = Vec::new();
        if match_tokens(&self.tokens, segments, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }

    /// Whether some path beginning with `segments` followed by at least one
    /// more segment could match.
    pub fn matches_prefix(&self, segments: &[&str]) -> bool {
        prefix_possible(&self.tokens, segments)
    }
}

fn match_tokens(tokens: &[Token], segments: &[&str], captures: &mut Vec<Capture>) -> bool {
    let Some((token, rest)) = tokens.split_first() else {
        return segments.is_empty();
    };

    match token {
        Token::Literal(literal) => match segments.split_first() {
            Some((segment, tail)) if *segment == literal.as_str() => {
                match_tokens(rest, tail, captures)
            }
            _ => false,
        },
        Token::Wildcard(pieces) => {
            let Some((segment, tail)) = segments.split_first() else {
                return false;
            };
            let mark = captures.len();
            if match_segment(pieces, segment, captures) && match_tokens(rest, tail, captures) {
                return true;
            }
            captures.truncate(mark);
            false
        }
        Token::Globstar => {
            // A trailing `**` must name at least one segment, so `assets/**`
            // never matches a file called `assets`.
            let min = usize::from(rest.is_empty());
            for take in (min..=segments.len()).rev() {
                let (absorbed, tail) = segments.split_at(take);
                captures.push(Capture::SegmentRun(
                    absorbed.iter().map(|s| s.to_string()).collect(),
                ));
                let mark = captures.len();
                if match_tokens(rest, tail, captures) {
                    return true;
                }
                captures.truncate(mark - 1);
            }
            false
        }
    }
}

/// Match one segment against `lit * lit * ... lit`. Stars are greedy.
fn match_segment(pieces: &[String], segment: &str, captures: &mut Vec<Capture>) -> bool {
    let Some((first, rest)) = pieces.split_first() else {
        return false;
    };
    let Some(remainder) = segment.strip_prefix(first.as_str()) else {
        return false;
    };
    match_stars(rest, remainder, captures)
}

/// Each element of `pieces` is the literal that follows one `*`.
fn match_stars(pieces: &[String], text: &str, captures: &mut Vec<Capture>) -> bool {
    let Some((literal, rest)) = pieces.split_first() else {
        return text.is_empty();
    };

    let mut ends: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    ends.reverse();

    for end in ends {
        let (matched, after) = text.split_at(end);
        let Some(after) = after.strip_prefix(literal.as_str()) else {
            continue;
        };
        captures.push(Capture::Segment(matched.to_string()));
        if match_stars(rest, after, captures) {
            return true;
        }
        captures.pop();
    }
    false
}

fn prefix_possible(tokens: &[Token], segments: &[&str]) -> bool {
    let Some((segment, tail)) = segments.split_first() else {
        return !tokens.is_empty();
    };
    let Some((token, rest)) = tokens.split_first() else {
        return false;
    };
    match token {
        Token::Globstar => true,
        Token::Literal(literal) => literal.as_str() == *segment && prefix_possible(rest, tail),
        Token::Wildcard(pieces) => {
            let mut scratch = Vec::new();
            match_segment(pieces, segment, &mut scratch) && prefix_possible(rest, tail)
        }
    }
}

/// A file matched by a [`Pattern`] under some base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatch {
    /// `/`-separated path relative to the base directory
    pub relative_path: String,
    /// Absolute or base-joined source path
    pub source: PathBuf,
    /// Captures in pattern order
    pub captures: Vec<Capture>,
}

/// Walk `base_dir` and call `on_match` once per regular file matching `pattern`.
///
/// Entries are visited in file-name order. Subtrees that cannot match are not
/// entered, and neither is `skip` (the output directory, when it lies inside
/// the base directory). A missing base directory yields no matches.
pub fn walk<F>(
    base_dir: &Path,
    pattern: &Pattern,
    skip: Option<&Path>,
    mut on_match: F,
) -> Result<()>
where
    F: FnMut(&str, &[Capture]) -> Result<()>,
{
    if !base_dir.is_dir() {
        log::warn!(
            "Base directory {} does not exist; pattern '{}' matches nothing",
            base_dir.display(),
            pattern.as_str()
        );
        return Ok(());
    }

    let walker = WalkDir::new(base_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if skip.is_some_and(|skip| entry.path() == skip) {
                log::debug!("Not descending into output directory {}", entry.path().display());
                return false;
            }
            if !entry.file_type().is_dir() {
                return true;
            }
            match relative_segments(base_dir, entry.path()) {
                Some(segments) => {
                    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
                    pattern.matches_prefix(&segments)
                }
                None => false,
            }
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(segments) = relative_segments(base_dir, entry.path()) else {
            log::warn!("Skipping non UTF-8 path {}", entry.path().display());
            continue;
        };
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        if let Some(captures) = pattern.captures(&segments) {
            let relative = segments.join("/");
            log::debug!("'{}' matched {} {:?}", pattern.as_str(), relative, captures);
            on_match(&relative, &captures)?;
        }
    }
    Ok(())
}

/// Collect every match of `pattern` under `base_dir`, in traversal order.
pub fn collect_matches(
    base_dir: &Path,
    pattern: &Pattern,
    skip: Option<&Path>,
) -> Result<Vec<GlobMatch>> {
    let mut matches = Vec::new();
    walk(base_dir, pattern, skip, |relative, captures| {
        matches.push(GlobMatch {
            relative_path: relative.to_string(),
            source: base_dir.join(relative),
            captures: captures.to_vec(),
        });
        Ok(())
    })?;
    Ok(matches)
}

fn relative_segments(base: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(base).ok()?;
    relative
        .components()
        .map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect()
}
