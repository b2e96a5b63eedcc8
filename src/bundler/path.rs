//! Destination path reconstruction.
//!
//! A mapping's destination template uses the same wildcard tokens as its
//! source pattern. For each matched file the captures produced by the source
//! pattern are spliced back into the template: `**` tokens receive
//! [`Capture::SegmentRun`] values and `*` tokens receive [`Capture::Segment`]
//! values. Both kinds are paired from the right, so the last template token
//! receives the last capture of its kind.

use super::glob::Capture;

const GLOBSTAR: &str = "**";
const STAR: &str = "*";

/// Build the in-archive path for one match.
///
/// ```
/// use kodegen_bundler_artifacts::bundler::{build_path, Capture};
///
/// let captures = [
///     Capture::SegmentRun(vec!["a".into(), "b".into()]),
///     Capture::Segment("c".into()),
/// ];
/// assert_eq!(build_path("lib/**/*.js", &captures), "lib/a/b/c.js");
/// ```
pub fn build_path(destination: &str, captures: &[Capture]) -> String {
    let mut runs = Vec::new();
    let mut segments = Vec::new();
    for capture in captures {
        match capture {
            Capture::Segment(s) => segments.push(s.clone()),
            Capture::SegmentRun(run) => runs.push(run.join("/")),
        }
    }

    let spliced = splice_from_right(destination, GLOBSTAR, &mut runs);
    let spliced = splice_from_right(&spliced, STAR, &mut segments);

    let normalized = normalize_path(&spliced);
    let relative = normalized.trim_start_matches('/');
    if destination.starts_with('/') {
        format!("/{relative}")
    } else {
        relative.to_string()
    }
}

/// Replace occurrences of `token` in `template` with values popped from the
/// end of `values`. Occurrences left over once `values` is empty stay as-is.
fn splice_from_right(template: &str, token: &str, values: &mut Vec<String>) -> String {
    let parts: Vec<&str> = template.split(token).collect();
    let Some((last, rest)) = parts.split_last() else {
        return template.to_string();
    };

    let mut pieces = vec![(*last).to_string()];
    for part in rest.iter().rev() {
        pieces.push(values.pop().unwrap_or_else(|| token.to_string()));
        pieces.push((*part).to_string());
    }
    pieces.reverse();
    pieces.concat()
}

/// Normalize a `/`-separated path.
///
/// Collapses repeated separators, resolves `.` and `..` lexically, converts
/// `\` to `/`, and keeps a leading and trailing separator if present. An empty
/// relative result becomes `"."`.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let trailing = path.len() > 1 && path.ends_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let mut out = parts.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Count `**` and lone `*` tokens in a destination template, in the order
/// [`build_path`] consumes them.
pub(crate) fn count_template_tokens(template: &str) -> (usize, usize) {
    let globstars = template.matches(GLOBSTAR).count();
    let stars = template
        .split(GLOBSTAR)
        .map(|part| part.matches(STAR).count())
        .sum();
    (globstars, stars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: &str) -> Capture {
        Capture::Segment(s.to_string())
    }

    fn run(parts: &[&str]) -> Capture {
        Capture::SegmentRun(parts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(build_path("dist/*/out.js", &[seg("foo")]), "dist/foo/out.js");
    }

    #[test]
    fn test_globstar_and_segment() {
        let captures = [run(&["a", "b"]), seg("c")];
        assert_eq!(build_path("lib/**/*.js", &captures), "lib/a/b/c.js");
    }

    #[test]
    fn test_empty_run_collapses() {
        let captures = [run(&[]), seg("index")];
        assert_eq!(build_path("lib/**/*.js", &captures), "lib/index.js");
    }

    #[test]
    fn test_right_to_left_pairing() {
        // One template token, two captures: the last capture wins.
        assert_eq!(build_path("out/*.txt", &[seg("a"), seg("b")]), "out/b.txt");
        // Two template tokens, one capture: the last token is filled.
        assert_eq!(build_path("*/*.txt", &[seg("b")]), "*/b.txt");
        // Positional when counts align.
        assert_eq!(build_path("*-*.txt", &[seg("a"), seg("b")]), "a-b.txt");
    }

    #[test]
    fn test_absolute_destination_preserved() {
        assert_eq!(build_path("/opt/*/bin", &[seg("app")]), "/opt/app/bin");
        assert_eq!(build_path("./bin/*", &[seg("app")]), "bin/app");
    }

    #[test]
    fn test_literal_destination() {
        assert_eq!(build_path("docs/README.md", &[seg("x")]), "docs/README.md");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a//b/./c"), "a/b/c");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
        assert_eq!(normalize_path("../a"), "../a");
        assert_eq!(normalize_path("/../a"), "/a");
        assert_eq!(normalize_path("out/"), "out/");
        assert_eq!(normalize_path("./"), "./");
        assert_eq!(normalize_path(""), ".");
        assert_eq!(normalize_path("a\\b"), "a/b");
    }

    #[test]
    fn test_count_template_tokens() {
        assert_eq!(count_template_tokens("lib/**/*.js"), (1, 1));
        assert_eq!(count_template_tokens("*-*.txt"), (0, 2));
        assert_eq!(count_template_tokens("plain"), (0, 0));
    }
}
