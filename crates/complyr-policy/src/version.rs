//! Semantic-version parsing with npm-style range syntax.
//!
//! Versions are strict SemVer 2.0 with an optional leading `v` or `=`. Ranges use
//! the npm grammar rule authors already know:
//!
//! ```text
//! ">=1.2.0 <2.0.0"      comparator set, whitespace = AND
//! "^1.2.0 || ~2.3.0"    alternatives, || = OR
//! "1.2.3 - 1.4.0"       hyphen range, inclusive
//! "1.2" / "1.x" / "*"   partials and wildcards
//! "1.2.3"               exact version
//! ```
//!
//! Each comparator set is rewritten into `semver::VersionReq` syntax. A
//! range that cannot be rewritten does not parse.

use std::cmp::Ordering;

use semver::{Version, VersionReq};
use tracing::debug;

/// Parse a version string. Returns `None` for anything that is not strict
/// semver after trimming whitespace and one leading `v` or `=`.
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix(['v', '=']).unwrap_or(trimmed)).ok()
}

/// Compare two versions by SemVer precedence. Build metadata is ignored.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// A parsed npm-style range: satisfied when any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse `raw` as a range. Returns `None` when any alternative is
    /// malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let alternatives = raw
            .split("||")
            .map(comparator_set)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

fn strip_v(s: &str) -> &str {
    s.strip_prefix('v').unwrap_or(s)
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

/// Rewrite one whitespace-separated comparator set into a `VersionReq`.
fn comparator_set(set: &str) -> Option<VersionReq> {
    let tokens = join_detached_operators(set.split_whitespace());

    let mut comparators = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 2 < tokens.len() && tokens[i + 1] == "-" {
            comparators.push(format!(">={}", strip_v(&tokens[i])));
            comparators.push(format!("<={}", strip_v(&tokens[i + 2])));
            i += 3;
            continue;
        }
        comparators.push(comparator(&tokens[i])?);
        i += 1;
    }

    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    let rewritten = comparators.join(", ");
    VersionReq::parse(&rewritten)
        .inspect_err(|e| {
            debug!(
                range = %set.trim(),
                rewritten = %rewritten,
                comparators = comparators.len(),
                error = %e,
                "comparator set rejected; range does not parse"
            );
        })
        .ok()
}

/// npm accepts `">= 1.2.0"`; glue a bare operator onto the token after it.
fn join_detached_operators<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Option<&str> = None;
    for token in tokens {
        match pending.take() {
            Some(op) => out.push(format!("{op}{token}")),
            None if token.chars().all(is_operator_char) => pending = Some(token),
            None => out.push(token.to_string()),
        }
    }
    if let Some(op) = pending {
        out.push(op.to_string());
    }
    out
}

fn comparator(token: &str) -> Option<String> {
    let split = token
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    let version = strip_v(version);

    if version.is_empty() || !matches!(op, "" | "<" | "<=" | ">" | ">=" | "=" | "~" | "^") {
        return None;
    }
    if !op.is_empty() {
        return Some(format!("{op}{version}"));
    }

    // Bare versions: npm reads a full version as exact and a partial one as
    // a wildcard, where VersionReq would default both to caret.
    let core = version.split(['-', '+']).next().unwrap_or(version);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.iter().any(|p| matches!(*p, "x" | "X" | "*")) {
        return Some(version.to_string());
    }
    match parts.len() {
        3 => Some(format!("={version}")),
        1 | 2 => Some(format!("{version}.*")),
        _ => None,
    }
}
