//! Path reconciliation: merge two asymmetric entry maps into one ordered
//! list of comparison units, applying include/exclude filters and class
//! file coalescing.

use crate::source::SourceEntry;
use jardiff_common::DiffConfig;
use glob::{MatchOptions, Pattern};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One logical file to compare; at least one side is always present.
#[derive(Debug, Clone)]
pub struct ComparisonUnit {
    /// Coalesced or literal path used in report output.
    pub display_path: String,
    pub left: Option<SourceEntry>,
    pub right: Option<SourceEntry>,
}

/// Merge both sides' entries into an ordered comparison plan.
///
/// Class-like entries sharing a parent directory and file stem coalesce
/// into one unit displayed under the canonical `.class` path, as long as
/// each side contributes at most one alias. An ambiguous group (two or
/// more aliases on either side) falls back to literal per-path units so
/// nothing is silently dropped.
pub fn reconcile(
    left: &BTreeMap<String, SourceEntry>,
    right: &BTreeMap<String, SourceEntry>,
    config: &DiffConfig,
) -> Vec<ComparisonUnit> {
    let filter = PathFilter::new(&config.includes, &config.excludes);
    let left = filtered(left, &filter);
    let right = filtered(right, &filter);
    let class_extensions = config.class_like_extensions();

    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let mut coalesced: BTreeSet<(String, String)> = BTreeSet::new();
    let mut units = Vec::new();

    for key in keys {
        let is_class_like = extension_of(key)
            .map(|extension| class_extensions.contains(extension))
            .unwrap_or(false);
        if !is_class_like {
            units.push(literal_unit(key, &left, &right));
            continue;
        }

        let (parent, stem) = split_class_path(key);
        let aliases: Vec<String> = class_extensions
            .iter()
            .map(|extension| join_path(parent, stem, extension))
            .collect();
        let left_matches: Vec<&SourceEntry> =
            aliases.iter().filter_map(|alias| left.get(alias)).collect();
        let right_matches: Vec<&SourceEntry> =
            aliases.iter().filter_map(|alias| right.get(alias)).collect();

        if left_matches.len() <= 1 && right_matches.len() <= 1 {
            // One unit per coalesced group, even when several raw paths map
            // to it.
            if coalesced.insert((parent.to_string(), stem.to_string())) {
                debug!("coalesced entry {key}");
                units.push(ComparisonUnit {
                    display_path: join_path(parent, stem, "class"),
                    left: left_matches.first().map(|entry| (*entry).clone()),
                    right: right_matches.first().map(|entry| (*entry).clone()),
                });
            }
        } else {
            debug!("coalescing disabled for {key}: multiple aliases on one side");
            units.push(literal_unit(key, &left, &right));
        }
    }

    units
}

fn literal_unit(
    key: &str,
    left: &BTreeMap<String, SourceEntry>,
    right: &BTreeMap<String, SourceEntry>,
) -> ComparisonUnit {
    ComparisonUnit {
        display_path: key.to_string(),
        left: left.get(key).cloned(),
        right: right.get(key).cloned(),
    }
}

fn filtered(
    entries: &BTreeMap<String, SourceEntry>,
    filter: &PathFilter,
) -> BTreeMap<String, SourceEntry> {
    entries
        .iter()
        .filter(|(path, _)| {
            let accepted = filter.accepts(path);
            if !accepted {
                debug!("excluded: {path}");
            }
            accepted
        })
        .map(|(path, entry)| (path.clone(), entry.clone()))
        .collect()
}

fn extension_of(path: &str) -> Option<&str> {
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, extension)| extension)
}

/// Split `parent/dir/Name.ext` into `("parent/dir", "Name")`.
fn split_class_path(path: &str) -> (&str, &str) {
    let (parent, name) = match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    };
    (parent, stem)
}

fn join_path(parent: &str, stem: &str, extension: &str) -> String {
    if parent.is_empty() {
        format!("{stem}.{extension}")
    } else {
        format!("{parent}/{stem}.{extension}")
    }
}

/// Compiled include/exclude globs.
///
/// A bare filename pattern (no `/`, not starting with `**`) matches both at
/// the root and at any depth, so `*.properties` behaves like
/// `{*.properties, **/*.properties}`.
struct PathFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PathFilter {
    fn new(includes: &[String], excludes: &[String]) -> Self {
        Self {
            includes: compile(includes),
            excludes: compile(excludes),
        }
    }

    fn accepts(&self, path: &str) -> bool {
        let options = match_options();
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|pattern| pattern.matches_with(path, options));
        included
            && !self
                .excludes
                .iter()
                .any(|pattern| pattern.matches_with(path, options))
    }
}

fn compile(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .flat_map(|pattern| expand(pattern))
        .filter_map(|pattern| match Pattern::new(&pattern) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                warn!("ignoring invalid glob pattern '{pattern}': {err}");
                None
            }
        })
        .collect()
}

fn expand(pattern: &str) -> Vec<String> {
    if !pattern.contains('/') && !pattern.starts_with("**") {
        vec![pattern.to_string(), format!("**/{pattern}")]
    } else {
        vec![pattern.to_string()]
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}
