//! Line-level diffing and unified diff rendering.

use similar::{DiffTag, TextDiff};

/// Label rendered for an absent side in the diff headers.
pub const ABSENT_SIDE_LABEL: &str = "/dev/null";

/// Render a unified diff between two line lists.
///
/// Returns an empty list when the inputs are equal. Labels default to the
/// `/dev/null` sentinel when a side is absent, so added and removed files
/// render as pure additions or deletions.
pub fn unified_diff(
    left_label: Option<&str>,
    right_label: Option<&str>,
    left_lines: &[String],
    right_lines: &[String],
    context_lines: usize,
) -> Vec<String> {
    let left_refs: Vec<&str> = left_lines.iter().map(String::as_str).collect();
    let right_refs: Vec<&str> = right_lines.iter().map(String::as_str).collect();
    let diff = TextDiff::from_slices(&left_refs, &right_refs);
    let groups = diff.grouped_ops(context_lines);
    if groups.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::new();
    output.push(format!("--- {}", left_label.unwrap_or(ABSENT_SIDE_LABEL)));
    output.push(format!("+++ {}", right_label.unwrap_or(ABSENT_SIDE_LABEL)));

    for group in &groups {
        let old_start = group.first().map(|op| op.old_range().start).unwrap_or(0);
        let old_end = group.last().map(|op| op.old_range().end).unwrap_or(0);
        let new_start = group.first().map(|op| op.new_range().start).unwrap_or(0);
        let new_end = group.last().map(|op| op.new_range().end).unwrap_or(0);

        output.push(format!(
            "@@ -{} +{} @@",
            hunk_range(old_start, old_end - old_start),
            hunk_range(new_start, new_end - new_start),
        ));

        for op in group {
            match op.tag() {
                DiffTag::Equal => {
                    for line in &left_lines[op.old_range()] {
                        output.push(format!(" {line}"));
                    }
                }
                DiffTag::Delete => {
                    for line in &left_lines[op.old_range()] {
                        output.push(format!("-{line}"));
                    }
                }
                DiffTag::Insert => {
                    for line in &right_lines[op.new_range()] {
                        output.push(format!("+{line}"));
                    }
                }
                DiffTag::Replace => {
                    for line in &left_lines[op.old_range()] {
                        output.push(format!("-{line}"));
                    }
                    for line in &right_lines[op.new_range()] {
                        output.push(format!("+{line}"));
                    }
                }
            }
        }
    }

    output
}

// Ranges are 1-based in hunk headers; an empty range keeps the 0-based
// line number of the position before it, per the unified format.
fn hunk_range(start: usize, len: usize) -> String {
    if len == 0 {
        format!("{start},0")
    } else {
        format!("{},{len}", start + 1)
    }
}

/// Count added and removed lines in a rendered unified diff, skipping the
/// `+++`/`---` header lines.
pub fn count_changes(unified_diff: &[String]) -> (usize, usize) {
    let mut additions = 0;
    let mut deletions = 0;
    for line in unified_diff {
        if line.starts_with('+') && !line.starts_with("+++") {
            additions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            deletions += 1;
        }
    }
    (additions, deletions)
}
