//! Content classification: turn one side's file bytes into comparable lines.
//!
//! Routing, in order: class-like extension → class renderer; NUL-free
//! content with a detected or hinted charset → decoded text lines;
//! anything else → a single SHA-1 stamp line. Errors never escape: every
//! failure degrades to a stamp line so a single odd entry cannot abort
//! the run.

use crate::render::ClassRenderer;
use crate::source::SourceEntry;
use sha1::{Digest, Sha1};
use std::collections::BTreeSet;
use tracing::debug;

/// Minimum charset detector confidence (0..1) required to trust the guess.
const CHARSET_CONFIDENCE_THRESHOLD: f32 = 0.40;

/// How many leading bytes are scanned for NUL when sniffing for binary
/// content.
const BINARY_SNIFF_LIMIT: usize = 8000;

/// Produce the canonical line sequence for one side of a comparison unit.
///
/// An absent side yields an empty list.
pub fn read_lines(
    entry: Option<&SourceEntry>,
    class_extensions: &BTreeSet<String>,
    renderer: &dyn ClassRenderer,
) -> Vec<String> {
    let Some(entry) = entry else {
        return Vec::new();
    };

    let bytes = match entry.read_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("error reading {}: {err}", entry.relative_path);
            return vec![format!("FILE UNREADABLE: {}", entry.relative_path)];
        }
    };

    let is_class_like = entry
        .extension()
        .map(|extension| class_extensions.contains(extension))
        .unwrap_or(false);
    if is_class_like {
        return match renderer.render(&bytes) {
            Ok(lines) => lines,
            Err(err) => {
                debug!(
                    "class renderer failed on {}: {err}, falling back to hash",
                    entry.relative_path
                );
                hash_lines(&bytes)
            }
        };
    }

    decode_text(entry, &bytes)
}

fn decode_text(entry: &SourceEntry, bytes: &[u8]) -> Vec<String> {
    // Charset detectors happily report single-byte encodings with high
    // confidence for arbitrary bytes, so binary content is sniffed first:
    // a NUL byte near the start disqualifies the content as text.
    if looks_binary(bytes) {
        debug!("NUL byte in {}, treating as binary", entry.relative_path);
        return hash_lines(bytes);
    }

    let (charset, confidence, _language) = chardet::detect(bytes);
    debug!(
        "charset {charset} with {confidence:.2} confidence on {}",
        entry.relative_path
    );

    let label = if confidence >= CHARSET_CONFIDENCE_THRESHOLD {
        Some(charset)
    } else if let Some(hint) = encoding_hint(&entry.relative_path) {
        debug!("charset detection below threshold, trying hint {hint}");
        Some(hint.to_string())
    } else {
        debug!("charset detection below threshold and no hint, assuming binary");
        None
    };

    match label.and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes())) {
        Some(encoding) => {
            let (text, _, _) = encoding.decode(bytes);
            text.lines().map(str::to_string).collect()
        }
        None => hash_lines(bytes),
    }
}

/// Encoding conventions fixed by file name rather than content sniffing.
fn encoding_hint(relative_path: &str) -> Option<&'static str> {
    match relative_path.rsplit('/').next() {
        // The JAR specification fixes MANIFEST.MF to UTF-8.
        Some("MANIFEST.MF") => Some("UTF-8"),
        _ => None,
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LIMIT).any(|&byte| byte == 0)
}

fn hash_lines(bytes: &[u8]) -> Vec<String> {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    vec![format!("FILE SHA-1: {}", hex::encode(hasher.finalize()))]
}
