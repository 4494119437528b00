//! Line-oriented label file codec.
//!
//! One label per line, `"key":value` or `!"key":value` for hidden labels.
//! There is no escaping; `LabelStore::add` refuses keys and values that
//! could not be written back in this form.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::CoreError;
use crate::expand::Expander;
use crate::facts::FactProvider;

use super::store::LabelStore;
use super::types::{Label, KEY_DELIMITER};

// ==============================================================================
// Parsing
// ==============================================================================

/// Parse label file content. Malformed lines (unknown prefix, missing `":`,
/// missing line terminator, invalid key) are skipped. Repeated keys are kept
/// as separate entries in file order.
pub fn parse_labels(content: &str) -> LabelStore {
    parse_lines(content.split_inclusive('\n').map(Some))
}

/// Same as [`parse_labels`], but for raw file bytes: a line that is not
/// valid UTF-8 is skipped on its own instead of failing the whole file.
fn parse_label_bytes(content: &[u8]) -> LabelStore {
    parse_lines(
        content
            .split_inclusive(|b| *b == b'\n')
            .map(|line| std::str::from_utf8(line).ok()),
    )
}

fn parse_lines<'a>(lines: impl Iterator<Item = Option<&'a str>>) -> LabelStore {
    let mut store = LabelStore::new();

    for (line_num, raw) in lines.enumerate() {
        let line_num = line_num + 1;

        let Some(raw) = raw else {
            tracing::debug!(line = line_num, "skipping label line that is not valid UTF-8");
            continue;
        };
        let Some(line) = raw.strip_suffix('\n') else {
            tracing::debug!(line = line_num, "skipping unterminated label line");
            continue;
        };
        let Some((key, value, hidden)) = split_line(line) else {
            tracing::debug!(line = line_num, "skipping malformed label line");
            continue;
        };

        let repeated = store.get_label(key).is_some();
        match store.add(key, value, hidden, false) {
            Ok(()) if repeated => tracing::warn!(
                line = line_num,
                key,
                "duplicate label key; the first occurrence takes precedence"
            ),
            Ok(()) => {}
            Err(err) => {
                tracing::debug!(line = line_num, error = %err, "skipping invalid label line")
            }
        }
    }

    store
}

fn split_line(line: &str) -> Option<(&str, &str, bool)> {
    let (rest, hidden) = match line.strip_prefix("!\"") {
        Some(rest) => (rest, true),
        None => (line.strip_prefix('"')?, false),
    };
    let (key, value) = rest.split_once(KEY_DELIMITER)?;
    Some((key, value, hidden))
}

/// Load a label file from disk. A missing file is not an error and yields
/// `Ok(None)`; any other I/O failure is reported.
pub fn load_labels(path: &Path) -> Result<Option<LabelStore>, CoreError> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "label file not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(CoreError::LabelFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let store = parse_label_bytes(&content);
    tracing::debug!(path = %path.display(), labels = store.len(), "loaded label file");
    Ok(Some(store))
}

// ==============================================================================
// Writing
// ==============================================================================

fn write_line(out: &mut String, label: &Label, value: &str) {
    let marker = if label.hidden { "!" } else { "" };
    out.push_str(&format!("{marker}\"{}\":{value}\n", label.key));
}

fn line_len(label: &Label, value: &str) -> usize {
    usize::from(label.hidden) + label.key.len() + value.len() + 4
}

/// Serialise a store with raw, unexpanded values. The output parses back
/// into an identical store.
pub fn serialize_labels(store: &LabelStore) -> String {
    store.iter().fold(String::new(), |mut out, label| {
        write_line(&mut out, label, &label.value);
        out
    })
}

/// Write a store to disk in raw form, creating parent directories.
pub fn save_labels(path: &Path, store: &LabelStore) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serialize_labels(store))?;
    tracing::debug!(path = %path.display(), labels = store.len(), "saved label file");
    Ok(())
}

/// Render every label with its value expanded, appending to `out`.
///
/// The rendered text must stay strictly below `capacity` bytes; once the
/// next line would reach it, `CoreError::FormatOverflow` is returned and
/// whatever is in `out` must be discarded.
pub fn format_labels_into<F: FactProvider + ?Sized>(
    store: &LabelStore,
    expander: &Expander<'_, F>,
    out: &mut String,
    capacity: usize,
) -> Result<(), CoreError> {
    for label in store {
        let value = expander.expand(label)?;
        if out.len() + line_len(label, &value) >= capacity {
            return Err(CoreError::FormatOverflow { capacity });
        }
        write_line(out, label, &value);
    }
    Ok(())
}

pub fn format_labels<F: FactProvider + ?Sized>(
    store: &LabelStore,
    expander: &Expander<'_, F>,
    capacity: usize,
) -> Result<String, CoreError> {
    let mut out = String::new();
    format_labels_into(store, expander, &mut out, capacity)?;
    Ok(out)
}
