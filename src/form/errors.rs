//! Client-side validation error bookkeeping.
//!
//! Validation errors are kept as a flat map from field path to a `true`
//! flag. The set is rebuilt wholesale on each submit attempt; when an
//! element is spliced out of an editable sequence the keyed entries must
//! be renumbered instead, which is what [`renumber_after_removal`] does.

use std::collections::BTreeMap;

use crate::form::path;

/// Flat map of field path to "has error" flag.
pub type ValidationErrors = BTreeMap<String, bool>;

/// Rewrites sequence-indexed error keys after the element at
/// `removed_index` was spliced out of the sequence at `base_path`.
///
/// Recognized keys are `basePath.<index>` and
/// `basePath.<index>.<fieldname>`, where the field name is limited to
/// ASCII letters, underscore, and hyphen. Entries for indices below the
/// removed one are copied unchanged, entries above shift down by one, and
/// entries for the removed index are dropped. Keys that do not match
/// either form are copied unchanged. The input set is never mutated.
pub fn renumber_after_removal(
    errors: &ValidationErrors,
    base_path: &str,
    removed_index: usize,
) -> ValidationErrors {
    let mut next = ValidationErrors::new();

    for (key, flag) in errors {
        let Some((index, field)) = split_entry(key, base_path) else {
            next.insert(key.clone(), *flag);
            continue;
        };

        if index < removed_index {
            next.insert(key.clone(), *flag);
        } else if index > removed_index {
            let renumbered = match field {
                Some(field) => format!("{base_path}.{}.{field}", index - 1),
                None => format!("{base_path}.{}", index - 1),
            };
            next.insert(renumbered, *flag);
        }
        // entries for the removed element itself are dropped
    }

    next
}

/// Splits `key` into its index and optional trailing field name, if it
/// addresses a member of the sequence at `base_path`.
fn split_entry<'k>(key: &'k str, base_path: &str) -> Option<(usize, Option<&'k str>)> {
    let rest = key.strip_prefix(base_path)?.strip_prefix('.')?;

    match rest.split_once('.') {
        None => Some((path::seq_index(rest)?, None)),
        Some((index, field)) => {
            let index = path::seq_index(index)?;

            if field.is_empty()
                || !field
                    .bytes()
                    .all(|b| b.is_ascii_alphabetic() || b == b'_' || b == b'-')
            {
                return None;
            }

            Some((index, Some(field)))
        }
    }
}
