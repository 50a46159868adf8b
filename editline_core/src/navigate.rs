//! Field navigation
//!
//! Fields are searched in declaration order. Whether a field can take the
//! caret is decided by the caller, which asks the toolkit about the field's
//! primary icon.

use crate::field::Field;

/// First field that can take the caret
pub fn first_writable<F>(fields: &[Field], writable: F) -> Option<usize>
where
    F: Fn(&Field) -> bool,
{
    fields.iter().position(writable)
}

/// Last field that can take the caret
pub fn last_writable<F>(fields: &[Field], writable: F) -> Option<usize>
where
    F: Fn(&Field) -> bool,
{
    fields.iter().rposition(writable)
}

/// Next field after `index` that can take the caret
pub fn next_writable_after<F>(fields: &[Field], index: usize, writable: F) -> Option<usize>
where
    F: Fn(&Field) -> bool,
{
    let start = index.checked_add(1)?;
    fields
        .get(start..)?
        .iter()
        .position(writable)
        .map(|offset| start + offset)
}

/// Closest field before `index` that can take the caret
pub fn previous_writable_before<F>(fields: &[Field], index: usize, writable: F) -> Option<usize>
where
    F: Fn(&Field) -> bool,
{
    fields.get(..index)?.iter().rposition(writable)
}
