//! Input rules: what a keystroke may contain, how it is normalised, and what
//! a record must satisfy before it can be submitted.

use crate::error::FormError;
use crate::record::{Field, VisitorRecord};

pub const MIN_ADDRESS_LEN: usize = 5;
pub const MIN_PURPOSE_LEN: usize = 3;

/// Names are ASCII letters and whitespace only.
pub fn is_valid_name(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Uppercase the first character of every space-separated word and lowercase
/// the rest. Splits on single spaces, so runs of spaces are kept as-is.
pub fn capitalize_words(value: &str) -> String {
    value
        .split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Uppercase a leading lowercase character; everything else untouched.
pub fn capitalize_leading(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => value.to_owned(),
    }
}

/// Keystroke normalisation for one field.
pub fn normalize_field(field: Field, raw: &str) -> Result<String, FormError> {
    if field.is_name() {
        if !is_valid_name(raw) {
            return Err(FormError::InputRejected { field });
        }
        Ok(capitalize_words(raw))
    } else {
        Ok(capitalize_leading(raw))
    }
}

/// Submit-time checks, first failure wins.
pub fn validate_submission(record: &VisitorRecord) -> Result<(), FormError> {
    if let Some(field) = Field::ALL
        .into_iter()
        .filter(|f| f.is_required())
        .find(|f| record.get(*f).trim().is_empty())
    {
        return Err(FormError::MissingRequired { field });
    }

    if record.address.chars().count() < MIN_ADDRESS_LEN {
        return Err(FormError::AddressTooShort {
            min: MIN_ADDRESS_LEN,
        });
    }

    if record.purpose.chars().count() < MIN_PURPOSE_LEN {
        return Err(FormError::PurposeTooShort {
            min: MIN_PURPOSE_LEN,
        });
    }

    Ok(())
}

/// Name capitalisation applied once more to the outgoing payload. Address and
/// purpose keep their keystroke-time form.
pub fn normalize_payload(record: &VisitorRecord) -> VisitorRecord {
    record.map(|field, value| {
        if field.is_name() && !value.is_empty() {
            capitalize_words(value)
        } else {
            value.to_owned()
        }
    })
}
