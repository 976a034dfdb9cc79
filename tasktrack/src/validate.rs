//! Input validators.
//!
//! Each validator is a pure function over raw input text. Validators used in
//! edit context return `Ok(None)` for blank input, meaning "leave the
//! current value unchanged".

use chrono::NaiveDate;
use tasktrack_model::{EntityKind, TaskStatus};

use crate::error::{DateProblem, Error, Result};

/// Validates a required text field and returns it trimmed.
///
/// Length is counted in characters. `existing` holds the sibling values the
/// result must not collide with (exact, case-sensitive match);
/// `skip_current` is the entity's own current value, which is allowed.
///
/// # Errors
///
/// Returns [`Error::EmptyValue`], [`Error::MaxLength`] or
/// [`Error::DuplicateValue`].
pub fn non_empty_text<'a, I>(
    value: &str,
    max_len: usize,
    field: &str,
    existing: I,
    skip_current: Option<&str>,
) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyValue {
            field: field.to_string(),
        });
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(Error::MaxLength {
            field: field.to_string(),
            max: max_len,
            len,
        });
    }

    if skip_current != Some(trimmed) && existing.into_iter().any(|other| other == trimmed) {
        return Err(Error::DuplicateValue {
            field: field.to_string(),
            value: trimmed.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Checks that one more entity of `kind` fits in a collection of
/// `current` entities.
///
/// # Errors
///
/// Returns [`Error::LimitExceeded`] when `current >= max`.
pub fn max_count(current: usize, max: usize, kind: EntityKind) -> Result<()> {
    if current >= max {
        return Err(Error::LimitExceeded { kind, max });
    }
    Ok(())
}

/// Parses status text.
///
/// # Errors
///
/// Returns [`Error::InvalidStatus`] when non-blank input is not `todo`,
/// `doing` or `done` (any case).
pub fn status(value: &str) -> Result<Option<TaskStatus>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidStatus(value.trim().to_string()))
}

/// Parses a `YYYY-MM-DD` date without checking its range.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] with [`DateProblem::Malformed`] for
/// non-blank text that is not a calendar date.
pub fn date(value: &str) -> Result<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let malformed = || Error::InvalidDate {
        value: trimmed.to_string(),
        reason: DateProblem::Malformed,
    };
    if !is_iso_date_shape(trimmed) {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| malformed())
}

/// Parses a `YYYY-MM-DD` deadline that must not lie before `today`.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] for malformed text or a past date.
pub fn deadline(value: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    date(value)?.map(|d| not_in_past(d, today)).transpose()
}

/// Parses an edited deadline. Resubmitting `current` is always accepted,
/// even once it has passed; any other date must not lie before `today`.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] for malformed text or a new past date.
pub fn changed_deadline(
    value: &str,
    current: NaiveDate,
    today: NaiveDate,
) -> Result<Option<NaiveDate>> {
    date(value)?
        .map(|d| if d == current { Ok(d) } else { not_in_past(d, today) })
        .transpose()
}

fn not_in_past(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if date < today {
        return Err(Error::InvalidDate {
            value: date.format("%Y-%m-%d").to_string(),
            reason: DateProblem::InPast,
        });
    }
    Ok(date)
}

/// Like [`deadline`], but blank input is an error.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] with [`DateProblem::Missing`] for blank
/// input, otherwise as [`deadline`].
pub fn required_deadline(value: &str, today: NaiveDate) -> Result<NaiveDate> {
    deadline(value, today)?.ok_or_else(|| Error::InvalidDate {
        value: value.to_string(),
        reason: DateProblem::Missing,
    })
}

/// `chrono` accepts unpadded fields and signed years; only the strict
/// ten-character `YYYY-MM-DD` form is allowed here.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
