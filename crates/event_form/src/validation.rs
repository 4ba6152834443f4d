//! Field predicates and the submittable gate.
//!
//! Every predicate is pure; [`compute_submittable`] is the conjunction of all
//! ten of them and is re-run in full after each mutation.

use shared::domain::DraftField;
use url::Url;

use crate::draft::{DraftEvent, TIME_PLACEHOLDER};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_LOCATION_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// `true` when the value holds at least one non-whitespace character.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Filled and at least `min` characters long, counted in Unicode scalar values.
pub fn has_min_len(value: &str, min: usize) -> bool {
    is_filled(value) && value.chars().count() >= min
}

pub fn is_chosen_time(value: &str) -> bool {
    is_filled(value) && value != TIME_PLACEHOLDER
}

/// Absolute URL with a scheme and a host. Whitespace anywhere is rejected
/// because the parser would otherwise silently strip it.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return false;
    }

    match Url::parse(raw) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

pub fn is_optional_link(value: &str) -> bool {
    value.is_empty() || is_valid_url(value)
}

pub fn field_is_valid(draft: &DraftEvent, field: DraftField) -> bool {
    match field {
        DraftField::Name => has_min_len(&draft.name, MIN_NAME_LEN),
        DraftField::Location => has_min_len(&draft.location, MIN_LOCATION_LEN),
        DraftField::Date => is_filled(&draft.date),
        DraftField::StartTime => is_chosen_time(&draft.start_time),
        DraftField::EndTime => is_chosen_time(&draft.end_time),
        DraftField::Description => has_min_len(&draft.description, MIN_DESCRIPTION_LEN),
        DraftField::Price => is_filled(&draft.price),
        DraftField::Type => draft.event_type.is_some(),
        DraftField::Link => is_optional_link(&draft.link),
        DraftField::ImageUri => is_filled(&draft.image_uri),
    }
}

pub fn compute_submittable(draft: &DraftEvent) -> bool {
    DraftField::ALL
        .into_iter()
        .all(|field| field_is_valid(draft, field))
}

/// Fields whose constraint currently fails, in form order.
pub fn failing_fields(draft: &DraftEvent) -> Vec<DraftField> {
    DraftField::ALL
        .into_iter()
        .filter(|field| !field_is_valid(draft, *field))
        .collect()
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
