//! Field validation for feedback submissions.
//!
//! The form runs this before any request is made. The server only runs it
//! when strict validation is switched on.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Course, NewFeedbackRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Course,
    Rating,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Course => "course",
            Field::Rating => "rating",
            Field::Message => "message",
        }
    }

    fn error_message(&self) -> &'static str {
        match self {
            Field::Name => "Name is required",
            Field::Email => "Valid email required",
            Field::Course => "Please select a course",
            Field::Rating => "Please select a rating",
            Field::Message => "Message is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages. Empty means the submission is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    fn flag(&mut self, field: Field) {
        self.errors.insert(field, field.error_message());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for FieldErrors {}

pub fn check(
    name: &str,
    email: &str,
    course: &str,
    rating: Option<i64>,
    message: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if name.trim().is_empty() {
        errors.flag(Field::Name);
    }
    if !is_valid_email(email) {
        errors.flag(Field::Email);
    }
    if course.parse::<Course>().is_err() {
        errors.flag(Field::Course);
    }
    if !rating.is_some_and(|r| (1..=5).contains(&r)) {
        errors.flag(Field::Rating);
    }
    if message.trim().is_empty() {
        errors.flag(Field::Message);
    }

    errors
}

/// Server-side pass over a request body.
pub fn check_request(req: &NewFeedbackRequest) -> Result<(), FieldErrors> {
    let errors = check(
        req.name.as_deref().unwrap_or_default(),
        req.email.as_deref().unwrap_or_default(),
        req.course.as_deref().unwrap_or_default(),
        req.rating,
        req.message.as_deref().unwrap_or_default(),
    );

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// `[^@\s]` with `\s` spelled out as the browser's whitespace class, which
// includes U+FEFF and excludes U+0085.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let part = r"[^@\t\n\x0B\f\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}]+";
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
});

/// `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
