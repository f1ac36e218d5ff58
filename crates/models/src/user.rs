use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{FieldErrors, ModelError};

/// Upper bound, in characters, for `name` and `email`.
pub const MAX_FIELD_LEN: usize = 255;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    )
    .expect("Invalid Regex")
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Validated input for a new record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn new(id: u64, new: NewUser) -> Self {
        Self { id, name: new.name, email: new.email }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[derive(Clone, Copy)]
enum Presence {
    Required,
    Sometimes,
}

#[derive(Clone, Copy)]
enum Rule {
    Text,
    Email,
}

fn required_msg(field: &str) -> String { format!("The {field} field is required.") }
fn string_msg(field: &str) -> String { format!("The {field} field must be a string.") }
fn email_msg(field: &str) -> String { format!("The {field} field must be a valid email address.") }
fn max_msg(field: &str) -> String {
    format!("The {field} field must not be greater than {MAX_FIELD_LEN} characters.")
}

/// Trim strings and turn blank ones into `null`, the way form input is
/// normalized before rules run.
fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other.clone(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check one field. A failed `required` stops the field; past that every
/// rule runs and each failure is recorded.
fn check_field(
    input: &Map<String, Value>,
    field: &str,
    presence: Presence,
    rule: Rule,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = match (input.get(field).map(normalize), presence) {
        (None, Presence::Sometimes) => return None,
        (None, Presence::Required) | (Some(Value::Null), Presence::Required) => {
            errors.add(field, required_msg(field));
            return None;
        }
        (Some(v), _) => v,
    };

    let mut valid = true;
    match (&value, rule) {
        (Value::String(_), Rule::Text) => {}
        (Value::String(s), Rule::Email) if is_valid_email(s) => {}
        (_, Rule::Text) => {
            errors.add(field, string_msg(field));
            valid = false;
        }
        (_, Rule::Email) => {
            errors.add(field, email_msg(field));
            valid = false;
        }
    }

    // `max` measures strings only
    let Value::String(text) = value else {
        return None;
    };
    if text.chars().count() > MAX_FIELD_LEN {
        errors.add(field, max_msg(field));
        valid = false;
    }
    valid.then_some(text)
}

/// Validate a create body: `name` required|string|max:255,
/// `email` required|email|max:255.
pub fn validate_create(input: &Map<String, Value>) -> Result<NewUser, ModelError> {
    let mut errors = FieldErrors::new();
    let name = check_field(input, "name", Presence::Required, Rule::Text, &mut errors);
    let email = check_field(input, "email", Presence::Required, Rule::Email, &mut errors);
    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(NewUser { name, email }),
        _ => Err(ModelError::Validation(errors)),
    }
}

/// Validate an update body: both fields optional, checked only when present.
pub fn validate_update(input: &Map<String, Value>) -> Result<UserPatch, ModelError> {
    let mut errors = FieldErrors::new();
    let name = check_field(input, "name", Presence::Sometimes, Rule::Text, &mut errors);
    let email = check_field(input, "email", Presence::Sometimes, Rule::Email, &mut errors);
    if !errors.is_empty() {
        return Err(ModelError::Validation(errors));
    }
    Ok(UserPatch { name, email })
}
