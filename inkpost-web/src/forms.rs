/// Form parsing and validation for the account pages
///
/// Browsers submit these as `application/x-www-form-urlencoded` bodies.
/// Validation collects EVERY applicable error into a [`FormErrors`] value
/// keyed by field, which the page renderer places next to the offending
/// inputs; a failed submit re-renders the page at 200 rather than
/// producing an HTTP error.
///
/// Presence/length constraints are declared with the `validator` derive;
/// cross-field checks (password confirmation) and domain checks (username
/// charset, password quality) are explicit below.
use inkpost_shared::auth::password::validate_password;
use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Validate;

/// Maximum username length, in characters
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Help text shown under the username input
pub const USERNAME_HELP_TEXT: &str =
    "Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only.";

/// Non-field error shown when login credentials don't check out
///
/// Deliberately doesn't reveal whether the username exists.
pub const INVALID_LOGIN_ERROR: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Field error shown when a username is already registered
pub const USERNAME_TAKEN_ERROR: &str = "A user with that username already exists.";

/// Validation errors accumulated for one form submission
///
/// Field errors are keyed by input name; non-field errors apply to the
/// submission as a whole (e.g. bad credentials). Iteration order is stable
/// so rendered output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    field_errors: BTreeMap<String, Vec<String>>,
    non_field_errors: Vec<String>,
}

impl FormErrors {
    /// Creates an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error against a field
    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Records an error that isn't tied to a single field
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field_errors.push(message.into());
    }

    /// Errors recorded against a field, empty if none
    pub fn field(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Errors not tied to a single field
    pub fn non_field(&self) -> &[String] {
        &self.non_field_errors
    }

    /// True when no errors have been recorded
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }
}

/// Folds `validator` derive output into a [`FormErrors`]
fn merge_validator_errors(errors: &mut FormErrors, validation: validator::ValidationErrors) {
    for (field, field_errors) in validation.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Enter a valid value.".to_string());
            errors.add_field(field, message);
        }
    }
}

/// Registration form: username plus the password entered twice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    /// Desired login name
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,

    /// Password confirmation
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

impl RegisterForm {
    /// Validates everything that can be checked without the database
    ///
    /// The username-availability check needs a query and lives in the
    /// handler; it appends to the same error set.
    ///
    /// Password-quality errors attach to the confirmation field, and only
    /// run once both entries are present and matching; a mismatch is
    /// reported alone.
    pub fn validate_fields(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(validation) = self.validate() {
            merge_validator_errors(&mut errors, validation);
        }

        if !self.username.is_empty() {
            let char_count = self.username.chars().count();
            if char_count > MAX_USERNAME_LENGTH {
                errors.add_field(
                    "username",
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        MAX_USERNAME_LENGTH, char_count
                    ),
                );
            }

            if !self.username.chars().all(is_valid_username_char) {
                errors.add_field(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, \
                     and @/./+/-/_ characters.",
                );
            }
        }

        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add_field("password2", "The two password fields didn't match.");
            } else {
                for message in validate_password(&self.password1, &self.username) {
                    errors.add_field("password2", message);
                }
            }
        }

        errors
    }
}

/// Characters a username may contain
fn is_valid_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    /// Login name
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,

    /// Where to go after a successful login (hidden input)
    pub next: Option<String>,
}

impl LoginForm {
    /// Validates field presence
    ///
    /// Credential verification happens in the handler; a failure there is
    /// recorded as the non-field [`INVALID_LOGIN_ERROR`].
    pub fn validate_fields(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(validation) = self.validate() {
            merge_validator_errors(&mut errors, validation);
        }

        errors
    }
}
