//! Validation
//!
//! Client-side checks run before a form is submitted. Every form reports all of
//! its failing fields at once so a caller can show them side by side.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;
use url::Url;

use crate::roles::Role;

/// Largest accepted profile picture upload, in bytes.
pub const MAX_PROFILE_PIC_BYTES: u64 = 2 * 1024 * 1024;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Name length bounds on the profile form.
pub const NAME_LEN: (usize, usize) = (2, 50);

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// A single failed check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Field left empty.
    #[error("{field} is required")]
    Required {
        /// Offending field.
        field: &'static str,
    },

    /// Field shorter than allowed.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Offending field.
        field: &'static str,
        /// Minimum length.
        min: usize,
    },

    /// Field longer than allowed.
    #[error("{field} must be less than {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },

    /// Not an email address.
    #[error("{field} is not a valid email address")]
    InvalidEmail {
        /// Offending field.
        field: &'static str,
    },

    /// Not a URL, or a URL with a script payload.
    #[error("{field} is not a valid URL")]
    InvalidUrl {
        /// Offending field.
        field: &'static str,
    },

    /// Password and confirmation differ.
    #[error("passwords don't match")]
    PasswordMismatch,

    /// Upload larger than allowed.
    #[error("image size should be less than 2MB ({size} bytes given)")]
    FileTooLarge {
        /// Size of the rejected upload.
        size: u64,
    },

    /// Amount or quantity that must be positive.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },

    /// Operation not allowed for the record's current state.
    #[error("{0}")]
    InvalidState(&'static str),
}

impl ValidationError {
    /// Field the failure belongs to, if it belongs to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidEmail { field }
            | ValidationError::InvalidUrl { field }
            | ValidationError::NotPositive { field } => Some(*field),
            ValidationError::PasswordMismatch => Some("confirmPassword"),
            ValidationError::FileTooLarge { .. } => Some("profilePic"),
            ValidationError::InvalidState(_) => None,
        }
    }
}

/// Every failed check of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(SmallVec<[ValidationError; 2]>);

impl ValidationErrors {
    /// Record a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Record a failure when `check` fails.
    pub fn check(&mut self, check: Result<(), ValidationError>) {
        if let Err(error) = check {
            self.push(error);
        }
    }

    /// Whether every check passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All failures in check order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First failure for a field.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|error| error.field() == Some(field))
    }

    /// `Ok` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one check failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(smallvec::smallvec![error])
    }
}

impl std::error::Error for ValidationErrors {}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            Display::fmt(error, f)?;
        }

        Ok(())
    }
}

/// Fail when `value` is blank.
///
/// # Errors
///
/// [`ValidationError::Required`] when `value` is empty after trimming.
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(())
}

/// Check an email address.
///
/// # Errors
///
/// [`ValidationError::Required`] or [`ValidationError::InvalidEmail`].
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value)?;

    let valid = EMAIL
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value.trim()));

    if !valid {
        return Err(ValidationError::InvalidEmail { field });
    }

    Ok(())
}

/// Check a trimmed name against [`NAME_LEN`].
///
/// # Errors
///
/// [`ValidationError::Required`], [`ValidationError::TooShort`] or
/// [`ValidationError::TooLong`].
pub fn person_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    required(field, value)?;

    let (min, max) = NAME_LEN;
    let length = value.trim().chars().count();

    if length < min {
        return Err(ValidationError::TooShort { field, min });
    }

    if length > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

/// Check an optional image URL: it must parse and must not smuggle a script.
///
/// # Errors
///
/// [`ValidationError::InvalidUrl`].
pub fn image_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    let lowered = value.to_ascii_lowercase();

    if Url::parse(value).is_err()
        || lowered.contains("javascript:")
        || lowered.contains("data:text/html")
    {
        return Err(ValidationError::InvalidUrl { field });
    }

    Ok(())
}

/// Check a profile picture upload size.
///
/// # Errors
///
/// [`ValidationError::FileTooLarge`] above [`MAX_PROFILE_PIC_BYTES`].
pub fn profile_pic_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_PROFILE_PIC_BYTES {
        return Err(ValidationError::FileTooLarge { size });
    }

    Ok(())
}

/// Customer sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Sign-in email.
    pub email: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Chosen password.
    pub password: String,

    /// Password typed a second time.
    #[serde(skip)]
    pub confirm_password: String,

    /// Encoded profile picture, if one was chosen.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_pic: String,
}

impl SignUpForm {
    /// Run every sign-up check.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("firstName", &self.first_name));
        errors.check(required("lastName", &self.last_name));
        errors.check(email("email", &self.email));
        errors.check(required("phoneNumber", &self.phone_number));

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }

        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }

        errors.into_result()
    }
}

/// Signed-in user's profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Email, validated but not sent.
    #[serde(skip)]
    pub email: String,

    /// Profile picture URL; empty clears it.
    #[serde(serialize_with = "empty_as_null")]
    pub profile_pic: String,
}

fn empty_as_null<S: serde::Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_str(value)
    }
}

impl ProfileForm {
    /// Copy with names trimmed, as sent to the backend.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            profile_pic: self.profile_pic.trim().to_string(),
        }
    }

    /// Run every profile check.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(person_name("firstName", &self.first_name));
        errors.check(person_name("lastName", &self.last_name));
        errors.check(email("email", &self.email));
        errors.check(image_url("profilePic", &self.profile_pic));

        errors.into_result()
    }
}

/// Back-office form that creates an employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Sign-in email.
    pub email: String,

    /// Initial password.
    pub password: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Profile picture URL.
    pub profile_pic: String,

    /// Assigned role.
    pub role: Role,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            phone_number: String::new(),
            profile_pic: String::new(),
            role: Role::Admin,
        }
    }
}

impl EmployeeForm {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("firstName", &self.first_name));
        errors.check(required("lastName", &self.last_name));
        errors.check(required("email", &self.email));
        errors.check(required("password", &self.password));
        errors.check(required("phoneNumber", &self.phone_number));

        errors.into_result()
    }
}

/// Back-office form that edits an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeEdit {
    /// Account being edited.
    pub user_id: String,

    /// Display name.
    pub name: String,

    /// Sign-in email.
    pub email: String,

    /// Profile picture URL.
    pub profile_pic: String,

    /// Assigned role.
    pub role: Role,
}

impl EmployeeEdit {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("name", &self.name));
        errors.check(required("email", &self.email));

        errors.into_result()
    }
}

/// Contact form sent by a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    /// Sender name.
    pub name: String,

    /// Sender email.
    pub email: String,

    /// Subject line.
    pub subject: String,

    /// Message body.
    pub message: String,
}

impl ContactForm {
    /// Check the four required fields.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("name", &self.name));
        errors.check(email("email", &self.email));
        errors.check(required("subject", &self.subject));
        errors.check(required("message", &self.message));

        errors.into_result()
    }
}

/// Category name check shared by the add and rename forms.
///
/// # Errors
///
/// [`ValidationError::Required`] for a blank name.
pub fn category_name(name: &str) -> Result<(), ValidationError> {
    required("categoryName", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up() -> SignUpForm {
        SignUpForm {
            first_name: "Liya".to_string(),
            last_name: "Haile".to_string(),
            email: "liya@example.com".to_string(),
            phone_number: "+251911000000".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            profile_pic: String::new(),
        }
    }

    #[test]
    fn valid_sign_up_passes() {
        assert_eq!(sign_up().validate(), Ok(()));
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let form = SignUpForm {
            confirm_password: "secret2".to_string(),
            ..sign_up()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert_eq!(
            errors.for_field("confirmPassword"),
            Some(&ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn short_passwords_are_rejected() {
        let form = SignUpForm {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..sign_up()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert!(matches!(
            errors.for_field("password"),
            Some(ValidationError::TooShort { min: 6, .. })
        ));
    }

    #[test]
    fn profile_pic_size_limit() {
        assert_eq!(profile_pic_size(MAX_PROFILE_PIC_BYTES), Ok(()));
        assert_eq!(
            profile_pic_size(MAX_PROFILE_PIC_BYTES + 1),
            Err(ValidationError::FileTooLarge {
                size: MAX_PROFILE_PIC_BYTES + 1
            })
        );
    }

    #[test]
    fn email_pattern() {
        assert_eq!(email("email", "a@b.co"), Ok(()));

        for bad in ["a@b", "a b@c.d", "@b.c", "a@.c"] {
            assert_eq!(
                email("email", bad),
                Err(ValidationError::InvalidEmail { field: "email" }),
                "{bad}"
            );
        }
    }

    #[test]
    fn profile_names_are_trimmed_and_bounded() {
        assert_eq!(person_name("firstName", "  Al  "), Ok(()));
        assert_eq!(
            person_name("firstName", "   "),
            Err(ValidationError::Required { field: "firstName" })
        );
        assert_eq!(
            person_name("firstName", "A"),
            Err(ValidationError::TooShort {
                field: "firstName",
                min: 2
            })
        );
        assert_eq!(
            person_name("firstName", &"x".repeat(51)),
            Err(ValidationError::TooLong {
                field: "firstName",
                max: 50
            })
        );
    }

    #[test]
    fn profile_pictures_must_be_safe_urls() {
        assert_eq!(image_url("profilePic", ""), Ok(()));
        assert_eq!(image_url("profilePic", "https://cdn.example.com/a.png"), Ok(()));

        for bad in [
            "not a url",
            "javascript:alert(1)",
            "data:text/html,<script>",
            "https://x.example.com/?next=javascript:alert(1)",
        ] {
            assert_eq!(
                image_url("profilePic", bad),
                Err(ValidationError::InvalidUrl { field: "profilePic" }),
                "{bad}"
            );
        }
    }

    #[test]
    fn profile_form_reports_every_field() {
        let form = ProfileForm {
            first_name: "A".to_string(),
            last_name: String::new(),
            email: "nope".to_string(),
            profile_pic: "javascript:void(0)".to_string(),
        };

        let errors = form.validate().err().unwrap_or_default();

        assert_eq!(errors.iter().count(), 4);
        assert!(errors.to_string().contains("lastName is required"));
    }

    #[test]
    fn employee_form_defaults_to_admin_and_requires_fields() {
        let form = EmployeeForm::default();

        assert_eq!(form.role, Role::Admin);
        assert_eq!(form.validate().err().map(|e| e.iter().count()), Some(5));
    }

    #[test]
    fn employee_edit_requires_name_and_email() {
        let edit = EmployeeEdit {
            user_id: "u1".to_string(),
            name: "Sam".to_string(),
            email: String::new(),
            profile_pic: String::new(),
            role: Role::Sales,
        };

        assert_eq!(
            edit.validate(),
            Err(ValidationError::Required { field: "email" }.into())
        );
    }

    #[test]
    fn profile_form_sends_null_for_empty_picture() -> testresult::TestResult {
        let form = ProfileForm {
            first_name: " Abel ".to_string(),
            last_name: "Girma".to_string(),
            email: "abel@example.com".to_string(),
            profile_pic: String::new(),
        };

        let json = serde_json::to_value(form.trimmed())?;

        assert_eq!(
            json,
            serde_json::json!({"firstName": "Abel", "lastName": "Girma", "profilePic": null})
        );

        Ok(())
    }

    #[test]
    fn blank_category_names_are_rejected() {
        assert!(category_name("  ").is_err());
        assert!(category_name("Citrus").is_ok());
    }
}
