//! Field validation for inbound user records.
//!
//! # Responsibilities
//! - Reject malformed fields before any downstream call is made
//! - Normalize fields that have a canonical form (name, role, email domain)
//! - Name the failing field without echoing its value
//!
//! # Design Decisions
//! - Each field is an ordered list of rules; the first failing rule wins
//! - Record validation stops at the first failing field
//! - Pure functions over borrowed input, no shared state

use thiserror::Error;

use crate::users::model::{NewUser, Role, UserRecord};

pub const MIN_FIELD_LEN: usize = 2;
pub const MAX_FIELD_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_AGE: i64 = 150;

/// Characters that satisfy the password special-character rule.
pub const PASSWORD_SPECIALS: &str = r"@_!#$%^&*()<>?/\|}{~:";

const MAX_EMAIL_LOCAL_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;
const MAX_DOMAIN_LABEL_LEN: usize = 63;
const EMAIL_LOCAL_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// A locally detected rejection of one input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, format!("{} is required", field))
    }
}

/// A check on a field value and the message reported when it fails.
struct Rule {
    check: fn(&str) -> bool,
    message: &'static str,
}

fn first_violation(value: &str, rules: &[Rule]) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| !(rule.check)(value))
        .map(|rule| rule.message)
}

fn char_len_within(value: &str) -> bool {
    (MIN_FIELD_LEN..=MAX_FIELD_LEN).contains(&value.chars().count())
}

const USERNAME_RULES: &[Rule] = &[
    Rule {
        check: char_len_within,
        message: "username must be between 2 and 50 characters",
    },
    Rule {
        check: |v| v.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'),
        message: "username may only contain latin letters, digits, dots and underscores",
    },
    Rule {
        check: |v| !v.chars().all(|c| c.is_ascii_digit()),
        message: "username cannot consist only of digits",
    },
    Rule {
        check: |v| !v.chars().all(|c| c == '.' || c == '_'),
        message: "username cannot consist only of dots and underscores",
    },
];

/// Checked against the name as submitted.
const NAME_RAW_RULES: &[Rule] = &[Rule {
    check: char_len_within,
    message: "name must be between 2 and 50 characters",
}];

/// Checked against the name once whitespace is collapsed.
const NAME_NORMALIZED_RULES: &[Rule] = &[Rule {
    check: |v| !v.is_empty() && v.chars().all(|c| c.is_alphabetic() || c == ' '),
    message: "name may only contain letters and spaces",
}];

const PASSWORD_RULES: &[Rule] = &[
    Rule {
        check: |v| v.chars().count() >= MIN_PASSWORD_LEN,
        message: "password must be at least 8 characters long",
    },
    Rule {
        check: |v| v.chars().any(|c| c.is_ascii_digit()),
        message: "password must contain at least one digit",
    },
    Rule {
        check: |v| v.chars().any(char::is_uppercase),
        message: "password must contain at least one uppercase letter",
    },
    Rule {
        check: |v| v.chars().any(char::is_lowercase),
        message: "password must contain at least one lowercase letter",
    },
    Rule {
        check: |v| v.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        message: r"password must contain at least one special character (@_!#$%^&*()<>?/\|}{~:)",
    },
];

/// Validate a username: length, character class, all-digit, filler-only.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    match first_violation(raw, USERNAME_RULES) {
        Some(message) => Err(ValidationError::new("username", message)),
        None => Ok(raw.to_string()),
    }
}

/// Length check the raw name, then collapse whitespace runs and check the
/// result is letters and spaces only.
pub fn validate_name(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Some(message) = first_violation(raw, NAME_RAW_RULES) {
        return Err(ValidationError::new("name", message));
    }

    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match first_violation(&normalized, NAME_NORMALIZED_RULES) {
        Some(message) => Err(ValidationError::new("name", message)),
        None => Ok(Some(normalized)),
    }
}

/// Validate a password, reporting only the first broken rule.
///
/// Rules are checked in order: length, digit, uppercase, lowercase,
/// special character.
pub fn validate_password(raw: &str) -> Result<String, ValidationError> {
    match first_violation(raw, PASSWORD_RULES) {
        Some(message) => Err(ValidationError::new("password", message)),
        None => Ok(raw.to_string()),
    }
}

/// Case-insensitive role lookup. An absent role means [`Role::User`].
pub fn validate_role(raw: Option<&str>) -> Result<Role, ValidationError> {
    match raw.map(str::to_lowercase).as_deref() {
        None | Some("user") => Ok(Role::User),
        Some("admin") => Ok(Role::Admin),
        Some(_) => Err(ValidationError::new(
            "role",
            "role must be one of: user, admin",
        )),
    }
}

/// Bounds check an optional age against 0..=150.
pub fn validate_age(raw: Option<i64>) -> Result<Option<u8>, ValidationError> {
    let Some(age) = raw else {
        return Ok(None);
    };

    if !(0..=MAX_AGE).contains(&age) {
        return Err(ValidationError::new("age", "age must be between 0 and 150"));
    }
    u8::try_from(age)
        .map(Some)
        .map_err(|_| ValidationError::new("age", "age must be between 0 and 150"))
}

/// Syntax check an optional email address. The domain part is lowercased.
pub fn validate_email(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let invalid = || ValidationError::new("email", "value is not a valid email address");

    if raw.chars().count() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let mut parts = raw.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    if !is_valid_local_part(local) || !is_valid_domain(domain) {
        return Err(invalid());
    }

    Ok(Some(format!("{}@{}", local, domain.to_ascii_lowercase())))
}

fn is_valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= MAX_EMAIL_LOCAL_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || EMAIL_LOCAL_SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_DOMAIN_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

/// Validate every field of a raw user, in declaration order.
///
/// The first failing field fails the whole record.
pub fn validate_user(raw: &NewUser) -> Result<UserRecord, ValidationError> {
    let username = raw
        .username
        .as_deref()
        .ok_or_else(|| ValidationError::missing("username"))
        .and_then(validate_username)?;
    let password = raw
        .password
        .as_deref()
        .ok_or_else(|| ValidationError::missing("password"))
        .and_then(validate_password)?;
    let name = validate_name(raw.name.as_deref())?;
    let age = validate_age(raw.age)?;
    let email = validate_email(raw.email.as_deref())?;
    let role = validate_role(raw.role.as_deref())?;

    Ok(UserRecord {
        username,
        password,
        name,
        age,
        email,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reason_of<T: std::fmt::Debug>(result: Result<T, ValidationError>) -> String {
        result.unwrap_err().reason
    }

    #[rstest]
    #[case("jdoe")]
    #[case("John.Doe_42")]
    #[case("a1")]
    #[case("_abc_")]
    #[case(".hidden")]
    #[case("1.2")]
    fn test_username_accepts(#[case] raw: &str) {
        assert_eq!(validate_username(raw).unwrap(), raw);
    }

    #[rstest]
    #[case("a", "username must be between 2 and 50 characters")]
    #[case("jöhn", "username may only contain latin letters, digits, dots and underscores")]
    #[case("john doe", "username may only contain latin letters, digits, dots and underscores")]
    #[case("123", "username cannot consist only of digits")]
    #[case("...", "username cannot consist only of dots and underscores")]
    #[case("__", "username cannot consist only of dots and underscores")]
    #[case("._.", "username cannot consist only of dots and underscores")]
    fn test_username_rejects(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(reason_of(validate_username(raw)), expected);
    }

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_name_absent_passes_through() {
        assert_eq!(validate_name(None).unwrap(), None);
    }

    #[rstest]
    #[case("  John   Doe  ", "John Doe")]
    #[case("Anna", "Anna")]
    #[case("Jean\t Luc", "Jean Luc")]
    #[case("Мария", "Мария")]
    #[case(" J ", "J")]
    fn test_name_normalizes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_name(Some(raw)).unwrap().as_deref(), Some(expected));
    }

    #[rstest]
    #[case("John3", "name may only contain letters and spaces")]
    #[case("O'Neil", "name may only contain letters and spaces")]
    #[case("   ", "name may only contain letters and spaces")]
    #[case("J", "name must be between 2 and 50 characters")]
    fn test_name_rejects(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(reason_of(validate_name(Some(raw))), expected);
    }

    #[test]
    fn test_name_length_counts_raw_characters() {
        let padded = format!("Ann{}Lee", " ".repeat(60));
        assert_eq!(
            reason_of(validate_name(Some(&padded))),
            "name must be between 2 and 50 characters"
        );
    }

    #[test]
    fn test_password_accepts() {
        assert_eq!(validate_password("Abcd123!").unwrap(), "Abcd123!");
    }

    #[rstest]
    #[case("abc", "password must be at least 8 characters long")]
    #[case("Abcdefg!", "password must contain at least one digit")]
    #[case("abcd123!", "password must contain at least one uppercase letter")]
    #[case("ABCD123!", "password must contain at least one lowercase letter")]
    #[case("Abc12345", "password must contain at least one special character")]
    fn test_password_first_violation_wins(#[case] raw: &str, #[case] expected: &str) {
        let err = validate_password(raw).unwrap_err();
        assert_eq!(err.field, "password");
        assert!(err.reason.starts_with(expected), "{}", err.reason);
    }

    #[test]
    fn test_password_digit_must_be_ascii() {
        assert_eq!(
            reason_of(validate_password("Abcd١٢٣!")),
            "password must contain at least one digit"
        );
    }

    #[test]
    fn test_password_error_never_echoes_value() {
        let err = validate_password("hunter2").unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }

    #[rstest]
    #[case(None, Role::User)]
    #[case(Some("user"), Role::User)]
    #[case(Some("ADMIN"), Role::Admin)]
    #[case(Some("Admin"), Role::Admin)]
    fn test_role_normalizes(#[case] raw: Option<&str>, #[case] expected: Role) {
        assert_eq!(validate_role(raw).unwrap(), expected);
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = validate_role(Some("guest")).unwrap_err();
        assert_eq!(err.field, "role");
    }

    #[rstest]
    #[case(Some(0), Some(0))]
    #[case(Some(150), Some(150))]
    #[case(None, None)]
    fn test_age_accepts(#[case] raw: Option<i64>, #[case] expected: Option<u8>) {
        assert_eq!(validate_age(raw).unwrap(), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(151)]
    #[case(i64::MAX)]
    fn test_age_rejects(#[case] raw: i64) {
        assert_eq!(validate_age(Some(raw)).unwrap_err().field, "age");
    }

    #[rstest]
    #[case("jdoe@example.com", "jdoe@example.com")]
    #[case("first.last+tag@Mail.Example.ORG", "first.last+tag@mail.example.org")]
    #[case("x_y@sub-domain.io", "x_y@sub-domain.io")]
    fn test_email_accepts(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_email(Some(raw)).unwrap().as_deref(), Some(expected));
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("@example.com")]
    #[case("a@b@example.com")]
    #[case("jdoe@localhost")]
    #[case(".jdoe@example.com")]
    #[case("j..doe@example.com")]
    #[case("jdoe@-example.com")]
    #[case("jdoe@example.c")]
    #[case("jdoe@example.123")]
    #[case("j doe@example.com")]
    fn test_email_rejects(#[case] raw: &str) {
        assert_eq!(validate_email(Some(raw)).unwrap_err().field, "email");
    }

    fn well_formed() -> NewUser {
        NewUser {
            username: Some("jdoe".into()),
            password: Some("Abcd123!".into()),
            name: Some("  John   Doe  ".into()),
            age: Some(42),
            email: Some("jdoe@Example.com".into()),
            role: Some("ADMIN".into()),
        }
    }

    #[test]
    fn test_validate_user_normalizes() {
        let record = validate_user(&well_formed()).unwrap();
        assert_eq!(record.username(), "jdoe");
        assert_eq!(record.name(), Some("John Doe"));
        assert_eq!(record.age(), Some(42));
        assert_eq!(record.email(), Some("jdoe@example.com"));
        assert_eq!(record.role(), Role::Admin);
    }

    #[test]
    fn test_validate_user_is_idempotent() {
        let raw = well_formed();
        assert_eq!(validate_user(&raw).unwrap(), validate_user(&raw).unwrap());
    }

    #[test]
    fn test_validate_user_defaults_role() {
        let raw = NewUser {
            role: None,
            ..well_formed()
        };
        assert_eq!(validate_user(&raw).unwrap().role(), Role::User);
    }

    #[test]
    fn test_validate_user_missing_required() {
        let raw = NewUser {
            username: None,
            ..well_formed()
        };
        let err = validate_user(&raw).unwrap_err();
        assert_eq!(err, ValidationError::new("username", "username is required"));

        let raw = NewUser {
            password: None,
            ..well_formed()
        };
        assert_eq!(validate_user(&raw).unwrap_err().field, "password");
    }

    #[test]
    fn test_validate_user_reports_first_failing_field() {
        let raw = NewUser {
            password: Some("short".into()),
            name: Some("John3".into()),
            role: Some("guest".into()),
            ..well_formed()
        };
        assert_eq!(validate_user(&raw).unwrap_err().field, "password");
    }
}
