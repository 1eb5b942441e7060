//! User payload types.
//!
//! `NewUser` is the raw, untrusted shape deserialized from a request body;
//! `UserRecord` only exists once every field rule has passed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw user fields as received from a client.
///
/// Every field is optional here so that a missing `username` or `password`
/// surfaces as a field-level validation error rather than a body parse error.
#[derive(Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

/// A validated, normalized user record ready to forward downstream.
///
/// Construct through [`crate::users::validate_user`]; fields are read-only.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) name: Option<String>,
    pub(crate) age: Option<u8>,
    pub(crate) email: Option<String>,
    pub(crate) role: Role,
}

impl UserRecord {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

/// The two roles a user may hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            username: "jdoe".into(),
            password: "Secret#123".into(),
            name: Some("John Doe".into()),
            age: Some(30),
            email: None,
            role: Role::Admin,
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let text = format!("{:?}", record());
        assert!(!text.contains("Secret#123"));
        assert!(text.contains("<redacted>"));

        let raw = NewUser {
            password: Some("Secret#123".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", raw).contains("Secret#123"));
    }

    #[test]
    fn test_serializes_forwarded_shape() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "jdoe",
                "password": "Secret#123",
                "name": "John Doe",
                "age": 30,
                "email": null,
                "role": "admin",
            })
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let raw: NewUser = serde_json::from_str(r#"{"username": "jdoe"}"#).unwrap();
        assert_eq!(raw.username.as_deref(), Some("jdoe"));
        assert!(raw.password.is_none());
        assert!(raw.role.is_none());
    }
}
