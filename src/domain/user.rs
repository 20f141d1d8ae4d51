use crate::domain::payment::Payment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Persisted user record.
///
/// `role` is optional only because stored data may lack one; every user
/// created through signup carries `UserRole::User`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Option<UserRole>,
    pub payments: Vec<Payment>,
}

/// A user that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Option<UserRole>,
}

impl NewUser {
    pub fn with_id(self, id: u64) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            role: self.role,
            payments: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity produced by a successful credential check.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedPrincipal {
    pub user_id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<UserRole>,
}

impl From<&User> for AuthenticatedPrincipal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRead {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_upper_case() {
        let json = serde_json::to_string(&UserRole::User).unwrap();
        assert_eq!(json, "\"USER\"");
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = NewUser {
            email: "a@b.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Some(UserRole::User),
        }
        .with_id(1);

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["firstName"], "A");
        assert_eq!(value["role"], "USER");
        assert_eq!(value["payments"], serde_json::json!([]));
    }

    #[test]
    fn test_principal_copies_identity_fields() {
        let user = NewUser {
            email: "p@q.com".to_string(),
            first_name: "P".to_string(),
            last_name: "Q".to_string(),
            password_hash: "hash".to_string(),
            role: None,
        }
        .with_id(9);

        let principal = AuthenticatedPrincipal::from(&user);
        assert_eq!(principal.user_id, 9);
        assert_eq!(principal.email, "p@q.com");
        assert_eq!(principal.role, None);
    }
}
