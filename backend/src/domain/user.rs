//! User data model.
//!
//! Value types validate on construction so a [`User`] can only ever hold a
//! positive identifier, a trimmed non-empty name, a lower-cased email address
//! and a plausible age.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of characters in a user name.
pub const USER_NAME_MAX: usize = 64;
/// Maximum number of characters in an email address.
pub const EMAIL_MAX: usize = 255;
/// Smallest accepted age.
pub const AGE_MIN: i32 = 1;
/// Largest accepted age.
pub const AGE_MAX: i32 = 150;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    AgeOutOfRange { min: i32, max: i32 },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::AgeOutOfRange { min, max } => {
                write!(f, "age must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl UserValidationError {
    /// Request field the error refers to, as named in JSON payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::AgeOutOfRange { .. } => "age",
        }
    }
}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(id: i32) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique public user name.
///
/// Surrounding whitespace is dropped; the stored value is what lookups
/// compare against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address.
///
/// # Examples
/// ```
/// use todo_backend::domain::Email;
///
/// let email = Email::new("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], lower-casing the address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        // Lower-casing may lengthen the text, so measure what gets stored.
        let normalised = trimmed.to_lowercase();
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// User age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Age(i32);

impl Age {
    /// Validate and construct an [`Age`].
    pub fn new(age: i32) -> Result<Self, UserValidationError> {
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            return Err(UserValidationError::AgeOutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
            });
        }
        Ok(Self(age))
    }

    /// Raw integer value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<Age> for i32 {
    fn from(value: Age) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Age {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user as exposed to clients.
///
/// The password hash lives on [`UserAccount`] so it can never be serialised
/// by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    age: Age,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(id: UserId, name: UserName, email: Email, age: Age) -> Self {
        Self {
            id,
            name,
            email,
            age,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn age(&self) -> Age {
        self.age
    }
}

/// PHC-formatted password hash. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Stored user record including credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// User about to be inserted; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub age: Age,
    pub password_hash: PasswordHash,
}
