//! Authentication primitives: login credentials and registration requests.
//!
//! Inbound payload parsing stays outside the domain; handlers hand raw
//! strings to these constructors before they talk to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::{Age, Email, UserName, UserValidationError};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Password was blank.
    EmptyPassword,
    /// A user attribute failed validation.
    User(UserValidationError),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::User(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl CredentialsValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyPassword => "password",
            Self::User(err) => err.field(),
        }
    }
}

fn checked_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised through [`Email::new`].
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use todo_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter2").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: checked_password(password)?,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: UserName,
    email: Email,
    age: Age,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
        age: i32,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: checked_password(password)?,
            name: UserName::new(name)?,
            age: Age::new(age)?,
        })
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

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
