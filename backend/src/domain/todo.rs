//! Todo items owned by a single user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum number of characters in a todo title.
pub const TODO_TITLE_MAX: usize = 255;

/// Validation errors returned by the todo value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    #[error("todo id must be a positive integer")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("unknown todo status: {0}")]
    UnknownStatus(String),
}

/// Database-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TodoId(i32);

impl TodoId {
    pub fn new(id: i32) -> Result<Self, TodoValidationError> {
        if id <= 0 {
            return Err(TodoValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TodoId> for i32 {
    fn from(value: TodoId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for TodoId {
    type Error = TodoValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Todo title, unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and construct a title, dropping surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::TodoTitle;
    ///
    /// assert_eq!(TodoTitle::new(" buy milk ").unwrap().as_ref(), "buy milk");
    /// assert!(TodoTitle::new("   ").is_err());
    /// ```
    pub fn new(title: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TODO_TITLE_MAX {
            return Err(TodoValidationError::TitleTooLong {
                max: TODO_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TodoTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Completion state of a todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Incomplete,
    Complete,
}

impl TodoStatus {
    /// Stored and serialised representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = TodoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            other => Err(TodoValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    id: TodoId,
    title: TodoTitle,
    status: TodoStatus,
    owner_id: UserId,
}

impl Todo {
    pub fn new(id: TodoId, title: TodoTitle, status: TodoStatus, owner_id: UserId) -> Self {
        Self {
            id,
            title,
            status,
            owner_id,
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Whether `user` may read or mutate this todo.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

/// Todo about to be inserted. New todos always start incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: TodoTitle,
    pub owner_id: UserId,
}
