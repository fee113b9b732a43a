//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database failures are mapped to the port error enums, with constraint
//!   names deciding which uniqueness conflict occurred.
//!
//! # Example
//!
//! ```ignore
//! use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/todos")).await?;
//! let todos = DieselTodoRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_todo_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
