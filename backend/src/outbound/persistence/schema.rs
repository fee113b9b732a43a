//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` or update by hand when a migration changes a table.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        /// Unique public name (max 64 characters).
        name -> Varchar,
        /// Unique lower-cased email address.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        age -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Todo items; each row belongs to exactly one user.
    todos (id) {
        id -> Int4,
        /// Globally unique title (max 255 characters).
        title -> Varchar,
        /// `incomplete` or `complete`.
        status -> Varchar,
        /// Owning user.
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(todos -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(todos, users);
