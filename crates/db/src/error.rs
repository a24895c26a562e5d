//! Store-level error type and its mapping into domain errors.

use fieldhub_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Failure reported by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key rejected the write. Carries the constraint name.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure (connectivity, syntax, decoding).
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::UniqueViolation(constraint),
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation(constraint)
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => CoreError::Conflict(format!(
                "{} already exists",
                describe_unique_constraint(&constraint)
            )),
            StoreError::ForeignKeyViolation(constraint) => CoreError::Conflict(format!(
                "Referenced record does not exist or is still in use ({constraint})"
            )),
            StoreError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                CoreError::Internal(err.to_string())
            }
        }
    }
}

/// Human wording for the unique constraints declared in the migrations.
fn describe_unique_constraint(constraint: &str) -> &'static str {
    match constraint {
        "uq_users_email" => "A user with this email",
        "uq_roles_name" => "A role with this name",
        "uq_field_types_name" => "A field type with this name",
        "uq_fields_name" => "A field with this name",
        "uq_project_fields_project_field" => "This field binding",
        _ => "A record with this value",
    }
}
