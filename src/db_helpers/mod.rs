use crate::errors::RequestError;

mod article_helpers;
mod icon_helpers;
mod like_helpers;
mod tag_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use icon_helpers::*;
pub use like_helpers::*;
pub use tag_helpers::*;
pub use user_helpers::*;

// ----------------- Helper Functions -----------------

/// Turns a foreign key failure on insert into a client error.
fn reject_unknown_reference(error: RequestError, message: &str) -> RequestError {
    match error {
        RequestError::DatabaseError(sqlx::Error::Database(e))
            if e.message().contains("FOREIGN KEY constraint failed") =>
        {
            RequestError::BadRequest(message.to_string())
        }
        other => other,
    }
}

/// Turns a foreign key failure on delete into a conflict: the row is still
/// referenced.
fn reject_in_use(error: RequestError, message: &'static str) -> RequestError {
    match error {
        RequestError::DatabaseError(sqlx::Error::Database(e))
            if e.message().contains("FOREIGN KEY constraint failed") =>
        {
            RequestError::Conflict(message)
        }
        other => other,
    }
}

/// Turns a UNIQUE failure on insert into a conflict.
fn reject_duplicate(error: RequestError, message: &'static str) -> RequestError {
    if error.is_unique_violation() {
        RequestError::Conflict(message)
    } else {
        error
    }
}
