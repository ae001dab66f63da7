use std::fmt::Display;

use deadpool_diesel::postgres::Pool;

use crate::errors::DatabaseError;

/// Where a pooled call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Checkout,
    Interact,
    Query,
}

/// Attach `operation` to a failure and log it at the level it deserves.
/// Missing rows are a normal lookup result and only show up at debug level.
fn report(stage: Stage, operation: &str, error: impl Display) -> DatabaseError {
    let error = match stage {
        Stage::Checkout => DatabaseError::PoolError {
            operation: operation.to_string(),
            message: error.to_string(),
        },
        Stage::Interact => DatabaseError::InteractionError {
            operation: operation.to_string(),
            message: error.to_string(),
        },
        Stage::Query => DatabaseError::QueryError {
            operation: operation.to_string(),
            message: error.to_string(),
        },
    };
    log(stage, &error);
    error
}

fn report_query(operation: &str, error: DatabaseError) -> DatabaseError {
    let error = error.with_operation(operation);
    log(Stage::Query, &error);
    error
}

fn log(stage: Stage, error: &DatabaseError) {
    if error.is_not_found() {
        tracing::debug!(operation = %error.operation(), "No matching record");
        return;
    }
    tracing::error!(operation = %error.operation(), stage = ?stage, error = %error, "Journal database call failed");
}

/// Pooled access to the journal database with operation context on every error.
pub trait JournalPool {
    /// Run `f` on a pooled connection, logging any failure together with
    /// `operation`.
    ///
    /// # Example
    /// ```ignore
    /// let setup = pool
    ///     .interact_with_context(format!("find setup for {user_id}"), move |conn| {
    ///         Setup::find_by_user(user_id, conn)
    ///     })
    ///     .await?;
    /// ```
    fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> impl std::future::Future<Output = Result<T, DatabaseError>> + Send
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static;
}

impl JournalPool for Pool {
    async fn interact_with_context<F, T, E>(
        &self,
        operation: String,
        f: F,
    ) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut diesel::PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DatabaseError> + Send + 'static,
    {
        let conn = self
            .get()
            .await
            .map_err(|e| report(Stage::Checkout, &operation, e))?;

        let outcome = conn
            .interact(f)
            .await
            .map_err(|e| report(Stage::Interact, &operation, e))?;

        outcome.map_err(|e| report_query(&operation, e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_and_interact_failures_keep_context() {
        let err = report(Stage::Checkout, "find setup", "timed out");
        assert!(matches!(err, DatabaseError::PoolError { .. }));
        assert_eq!(err.operation(), "find setup");

        let err = report(Stage::Interact, "record day 3", "worker panicked");
        assert!(matches!(err, DatabaseError::InteractionError { .. }));
        assert!(err.to_string().contains("worker panicked"));
    }

    #[test]
    fn test_query_failures_replace_placeholder_context() {
        let err = report_query("load ladder", diesel::result::Error::NotFound.into());
        assert!(err.is_not_found());
        assert_eq!(err.operation(), "load ladder");

        let err = report(Stage::Query, "load ladder", "syntax error");
        assert!(matches!(err, DatabaseError::QueryError { .. }));
    }
}
