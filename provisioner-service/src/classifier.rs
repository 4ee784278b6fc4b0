//! Maps backend failures onto the driver's error taxonomy.

use std::fmt::Display;

use common::errors::AppError;
use common::utils::{DdlKind, DdlStatement};

/// SQLSTATE `duplicate_database`.
pub const DUPLICATE_DATABASE: &str = "42P04";
/// SQLSTATE `unique_violation`, raised on the `pg_database` name index when
/// two concurrent creates race past each other.
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE `invalid_catalog_name`.
pub const INVALID_CATALOG_NAME: &str = "3D000";

/// Classifies a failure to establish the administrative connection.
pub fn connection_failure(err: impl Display) -> AppError {
    AppError::ConnectionFailure(format!("Can't connect: {}", err))
}

/// Classifies a failure of the catalog query or its row iteration.
pub fn query_failure(err: impl Display) -> AppError {
    AppError::QueryFailure(format!("Can't get databases: {}", err))
}

/// Classifies a failed lifecycle DDL statement.
pub fn classify_ddl_error(statement: &DdlStatement, err: &sqlx::Error) -> AppError {
    let code = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned());
    classify_sqlstate(statement, code.as_deref(), err)
}

/// Classifies a DDL failure from its SQLSTATE, if the backend reported one.
///
/// Conflicts are only reclassified for the statement kind they can answer:
/// duplicates for `CREATE`, missing catalogs for `DROP`. Everything else is
/// `Internal` with the backend message attached.
pub fn classify_sqlstate(
    statement: &DdlStatement,
    code: Option<&str>,
    message: impl Display,
) -> AppError {
    let name = statement.target().as_str().to_string();
    match (statement.kind(), code) {
        (DdlKind::Create, Some(DUPLICATE_DATABASE | UNIQUE_VIOLATION)) => {
            AppError::AlreadyExists(name)
        }
        (DdlKind::Drop, Some(INVALID_CATALOG_NAME)) => AppError::NotFound(name),
        (DdlKind::Create, _) => AppError::Internal(format!("Can't create {}: {}", name, message)),
        (DdlKind::Drop, _) => {
            AppError::Internal(format!("Can't delete database {}: {}", name, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::utils::IdentifierSanitizer;

    fn create_stmt(name: &str) -> DdlStatement {
        DdlStatement::create_database(&IdentifierSanitizer::sanitize(name).unwrap())
    }

    fn drop_stmt(name: &str) -> DdlStatement {
        DdlStatement::drop_database(&IdentifierSanitizer::sanitize(name).unwrap())
    }

    #[test]
    fn test_duplicate_database_on_create() {
        let err = classify_sqlstate(&create_stmt("t1"), Some(DUPLICATE_DATABASE), "exists");
        assert_eq!(err, AppError::AlreadyExists("t1".into()));
    }

    #[test]
    fn test_unique_violation_race_on_create() {
        let err = classify_sqlstate(&create_stmt("t1"), Some(UNIQUE_VIOLATION), "dup key");
        assert_eq!(err, AppError::AlreadyExists("t1".into()));
    }

    #[test]
    fn test_missing_database_on_drop() {
        let err = classify_sqlstate(&drop_stmt("t1"), Some(INVALID_CATALOG_NAME), "missing");
        assert_eq!(err, AppError::NotFound("t1".into()));
    }

    #[test]
    fn test_conflict_codes_do_not_cross_kinds() {
        assert!(matches!(
            classify_sqlstate(&drop_stmt("t1"), Some(DUPLICATE_DATABASE), "x"),
            AppError::Internal(_)
        ));
        assert!(matches!(
            classify_sqlstate(&create_stmt("t1"), Some(INVALID_CATALOG_NAME), "x"),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_other_failures_wrap_backend_message() {
        let err = classify_sqlstate(&drop_stmt("t1"), Some("55006"), "database is being accessed");
        match err {
            AppError::Internal(msg) => assert!(msg.contains("database is being accessed")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_database_error_is_internal() {
        let err = classify_ddl_error(&create_stmt("t1"), &sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_connection_and_query_failures() {
        assert!(matches!(
            connection_failure("refused"),
            AppError::ConnectionFailure(_)
        ));
        assert!(matches!(query_failure("bad row"), AppError::QueryFailure(_)));
    }
}
