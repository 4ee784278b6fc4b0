//! Identifier sanitization and DDL construction.
//!
//! Database names cannot be bound as query parameters, so they are embedded
//! in DDL text as quoted identifiers. This module is the only place that
//! builds such text: a [`DdlStatement`] can only be made from a
//! [`SafeIdentifier`], and a [`SafeIdentifier`] can only come out of
//! [`IdentifierSanitizer::sanitize`].

use crate::errors::{AppError, AppResult};

/// Longest identifier Postgres keeps without truncating (NAMEDATALEN - 1).
pub const MAX_IDENTIFIER_BYTES: usize = 63;

/// Validates and quotes caller-supplied database names.
pub struct IdentifierSanitizer;

impl IdentifierSanitizer {
    /// Validates a raw name and returns its quoted form.
    ///
    /// # Errors
    /// Returns `AppError::InvalidArgument` if the name is empty, longer than
    /// [`MAX_IDENTIFIER_BYTES`], or contains a control character.
    pub fn sanitize(raw: &str) -> AppResult<SafeIdentifier> {
        if raw.is_empty() {
            return Err(AppError::InvalidArgument(
                "database name must not be empty".into(),
            ));
        }
        if raw.len() > MAX_IDENTIFIER_BYTES {
            return Err(AppError::InvalidArgument(format!(
                "database name exceeds {} bytes",
                MAX_IDENTIFIER_BYTES
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(AppError::InvalidArgument(
                "database name must not contain control characters".into(),
            ));
        }

        Ok(SafeIdentifier {
            raw: raw.to_string(),
            quoted: format!("\"{}\"", raw.replace('"', "\"\"")),
        })
    }
}

/// A validated database name together with its quoted SQL form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeIdentifier {
    raw: String,
    quoted: String,
}

impl SafeIdentifier {
    /// The name exactly as requested.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The double-quoted identifier, embedded quotes doubled.
    pub fn quoted(&self) -> &str {
        &self.quoted
    }
}

impl std::fmt::Display for SafeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Kind of lifecycle DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlKind {
    Create,
    Drop,
}

/// A lifecycle DDL statement targeting one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlStatement {
    kind: DdlKind,
    target: SafeIdentifier,
    sql: String,
}

impl DdlStatement {
    /// `CREATE DATABASE "<name>"`.
    pub fn create_database(target: &SafeIdentifier) -> Self {
        Self::build(DdlKind::Create, target)
    }

    /// `DROP DATABASE "<name>"`.
    pub fn drop_database(target: &SafeIdentifier) -> Self {
        Self::build(DdlKind::Drop, target)
    }

    fn build(kind: DdlKind, target: &SafeIdentifier) -> Self {
        let verb = match kind {
            DdlKind::Create => "CREATE",
            DdlKind::Drop => "DROP",
        };
        Self {
            kind,
            target: target.clone(),
            sql: format!("{} DATABASE {}", verb, target.quoted()),
        }
    }

    pub fn kind(&self) -> DdlKind {
        self.kind
    }

    pub fn target(&self) -> &SafeIdentifier {
        &self.target
    }

    pub fn as_sql(&self) -> &str {
        &self.sql
    }
}
