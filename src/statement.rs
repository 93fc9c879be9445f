//! Decides whether a statement produces rows or an affected-row count.

use crate::error::SqlRowmapError;

/// Which execution path a statement takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `SELECT`: produces rows.
    Read,
    /// `INSERT`, `UPDATE`, `DELETE`: produces an affected-row count.
    Write,
}

const WRITE_KEYWORDS: [&str; 3] = ["INSERT", "UPDATE", "DELETE"];

/// Classify `sql` by its leading keyword.
///
/// The keyword must sit at byte 0 in upper case and end at a word boundary: leading
/// whitespace and lowercase keywords are not recognized, and neither is `DELETEZZ`.
///
/// # Errors
/// Returns `SqlRowmapError::UnsupportedStatementKind` when no keyword matches, including
/// for the empty string.
pub fn classify(sql: &str) -> Result<StatementKind, SqlRowmapError> {
    if starts_with_keyword(sql, "SELECT") {
        Ok(StatementKind::Read)
    } else if WRITE_KEYWORDS.iter().any(|kw| starts_with_keyword(sql, kw)) {
        Ok(StatementKind::Write)
    } else {
        Err(SqlRowmapError::UnsupportedStatementKind(
            "statement is not a SELECT, INSERT, UPDATE or DELETE".to_string(),
        ))
    }
}

fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.strip_prefix(keyword).is_some_and(|rest| {
        !rest
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}
