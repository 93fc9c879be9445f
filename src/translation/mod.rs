//! Named-parameter binding.
//!
//! Callers write placeholders as `@name` and supply [`Parameter`]s by name. Each backend
//! wants positional placeholders in its own syntax, so the SQL text is rewritten once per
//! call and the values are laid out in the order the rewritten text expects.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    try_start_dollar_quote,
};
use scanner::{State, is_identifier_start, scan_identifier};

use crate::error::SqlRowmapError;
use crate::params::{Parameter, normalize_name};
use crate::types::RowValues;

/// Target placeholder style for binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style numbered placeholders like `$1`.
    Postgres,
    /// SQL Server-style numbered placeholders like `@P1`.
    Mssql,
    /// MySQL-style anonymous placeholders `?`, one value per occurrence.
    Mysql,
    /// SQLite-style numbered placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    fn is_numbered(self) -> bool {
        !matches!(self, PlaceholderStyle::Mysql)
    }

    fn render(self, position: usize, buf: &mut String) {
        match self {
            PlaceholderStyle::Postgres => buf.push('$'),
            PlaceholderStyle::Mssql => buf.push_str("@P"),
            PlaceholderStyle::Mysql => {
                buf.push('?');
                return;
            }
            PlaceholderStyle::Sqlite => buf.push('?'),
        }
        buf.push_str(&position.to_string());
    }
}

/// SQL text rewritten into a backend's placeholder style, with its positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement<'a> {
    pub sql: Cow<'a, str>,
    pub values: Vec<RowValues>,
}

/// Rewrite `@name` placeholders into `style` and order the parameter values to match.
///
/// Placeholders inside string literals, quoted identifiers, comments, and (for Postgres)
/// dollar-quoted blocks are left alone, as are `@@name` system variables. Every other
/// `@name` must have a value, even when `params` is empty. SQL that needs no rewriting is
/// returned borrowed.
///
/// ```rust
/// use sql_rowmap::prelude::*;
///
/// let params = [Parameter::new("@b", 2), Parameter::new("@a", 1)];
/// let bound = bind_named_parameters(
///     "SELECT * FROM t WHERE a = @a AND b = @b",
///     &params,
///     PlaceholderStyle::Postgres,
/// )?;
/// assert_eq!(bound.sql, "SELECT * FROM t WHERE a = $1 AND b = $2");
/// assert_eq!(bound.values, vec![RowValues::Int(1), RowValues::Int(2)]);
/// # Ok::<(), SqlRowmapError>(())
/// ```
///
/// # Errors
/// Returns `SqlRowmapError::ParameterError` when two parameters share a name or when a
/// placeholder names a parameter that was not supplied.
pub fn bind_named_parameters<'a>(
    sql: &'a str,
    params: &[Parameter],
    style: PlaceholderStyle,
) -> Result<BoundStatement<'a>, SqlRowmapError> {
    let mut by_name: HashMap<&str, &RowValues> = HashMap::with_capacity(params.len());
    for param in params {
        let name = normalize_name(&param.name);
        if by_name.insert(name, &param.value).is_some() {
            return Err(SqlRowmapError::ParameterError(format!(
                "parameter @{name} supplied more than once"
            )));
        }
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 2);
    let mut copied_until = 0;
    let mut positions: Vec<&str> = Vec::new();
    let mut values: Vec<RowValues> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' if style == PlaceholderStyle::Mysql => state = State::BacktickQuoted,
                b'[' if style == PlaceholderStyle::Mssql => state = State::Bracketed,
                _ if is_line_comment_start(bytes, idx, style) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' if style == PlaceholderStyle::Postgres => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b'@' if bytes.get(idx + 1) == Some(&b'@') => {
                    // @@ROWCOUNT and friends
                    idx += 1;
                    while bytes.get(idx + 1).copied().is_some_and(is_identifier_start)
                        || bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
                    {
                        idx += 1;
                    }
                }
                b'@' => {
                    if let Some((name_end, name)) = scan_identifier(bytes, idx + 1) {
                        let Some(value) = by_name.get(name) else {
                            return Err(SqlRowmapError::ParameterError(format!(
                                "no value supplied for placeholder @{name}"
                            )));
                        };
                        used.insert(name);

                        out.push_str(&sql[copied_until..idx]);
                        if style.is_numbered() {
                            let position = match positions.iter().position(|p| *p == name) {
                                Some(existing) => existing + 1,
                                None => {
                                    positions.push(name);
                                    values.push((*value).clone());
                                    positions.len()
                                }
                            };
                            style.render(position, &mut out);
                        } else {
                            values.push((*value).clone());
                            style.render(values.len(), &mut out);
                        }
                        copied_until = name_end;
                        idx = name_end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\\' && style == PlaceholderStyle::Mysql {
                    idx += 1; // backslash escape
                } else if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::BacktickQuoted => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::Bracketed => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    idx += 1;
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len + 1;
                }
            }
        }
        idx += 1;
    }

    for param in params {
        let name = normalize_name(&param.name);
        if !used.contains(name) {
            tracing::debug!(parameter = name, "parameter not referenced by statement");
        }
    }

    if copied_until == 0 {
        return Ok(BoundStatement {
            sql: Cow::Borrowed(sql),
            values,
        });
    }
    out.push_str(&sql[copied_until..]);
    Ok(BoundStatement {
        sql: Cow::Owned(out),
        values,
    })
}
