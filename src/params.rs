use crate::types::RowValues;

/// A name/value pair substituted into an `@name` placeholder.
///
/// The name may carry its `@` sigil or not; `"@email"` and `"email"` bind the same
/// placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: RowValues,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A parameter bound to SQL `NULL`.
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: RowValues::Null,
        }
    }
}

impl<N: Into<String>, V: Into<RowValues>> From<(N, V)> for Parameter {
    fn from((name, value): (N, V)) -> Self {
        Parameter::new(name, value)
    }
}

pub(crate) fn normalize_name(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}
