/// What a classified statement produced: records for a read, a count for a write.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    /// Records mapped from the rows of a `SELECT`, in backend order. May be empty.
    Read(Vec<T>),
    /// Number of rows an `INSERT`, `UPDATE` or `DELETE` affected.
    Write(usize),
}

impl<T> QueryOutcome<T> {
    /// True for a read that matched no rows.
    ///
    /// This is a successful outcome, reported as a flag rather than an error.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, QueryOutcome::Read(records) if records.is_empty())
    }

    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            QueryOutcome::Read(_) => None,
            QueryOutcome::Write(count) => Some(*count),
        }
    }

    /// The records of a read; a write yields an empty vector.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        match self {
            QueryOutcome::Read(records) => records,
            QueryOutcome::Write(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_flag_only_for_reads() {
        assert!(QueryOutcome::<u8>::Read(Vec::new()).is_empty_result());
        assert!(!QueryOutcome::Read(vec![1u8]).is_empty_result());
        assert!(!QueryOutcome::<u8>::Write(0).is_empty_result());
    }

    #[test]
    fn writes_never_carry_records() {
        let outcome = QueryOutcome::<u8>::Write(3);
        assert_eq!(outcome.rows_affected(), Some(3));
        assert!(outcome.into_records().is_empty());
    }
}
