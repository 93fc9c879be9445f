#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sql_rowmap::prelude::*;

/// What the fixture connection answers to every statement.
#[derive(Debug, Clone)]
pub enum Script {
    Rows {
        columns: Vec<&'static str>,
        rows: Vec<Vec<RowValues>>,
    },
    Affected(usize),
    Fail(&'static str),
}

#[derive(Debug, Default)]
pub struct Calls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub statements: Mutex<Vec<(String, Vec<RowValues>)>>,
}

impl Calls {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn last_statement(&self) -> Option<(String, Vec<RowValues>)> {
        self.statements.lock().unwrap().last().cloned()
    }
}

/// Test double that counts opens and closes and records what it was asked to run.
pub struct CountingBackend {
    kind: DatabaseType,
    script: Script,
    fail_close: bool,
    pub calls: Arc<Calls>,
}

impl CountingBackend {
    pub fn new(kind: DatabaseType, script: Script) -> Self {
        Self {
            kind,
            script,
            fail_close: false,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn rows(columns: Vec<&'static str>, rows: Vec<Vec<RowValues>>) -> Self {
        Self::new(DatabaseType::Sqlite, Script::Rows { columns, rows })
    }

    pub fn affected(count: usize) -> Self {
        Self::new(DatabaseType::Sqlite, Script::Affected(count))
    }

    pub fn failing(message: &'static str) -> Self {
        Self::new(DatabaseType::Sqlite, Script::Fail(message))
    }

    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

#[async_trait]
impl Backend for CountingBackend {
    fn kind(&self) -> DatabaseType {
        self.kind
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingConnection {
            script: self.script.clone(),
            fail_close: self.fail_close,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct CountingConnection {
    script: Script,
    fail_close: bool,
    calls: Arc<Calls>,
}

impl CountingConnection {
    fn record(&self, sql: &str, params: &[RowValues]) {
        self.calls
            .statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }
}

#[async_trait]
impl Connection for CountingConnection {
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError> {
        self.record(sql, params);
        match &self.script {
            Script::Rows { columns, rows } => {
                let mut result_set =
                    ResultSet::new(columns.iter().map(|c| (*c).to_string()).collect());
                for row in rows {
                    result_set.add_row_values(row.clone());
                }
                Ok(result_set)
            }
            Script::Affected(_) => Ok(ResultSet::default()),
            Script::Fail(message) => Err(SqlRowmapError::QueryExecutionError(
                (*message).to_string(),
            )),
        }
    }

    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError> {
        self.record(sql, params);
        match &self.script {
            Script::Affected(count) => Ok(*count),
            Script::Rows { .. } => Ok(0),
            Script::Fail(message) => Err(SqlRowmapError::QueryExecutionError(
                (*message).to_string(),
            )),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(SqlRowmapError::ConnectionError("close failed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub address: Option<String>,
    pub email: String,
}

sql_rowmap::impl_record!(Contact {
    name,
    address,
    email
});
