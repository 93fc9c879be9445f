mod common;

use std::sync::Arc;

use common::{Calls, Contact, CountingBackend};
use sql_rowmap::executor::{self, ExecuteOptions};
use sql_rowmap::prelude::*;

fn text(value: &str) -> RowValues {
    RowValues::Text(value.to_string())
}

fn contact_rows() -> CountingBackend {
    CountingBackend::rows(
        vec!["name", "email"],
        vec![vec![text("A"), text("a@x.com")]],
    )
}

fn assert_balanced(calls: &Calls, expected: usize) {
    assert_eq!(calls.opens(), expected, "opens");
    assert_eq!(calls.closes(), expected, "closes");
}

#[test]
fn select_by_email_maps_one_contact() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = contact_rows();
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        let contacts: Vec<Contact> = db
            .execute(
                "SELECT * FROM contacts WHERE email = @email",
                &[Parameter::new("@email", "a@x.com")],
            )
            .await?;

        assert_eq!(
            contacts,
            vec![Contact {
                name: "A".into(),
                address: None,
                email: "a@x.com".into(),
            }]
        );
        assert_balanced(&calls, 1);
        let (sql, values) = calls.last_statement().unwrap();
        assert_eq!(sql, "SELECT * FROM contacts WHERE email = ?1");
        assert_eq!(values, vec![text("a@x.com")]);
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn unrecognized_statement_never_opens_a_connection() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::affected(1);
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        for sql in ["DELETEZZ FROM t WHERE x=1", "", "CREATE TABLE t (x INT)"] {
            let err = db.execute::<Contact>(sql, &[]).await.unwrap_err();
            assert!(
                matches!(err, SqlRowmapError::UnsupportedStatementKind(_)),
                "{sql:?}: {err}"
            );
        }
        assert_balanced(&calls, 0);
    });
    Ok(())
}

#[test]
fn keywords_choose_the_path() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::affected(2);
        let calls = Arc::clone(&backend.calls);

        for sql in [
            "INSERT INTO t VALUES (1)",
            "UPDATE t SET x = 1",
            "DELETE FROM t",
        ] {
            let outcome =
                executor::execute::<Contact, _>(&backend, sql, &[], ExecuteOptions::default())
                    .await?;
            assert_eq!(outcome, QueryOutcome::Write(2));
        }

        let outcome =
            executor::execute::<Contact, _>(&backend, "SELECT 1", &[], ExecuteOptions::default())
                .await?;
        assert!(outcome.is_empty_result());
        assert_balanced(&calls, 4);
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn zero_rows_is_an_empty_success() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let db = Database::from_backend(CountingBackend::rows(vec!["name", "email"], vec![]));
        let outcome = db
            .query::<Contact>("SELECT * FROM contacts WHERE 1 = 0", &[])
            .await?;
        assert!(outcome.is_empty_result());
        assert!(outcome.into_records().is_empty());
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn rows_keep_backend_order_and_extra_columns_are_ignored()
-> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::rows(
            vec!["id", "name", "email", "phone"],
            vec![
                vec![RowValues::Int(3), text("C"), text("c@x.com"), text("555")],
                vec![RowValues::Int(1), text("A"), RowValues::Null, text("556")],
                vec![RowValues::Int(2), text("B"), text("b@x.com"), RowValues::Null],
            ],
        );
        let db = Database::from_backend(backend);
        let contacts: Vec<Contact> = db.select("SELECT * FROM contacts").await?;

        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
        assert_eq!(contacts[1].email, "");
        assert!(contacts.iter().all(|c| c.address.is_none()));
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn parameters_bind_by_name_not_position() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::new(DatabaseType::Postgres, common::Script::Affected(1));
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        db.execute_write(
            "UPDATE t SET a = @a WHERE b = @b",
            &[Parameter::new("@b", 2), Parameter::new("@a", 1)],
        )
        .await?;

        let (sql, values) = calls.last_statement().unwrap();
        assert_eq!(sql, "UPDATE t SET a = $1 WHERE b = $2");
        assert_eq!(values, vec![RowValues::Int(1), RowValues::Int(2)]);
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn native_failure_still_closes() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::failing("syntax error near FROM");
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        let err = db
            .execute::<Contact>("SELECT FROM", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlRowmapError::QueryExecutionError(msg) if msg.contains("syntax")));

        let err = db
            .execute::<Contact>("DELETE FROM t", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlRowmapError::QueryExecutionError(_)));

        assert_balanced(&calls, 2);
    });
    Ok(())
}

#[test]
fn operation_error_wins_over_close_error() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let failing = CountingBackend::failing("boom").with_failing_close();
        let calls = Arc::clone(&failing.calls);
        let db = Database::from_backend(failing);
        let err = db.select::<Contact>("SELECT 1").await.unwrap_err();
        assert!(matches!(err, SqlRowmapError::QueryExecutionError(_)));
        assert_balanced(&calls, 1);

        let ok_but_close_fails = CountingBackend::affected(1).with_failing_close();
        let db = Database::from_backend(ok_but_close_fails);
        let err = db.execute_write("DELETE FROM t", &[]).await.unwrap_err();
        assert!(matches!(err, SqlRowmapError::ConnectionError(_)));
    });
    Ok(())
}

#[test]
fn mapping_failure_closes_and_reports_the_field() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = CountingBackend::rows(vec!["name"], vec![vec![RowValues::Int(7)]]);
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        let err = db.select::<Contact>("SELECT name FROM t").await.unwrap_err();
        assert!(
            matches!(err, SqlRowmapError::FieldMappingError { ref field, .. } if field == "name")
        );
        assert_balanced(&calls, 1);
    });
    Ok(())
}

#[test]
fn missing_parameter_fails_before_opening() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = contact_rows();
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);

        let err = db
            .execute::<Contact>("SELECT * FROM contacts WHERE email = @email", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlRowmapError::ParameterError(_)));
        assert_balanced(&calls, 0);

        let err = db
            .select::<Contact>("SELECT * FROM contacts WHERE email = @email")
            .await
            .unwrap_err();
        assert!(matches!(err, SqlRowmapError::ParameterError(msg) if msg.contains("@email")));
        assert_balanced(&calls, 0);
    });
    Ok(())
}

#[test]
fn zero_affected_rows_policy() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let lenient = Database::from_backend(CountingBackend::affected(0));
        assert_eq!(lenient.execute_write("DELETE FROM t", &[]).await?, 0);

        let backend = CountingBackend::affected(0);
        let calls = Arc::clone(&backend.calls);
        let strict = Database::from_backend(backend)
            .with_options(ExecuteOptions::default().require_affected_rows(true));
        let err = strict.execute_write("DELETE FROM t", &[]).await.unwrap_err();
        assert!(matches!(err, SqlRowmapError::NoRowsAffected(_)));
        assert_balanced(&calls, 1);
        Ok::<(), SqlRowmapError>(())
    })?;
    Ok(())
}

#[test]
fn execute_write_rejects_select() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let backend = contact_rows();
        let calls = Arc::clone(&backend.calls);
        let db = Database::from_backend(backend);
        let err = db.execute_write("SELECT * FROM t", &[]).await.unwrap_err();
        assert!(matches!(err, SqlRowmapError::UnsupportedStatementKind(_)));
        assert_balanced(&calls, 0);
    });
    Ok(())
}
