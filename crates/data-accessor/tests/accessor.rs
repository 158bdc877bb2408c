//! End-to-end behaviour of the accessor over the scripted driver.

use std::sync::Arc;
use std::time::Duration;

use data_accessor::testing::ScriptedDriver;
use data_accessor::{
    ConnectionKind, DataAccessor, ExecutionError, Parameters, ProviderId, ProviderRegistry,
    SqlValue, Value,
};

fn accessor_for(kind: ConnectionKind) -> (DataAccessor, ScriptedDriver) {
    let driver = ScriptedDriver::new(kind.provider());
    let registry = ProviderRegistry::empty().with_driver(Arc::new(driver.clone()));
    (DataAccessor::new(kind).with_registry(registry), driver)
}

#[test]
fn stored_procedure_round_trip_on_sql_server() {
    let (accessor, driver) = accessor_for(ConnectionKind::SqlServer);
    driver.push_rows(
        &["OrderId", "Status"],
        vec![vec![Value::Int(7), Value::Text("shipped".into())]],
    );

    let mut conn = accessor
        .get_connection("Server=tcp:db,1433;User Id=app;Password=secret")
        .unwrap();
    conn.open().unwrap();

    let params = Parameters::from_flat(&[Some("id"), Some("7")]);
    let mut cursor = accessor
        .execute_reader(conn.as_mut(), "dbo.usp_GetOrder", &params)
        .unwrap();

    let row = cursor.read().unwrap();
    assert_eq!(row.get_by_name("status").and_then(Value::as_str), Some("shipped"));
    assert!(cursor.read().is_none());

    let executed = driver.executed();
    let bound = executed[0].parameters();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].wire_name(), "@id");
    assert_eq!(bound[0].value(), &SqlValue::Text("7".into()));
}

#[test]
fn mysql_prefixes_parameter_names() {
    let (accessor, driver) = accessor_for(ConnectionKind::MySql);
    driver.push_affected(1);

    let mut conn = accessor.get_connection("mysql://app@localhost/shop").unwrap();
    conn.open().unwrap();

    let params = Parameters::from_flat(&[Some("id"), Some("7"), Some("note"), None]);
    let affected = accessor
        .execute_non_query(conn.as_mut(), "update_order", &params)
        .unwrap();
    assert_eq!(affected, 1);

    let executed = driver.executed();
    let names: Vec<_> = executed[0]
        .parameters()
        .iter()
        .map(|p| p.wire_name().to_owned())
        .collect();
    assert_eq!(names, ["@_id", "@_note"]);
    assert!(executed[0].parameters()[1].value().is_null());
}

#[test]
fn odd_or_short_flat_lists_bind_nothing() {
    let (accessor, driver) = accessor_for(ConnectionKind::SqlServer);
    let mut conn = accessor.get_connection("server=db").unwrap();
    conn.open().unwrap();

    for flat in [
        vec![],
        vec![Some("id")],
        vec![Some("id"), Some("7"), Some("extra")],
    ] {
        accessor
            .execute_non_query(conn.as_mut(), "usp_Touch", &Parameters::from_flat(&flat))
            .unwrap();
    }

    assert!(driver.executed().iter().all(|c| c.parameters().is_empty()));
}

#[test]
fn non_query_failure_carries_driver_message() {
    let (accessor, driver) = accessor_for(ConnectionKind::SqlServer);
    driver.push_failure("Violation of PRIMARY KEY constraint 'PK_Orders'");

    let mut conn = accessor.get_connection("server=db").unwrap();
    conn.open().unwrap();

    let err = accessor
        .execute_non_query_sql(conn.as_mut(), "INSERT INTO Orders VALUES (1)")
        .unwrap_err();
    let diagnostic = err.diagnostic();
    assert!(diagnostic.starts_with("Error: "));
    assert!(diagnostic.contains("Violation of PRIMARY KEY constraint 'PK_Orders'"));
}

#[test]
fn reader_failure_carries_driver_message() {
    let (accessor, driver) = accessor_for(ConnectionKind::MySql);
    driver.push_error(ExecutionError::timeout("command timed out after 900 seconds"));

    let mut conn = accessor.get_connection("mysql://localhost/shop").unwrap();
    conn.open().unwrap();

    let err = accessor
        .execute_reader(conn.as_mut(), "slow_report", &Parameters::new())
        .unwrap_err();
    let exec = err.as_execution().unwrap();
    assert!(exec.is_timeout());
    assert!(exec.diagnostic().starts_with("Error: command timed out"));
}

#[test]
fn connection_factory_errors_propagate() {
    let (accessor, _driver) = accessor_for(ConnectionKind::SqlServer);
    assert!(accessor.get_connection("").unwrap_err().is_connection_string());

    let accessor = DataAccessor::new(ConnectionKind::MySql).with_registry(ProviderRegistry::empty());
    assert!(
        accessor
            .get_connection("mysql://localhost/shop")
            .unwrap_err()
            .is_provider_unavailable()
    );
}

#[test]
fn cursor_outlives_the_command() {
    let (accessor, driver) = accessor_for(ConnectionKind::SqlServer);
    driver.push_rows(&["n"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]);

    let cursor = {
        let mut conn = accessor.get_connection("server=db").unwrap();
        conn.open().unwrap();
        accessor
            .execute_reader_sql(conn.as_mut(), "SELECT n FROM numbers")
            .unwrap()
    };

    let values: Vec<_> = cursor.map(|row| row.into_values()).collect();
    assert_eq!(values, [vec![Value::Int(1)], vec![Value::Int(2)]]);
}

#[cfg(feature = "sqlserver")]
#[test]
fn unrecognized_kind_uses_sql_server_driver() {
    let accessor = DataAccessor::new(ConnectionKind::from_name("unknown"));
    assert_eq!(accessor.provider(), ProviderId::SqlClient);

    for _ in 0..3 {
        let conn = accessor
            .get_connection("Server=tcp:localhost,1433;User Id=sa;Password=secret")
            .unwrap();
        assert_eq!(conn.provider(), ProviderId::SqlClient);
        assert!(!conn.is_open());
    }
}

#[test]
fn shared_accessor_across_threads() {
    let (accessor, driver) = accessor_for(ConnectionKind::SqlServer);
    let accessor = Arc::new(accessor.with_command_timeout(Duration::from_secs(10)));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let accessor = Arc::clone(&accessor);
            std::thread::spawn(move || {
                let mut conn = accessor.get_connection("server=db").unwrap();
                conn.open().unwrap();
                accessor
                    .execute_non_query(
                        conn.as_mut(),
                        "usp_Touch",
                        &Parameters::new().with("worker", i.to_string()),
                    )
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
    assert_eq!(driver.executed().len(), 4);
}
