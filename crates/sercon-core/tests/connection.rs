//! Integration tests: single-attempt `Connection` lifecycle against a scripted driver.

mod common;

use std::time::Duration;

use common::scripted_driver::{busy, ScriptedDriver};
use sercon_core::{
    Connection, ConnectionConfig, ConnectionError, ConnectionState, DriverError,
    DriverErrorKind, ValidationError,
};

fn cfg() -> ConnectionConfig {
    ConnectionConfig::new("X1", 9600)
}

#[test]
fn new_connection_is_disconnected_without_config() {
    let conn = Connection::new(ScriptedDriver::new());
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(conn.config().is_none());
    assert!(conn.last_error().is_none());
    assert!(!conn.is_open());
}

#[test]
fn open_success_connects_and_stores_config() {
    let mut conn = Connection::new(ScriptedDriver::new());
    conn.open(&cfg()).unwrap();
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.config(), Some(&cfg()));
    assert_eq!(conn.read_timeout(), Duration::from_secs(1));
}

#[test]
fn open_failure_is_errored_with_last_error() {
    let driver = ScriptedDriver::new().fail_opens(1, DriverErrorKind::Busy, "device busy");
    let mut conn = Connection::new(driver);
    let err = conn.open(&cfg()).unwrap_err();
    assert_eq!(err, ConnectionError::Open(busy()));
    assert_eq!(conn.state(), ConnectionState::Errored);
    assert_eq!(conn.last_error(), Some(&busy()));
    assert!(conn.config().is_none());
}

#[test]
fn open_invalid_config_changes_nothing() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    let mut conn = Connection::new(driver);
    let err = conn.open(&cfg().with_data_bits(4)).unwrap_err();
    assert_eq!(err, ConnectionError::Invalid(ValidationError::InvalidDataBits(4)));
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert_eq!(script.borrow().open_calls, 0);
}

#[test]
fn open_when_open_fails_without_disturbing_handle() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    let other = ConnectionConfig::new("X2", 115200);
    assert_eq!(conn.open(&other), Err(ConnectionError::AlreadyOpen));
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.config(), Some(&cfg()));
    assert_eq!(script.borrow().open_calls, 1);
    assert_eq!(script.borrow().open_handles, 1);
}

#[test]
fn close_returns_to_disconnected_and_keeps_config() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    conn.close().unwrap();
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(!conn.is_open());
    assert_eq!(conn.config(), Some(&cfg()));
    assert_eq!(script.borrow().open_handles, 0);
}

#[test]
fn close_when_not_open_fails() {
    let mut conn = Connection::new(ScriptedDriver::new());
    assert_eq!(conn.close(), Err(ConnectionError::NotOpen));
    assert_eq!(conn.state(), ConnectionState::Disconnected);
}

#[test]
fn failed_close_is_errored_and_releases_handle() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    let e = DriverError::new(DriverErrorKind::Unknown, "flush failed");
    script.borrow_mut().close_error = Some(e.clone());

    assert_eq!(conn.close(), Err(ConnectionError::Close(e.clone())));
    assert_eq!(conn.state(), ConnectionState::Errored);
    assert_eq!(conn.last_error(), Some(&e));
    assert!(!conn.is_open());
    assert_eq!(script.borrow().open_handles, 0);
    // Handle is gone: a second close has nothing to release.
    assert_eq!(conn.close(), Err(ConnectionError::NotOpen));
}

#[test]
fn drop_releases_open_handle() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    {
        let mut conn = Connection::new(driver);
        conn.open(&cfg()).unwrap();
        assert_eq!(script.borrow().open_handles, 1);
    }
    assert_eq!(script.borrow().open_handles, 0);
    assert_eq!(script.borrow().close_calls, 1);
}

#[test]
fn io_requires_open_connection() {
    let mut conn = Connection::new(ScriptedDriver::new());
    let mut buf = [0u8; 4];
    assert_eq!(conn.read(&mut buf), Err(ConnectionError::NotOpen));
    assert_eq!(conn.write(b"hi"), Err(ConnectionError::NotOpen));
    assert_eq!(
        conn.set_read_timeout(Duration::from_millis(5)),
        Err(ConnectionError::NotOpen)
    );
}

#[test]
fn write_all_loops_over_partial_writes() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    script.borrow_mut().write_chunk = Some(2);
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    conn.write_all(b"hello").unwrap();
    assert_eq!(script.borrow().written, b"hello");
}

#[test]
fn write_all_rejects_zero_byte_writes() {
    let driver = ScriptedDriver::new();
    let script = driver.script();
    script.borrow_mut().write_chunk = Some(0);
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    assert!(matches!(conn.write_all(b"x"), Err(ConnectionError::Io(_))));
}

#[test]
fn read_returns_driver_bytes() {
    let driver = ScriptedDriver::new().respond(&[1, 2, 3]);
    let mut conn = Connection::new(driver);
    conn.open(&cfg()).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(conn.read(&mut buf), Ok(3));
    assert_eq!(&buf[..3], &[1, 2, 3]);
}

#[test]
fn set_read_timeout_tracks_value() {
    let mut conn = Connection::new(ScriptedDriver::new());
    conn.open(&cfg()).unwrap();
    conn.set_read_timeout(Duration::from_millis(250)).unwrap();
    assert_eq!(conn.read_timeout(), Duration::from_millis(250));
}

#[test]
fn list_endpoints_passes_through() {
    let driver = ScriptedDriver::new();
    driver.script().borrow_mut().endpoints = vec!["X1".into(), "X2".into()];
    let conn = Connection::new(driver);
    assert_eq!(conn.list_endpoints().unwrap(), vec!["X1", "X2"]);
}
