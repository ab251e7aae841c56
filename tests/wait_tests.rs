use std::cell::Cell;
use std::time::Duration;

use console_nav::error::Error;
use console_nav::wait::{StatusOutcome, Wait};

fn quick(timeout_ms: u64) -> Wait {
    Wait::new(Duration::from_millis(timeout_ms)).delay(Duration::from_millis(1))
}

#[test]
fn until_returns_as_soon_as_condition_holds() {
    let calls = Cell::new(0);
    let result = quick(1000).until(|| {
        calls.set(calls.get() + 1);
        calls.get() == 3
    });
    assert!(result.is_ok());
    assert_eq!(calls.get(), 3);
}

#[test]
fn until_evaluates_at_least_once_with_zero_timeout() {
    let calls = Cell::new(0);
    let result = quick(0).until(|| {
        calls.set(calls.get() + 1);
        true
    });
    assert!(result.is_ok());
    assert_eq!(calls.get(), 1);
}

#[test]
fn until_times_out_with_message() {
    let err = quick(20).message("never ready").until(|| false).unwrap_err();
    assert_eq!(err.message, "never ready");
    assert!(err.waited >= Duration::from_millis(20));
    assert!(err.last_status.is_none());
    assert!(err.to_string().starts_with("never ready (waited"));
}

#[test]
fn until_some_yields_the_value() {
    let calls = Cell::new(0);
    let (value, _) = quick(1000)
        .until_some(|| {
            calls.set(calls.get() + 1);
            (calls.get() >= 2).then(|| "window-2".to_string())
        })
        .unwrap();
    assert_eq!(value, "window-2");
}

#[test]
fn status_poll_reaches_success() {
    let statuses = std::cell::RefCell::new(vec!["New", "New", "Completed"].into_iter());
    let outcome = quick(1000)
        .until_status(&["Completed"], &["Failed"], || {
            Ok(statuses.borrow_mut().next().unwrap_or("New").to_string())
        })
        .unwrap();
    assert_eq!(outcome, StatusOutcome::Succeeded("Completed".into()));
    assert!(outcome.is_success());
}

#[test]
fn status_poll_fails_fast_on_failure_value() {
    let calls = Cell::new(0);
    let outcome = Wait::secs(600)
        .delay(Duration::from_millis(1))
        .until_status(&["Completed"], &["Failed"], || {
            calls.set(calls.get() + 1);
            Ok(if calls.get() < 2 { "New" } else { "Failed" }.to_string())
        })
        .unwrap();
    assert_eq!(outcome, StatusOutcome::Failed("Failed".into()));
    assert_eq!(outcome.status(), "Failed");
    assert_eq!(calls.get(), 2);
}

#[test]
fn status_poll_timeout_keeps_last_status() {
    let err = quick(10)
        .until_status(&["Completed"], &["Failed"], || Ok("Processing".to_string()))
        .unwrap_err();
    match err {
        Error::Timeout(timeout) => {
            assert_eq!(timeout.last_status.as_deref(), Some("Processing"));
            assert!(timeout.to_string().contains("last status 'Processing'"));
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }
}

#[test]
fn status_poll_propagates_observer_errors() {
    let err = quick(1000)
        .until_status(&["Completed"], &[], || Err(Error::Unexpected("row vanished".into())))
        .unwrap_err();
    assert!(matches!(err, Error::Unexpected(ref m) if m == "row vanished"));
}
