//! Resumability tests for `Submitter::submit_and_wait`.
//!
//! Each test drives a submitter against a scratch history file with scripted
//! broadcasters, then reopens the file the way a re-run deployment would.

use std::cell::Cell;

use anyhow::anyhow;
use submitter::test_support::{
    Script, ScriptedBroadcaster, ScriptedPending, TempHistory, receipt,
};
use submitter::{Broadcaster, HistoryError, SubmitError, Submitter};

/// Deploy scenario: first call broadcasts and persists, second call with a
/// different action returns the recorded receipt without invoking it.
#[test]
fn second_submit_with_same_key_returns_recorded_receipt() {
    submitter::logging::init();
    let temp = TempHistory::new().expect("temp history");
    let mut submitter = Submitter::open(temp.path(), false);
    assert!(submitter.history().is_empty());

    let f = ScriptedBroadcaster::confirmed(receipt("0xa1", Some("0x123")));
    let f_log = f.log();
    let first = submitter.submit_and_wait("Deploy A", f).expect("first submit");
    assert_eq!(f_log.broadcasts(), 1);
    assert_eq!(first.created_address(), Some("0x123"));

    let persisted = Submitter::load_receipts(temp.path()).expect("load receipts");
    assert_eq!(
        persisted.get("Deploy A").and_then(|r| r.created_address()),
        Some("0x123")
    );

    let g = ScriptedBroadcaster::confirmed(receipt("0xb2", Some("0x456")));
    let g_log = g.log();
    let second = submitter.submit_and_wait("Deploy A", g).expect("second submit");
    assert_eq!(g_log.broadcasts(), 0);
    assert!(g_log.waits().is_empty());
    assert_eq!(second, first);
}

#[test]
fn rerun_skips_steps_recorded_by_previous_run() {
    let temp = TempHistory::new().expect("temp history");

    {
        let mut first_run = Submitter::open(temp.path(), false);
        first_run
            .submit_and_wait(
                "Deploy factory",
                ScriptedBroadcaster::confirmed(receipt("0xa1", Some("0xfac"))),
            )
            .expect("deploy factory");
        let err = first_run
            .submit_and_wait("Set fee setter", ScriptedBroadcaster::failing("nonce too low"))
            .expect_err("second step fails");
        assert_eq!(err.to_string(), "nonce too low");
    }

    let mut second_run = Submitter::open(temp.path(), false);
    let factory = ScriptedBroadcaster::confirmed(receipt("0xdead", None));
    let factory_log = factory.log();
    let fee = ScriptedBroadcaster::confirmed(receipt("0xa2", None));
    let fee_log = fee.log();

    let deployed = second_run
        .submit_and_wait("Deploy factory", factory)
        .expect("cached factory");
    second_run
        .submit_and_wait("Set fee setter", fee)
        .expect("fee setter");

    assert_eq!(deployed.created_address(), Some("0xfac"));
    assert_eq!(factory_log.broadcasts(), 0);
    assert_eq!(fee_log.broadcasts(), 1);
    assert_eq!(
        second_run.history().keys().collect::<Vec<_>>(),
        vec!["Deploy factory", "Set fee setter"]
    );
}

#[test]
fn open_against_missing_file_starts_empty() {
    let temp = TempHistory::new().expect("temp history");
    let submitter = Submitter::open(temp.path(), false);
    assert!(submitter.history().is_empty());
    assert!(!temp.path().exists());
}

#[test]
fn load_receipts_requires_existing_history() {
    let temp = TempHistory::new().expect("temp history");
    let err = Submitter::load_receipts(temp.path()).expect_err("missing history");
    assert!(matches!(err, HistoryError::NotFound { .. }));
}

#[test]
fn discard_existing_ignores_valid_history() {
    let temp = TempHistory::new().expect("temp history");
    {
        let mut submitter = Submitter::open(temp.path(), false);
        submitter
            .submit_and_wait("Deploy A", ScriptedBroadcaster::confirmed(receipt("0xa1", None)))
            .expect("submit");
    }

    let mut fresh = Submitter::open(temp.path(), true);
    assert!(fresh.history().is_empty());
    assert!(fresh.receipt("Deploy A").is_none());

    let again = ScriptedBroadcaster::confirmed(receipt("0xa2", None));
    let log = again.log();
    let replaced = fresh.submit_and_wait("Deploy A", again).expect("resubmit");
    assert_eq!(log.broadcasts(), 1);
    assert_eq!(replaced.transaction_hash, "0xa2");

    let on_disk = Submitter::load_receipts(temp.path()).expect("load receipts");
    assert_eq!(on_disk.len(), 1);
    assert_eq!(
        on_disk.get("Deploy A").expect("present").transaction_hash,
        "0xa2"
    );
}

#[test]
fn broadcast_failure_leaves_key_absent_and_next_call_retries() {
    let temp = TempHistory::new().expect("temp history");
    let mut submitter = Submitter::open(temp.path(), false);

    let err = submitter
        .submit_and_wait("Deploy A", ScriptedBroadcaster::failing("insufficient funds"))
        .expect_err("broadcast fails");
    match err {
        SubmitError::Action(source) => assert_eq!(source.to_string(), "insufficient funds"),
        other => panic!("expected action error, got {other:?}"),
    }
    assert!(submitter.receipt("Deploy A").is_none());
    assert!(!temp.path().exists());

    let retry = ScriptedBroadcaster::confirmed(receipt("0xa1", None));
    let log = retry.log();
    submitter.submit_and_wait("Deploy A", retry).expect("retry");
    assert_eq!(log.broadcasts(), 1);
    assert!(submitter.receipt("Deploy A").is_some());
}

#[test]
fn wait_failure_is_propagated_without_recording() {
    let temp = TempHistory::new().expect("temp history");
    let mut submitter = Submitter::open(temp.path(), false);

    let broadcaster = ScriptedBroadcaster::new("0xa1", Script::WaitFails("rpc timeout".into()));
    let log = broadcaster.log();
    let err = submitter
        .submit_and_wait("Deploy A", broadcaster)
        .expect_err("wait fails");

    assert!(matches!(err, SubmitError::Action(_)));
    assert_eq!(log.waits(), vec![1]);
    assert!(submitter.history().is_empty());
}

#[test]
fn dropped_confirmation_fails_and_leaves_history_unchanged() {
    let temp = TempHistory::new().expect("temp history");
    let mut submitter = Submitter::open(temp.path(), false);
    submitter
        .submit_and_wait("Deploy A", ScriptedBroadcaster::confirmed(receipt("0xa1", None)))
        .expect("first step");
    let before = temp.read_raw().expect("read history");

    let err = submitter
        .submit_and_wait("Deploy B", ScriptedBroadcaster::dropped("0xb1"))
        .expect_err("dropped");

    match err {
        SubmitError::Dropped { key, reference } => {
            assert_eq!(key, "Deploy B");
            assert_eq!(reference, "0xb1");
        }
        other => panic!("expected dropped error, got {other:?}"),
    }
    assert!(submitter.receipt("Deploy B").is_none());
    assert_eq!(submitter.history().len(), 1);
    assert_eq!(temp.read_raw().expect("read history"), before);
}

#[test]
fn closures_act_as_broadcasters() {
    let temp = TempHistory::new().expect("temp history");
    let mut submitter = Submitter::open(temp.path(), false);
    let calls = Cell::new(0);

    let recorded = submitter
        .submit_and_wait("Deploy A", || {
            calls.set(calls.get() + 1);
            ScriptedBroadcaster::confirmed(receipt("0xa1", None)).broadcast()
        })
        .expect("submit");
    assert_eq!(calls.get(), 1);
    assert_eq!(recorded.transaction_hash, "0xa1");

    submitter
        .submit_and_wait("Deploy A", || {
            calls.set(calls.get() + 1);
            Err::<ScriptedPending, _>(anyhow!("must not run"))
        })
        .expect("cached");
    assert_eq!(calls.get(), 1);
}
