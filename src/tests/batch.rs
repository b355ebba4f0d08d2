use super::{platform_argv, run_batches, DIVISION_SUBCOMMAND};
use crate::error::MigrateError;
use crate::test_support::RecordingRunner;
use pretty_assertions::assert_eq;
use std::ffi::OsString;
use std::path::PathBuf;

fn files(n: usize) -> Vec<PathBuf> {
    (0..n).map(|i| PathBuf::from(format!("f{i:02}.scss"))).collect()
}

fn command() -> Vec<String> {
    vec!["npx".to_string(), "sass-migrator".to_string()]
}

#[test]
fn test_forty_five_files_in_batches_of_twenty() {
    let mut runner = RecordingRunner::default();
    let sizes = run_batches(&mut runner, &command(), &files(45), 20).unwrap();

    assert_eq!(sizes, vec![20, 20, 5]);
    assert_eq!(runner.batch_sizes(3), vec![20, 20, 5]);
    assert_eq!(
        runner.calls[0][..4].to_vec(),
        vec!["npx", "sass-migrator", DIVISION_SUBCOMMAND, "f00.scss"]
    );
    assert_eq!(runner.calls[1][3], "f20.scss");
    assert_eq!(runner.calls[2].last().unwrap(), "f44.scss");
}

#[test]
fn test_no_files_means_no_invocations() {
    let mut runner = RecordingRunner::default();
    let sizes = run_batches(&mut runner, &command(), &[], 20).unwrap();

    assert!(sizes.is_empty());
    assert!(runner.calls.is_empty());
}

#[test]
fn test_failure_aborts_remaining_batches() {
    let mut runner = RecordingRunner::failing_on(1, 3);
    let err = run_batches(&mut runner, &command(), &files(10), 3).unwrap_err();

    assert!(matches!(
        err,
        MigrateError::ExternalProcessFailure { exit_code: Some(3) }
    ));
    assert_eq!(runner.calls.len(), 2);
}

#[test]
fn test_signal_termination_is_a_failure() {
    let mut runner = RecordingRunner {
        exit_codes: vec![None],
        ..RecordingRunner::default()
    };
    let err = run_batches(&mut runner, &command(), &files(1), 20).unwrap_err();

    assert!(matches!(
        err,
        MigrateError::ExternalProcessFailure { exit_code: None }
    ));
}

#[test]
fn test_zero_ceiling_is_treated_as_one() {
    let mut runner = RecordingRunner::default();
    let sizes = run_batches(&mut runner, &command(), &files(3), 0).unwrap();
    assert_eq!(sizes, vec![1, 1, 1]);
}

#[test]
fn test_platform_argv_wraps_launchers_on_windows() {
    let argv: Vec<OsString> = ["npx", "sass-migrator", "division", "a b.scss"]
        .into_iter()
        .map(OsString::from)
        .collect();
    let spawned = platform_argv(&argv);

    if cfg!(windows) {
        assert_eq!(spawned[..2].to_vec(), vec![OsString::from("cmd"), OsString::from("/C")]);
        assert_eq!(spawned[2..].to_vec(), argv);
    } else {
        assert_eq!(spawned, argv);
    }
    assert!(platform_argv(&[]).is_empty());
}
