use clap::Parser;

use super::Cli;

#[test]
fn submit_result_for_host_parses() {
    let cli = Cli::try_parse_from([
        "wardctl",
        "--command-file",
        "/tmp/x.cmd",
        "submit-result",
        "web1",
        "--exit-code",
        "2",
        "down hard",
    ])
    .unwrap();
    assert_eq!(cli.command_file.unwrap().to_str().unwrap(), "/tmp/x.cmd");
}

#[test]
fn downtime_schedule_requires_start_and_end() {
    let err = Cli::try_parse_from(["wardctl", "downtime", "schedule", "web1"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn missing_command_file_is_rejected_at_runtime_not_parse_time() {
    // --command-file is optional at the clap layer (it can come from the
    // env var instead), so parsing succeeds even with neither set.
    let cli = Cli::try_parse_from(["wardctl", "notifications", "enable"]).unwrap();
    assert!(cli.command_file.is_none());
}
