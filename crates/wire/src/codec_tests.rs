// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rl_core::test_support::direct_command;

#[test]
fn decode_rejects_malformed_json_with_format_error() {
    let err = decode_command("{not json").unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn decode_rejects_missing_required_fields() {
    // `cmd` is required; this payload only has `id`.
    let err = decode_command(r#"{"id":"c1"}"#).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn command_encode_preserves_internal_target_and_args() {
    // command roundtrips in general are covered by the property tests below;
    // this one pins down the internal-dispatch shape specifically.
    let cmd = rl_core::test_support::internal_command("c1", "scheduler_add");
    let encoded = encode_command(&cmd).expect("encode");
    let decoded = decode_command(&encoded).expect("decode");
    assert!(decoded.is_internal());
    assert_eq!(decoded.args.name, "scheduler_add");
}

#[test]
fn result_roundtrips_through_encode_decode() {
    let result = rl_core::CommandResult::running(rl_core::CommandId::from("c1"), 0, 42, 100);
    let encoded = encode_result(&result).expect("encode");
    let decoded = decode_result(&encoded).expect("decode");
    assert_eq!(result, decoded);
}

#[test]
fn schedule_roundtrips_through_encode_decode() {
    let job = rl_core::ScheduledJob {
        id: "job-1".to_string(),
        cron_expr: "*/5 * * * *".to_string(),
        cmd_template: rl_core::test_support::direct_command("c1", 0, 0),
    };
    let encoded = encode_scheduled_job(&job).expect("encode");
    let decoded = decode_scheduled_job(&encoded).expect("decode");
    assert_eq!(job, decoded);
}
