// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn logging_sink_accepts_points_without_panicking() {
    let sink = LoggingMetricsSink;
    let points = vec![MetricPoint {
        timestamp: 1000,
        key: "0.1.noop.cpu.load.avg".to_string(),
        tags: split_tags("0.1.noop.cpu.load.avg"),
        value: 0.5,
    }];
    sink.write(&points).await;
}

#[test]
fn split_tags_assigns_all_six_parts_in_order() {
    let tags = split_tags("0.1.noop.cpu.load.avg");
    assert_eq!(
        tags,
        vec![
            ("gid", "0".to_string()),
            ("nid", "1".to_string()),
            ("command", "noop".to_string()),
            ("domain", "cpu".to_string()),
            ("name", "load".to_string()),
            ("measurement", "avg".to_string()),
        ]
    );
}

#[test]
fn split_tags_handles_fewer_than_six_parts() {
    let tags = split_tags("0.1.noop");
    assert_eq!(
        tags,
        vec![("gid", "0".to_string()), ("nid", "1".to_string()), ("command", "noop".to_string())]
    );
}
