// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use tempfile::NamedTempFile;

use super::*;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_a_fully_populated_config() {
    let file = write_config(
        r#"
        [main]
        listen = "0.0.0.0:8966"
        [main.broker]
        host = "127.0.0.1:6379"
        password = "secret"
        [tls]
        cert = "/etc/relayd/cert.pem"
        key = "/etc/relayd/key.pem"
        client_ca = ""
        [metrics]
        host = "127.0.0.1:8086"
        db = "relayd"
        user = "relayd"
        password = "pw"
        [handlers]
        binary = "/usr/bin/python3"
        cwd = "/opt/relayd/handlers"
        [handlers.env]
        FOO = "bar"
        "#,
    );

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.main.listen.port(), 8966);
    assert_eq!(settings.main.broker.redis_url(), "redis://:secret@127.0.0.1:6379");
    assert!(settings.tls.is_enabled());
    assert!(settings.metrics.is_enabled());
    assert!(settings.handlers.is_enabled());
    assert_eq!(settings.handlers.env.get("FOO").unwrap(), "bar");
}

#[test]
fn optional_sections_default_to_disabled() {
    let file = write_config(
        r#"
        [main]
        listen = "127.0.0.1:8966"
        [main.broker]
        host = "127.0.0.1:6379"
        "#,
    );

    let settings = Settings::load(file.path()).unwrap();
    assert!(!settings.tls.is_enabled());
    assert!(!settings.metrics.is_enabled());
    assert!(!settings.handlers.is_enabled());
    assert_eq!(settings.main.broker.redis_url(), "redis://127.0.0.1:6379");
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Settings::load(std::path::Path::new("/nonexistent/relayd.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("not = [valid");
    let err = Settings::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
