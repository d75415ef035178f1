// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rl-wire: parse/serialize [`rl_core::Command`], [`rl_core::CommandResult`]
//! and [`rl_core::ScheduledJob`] to and from the JSON payloads stored in the
//! broker and posted over HTTP.
//!
//! A [`WireError::Format`] is distinguishable from every other error this
//! crate's callers encounter, so the dispatcher can drop a single malformed
//! payload and keep its loop running (spec §7) instead of treating a bad
//! command the same way it treats a broker outage.

mod codec;

pub use codec::{
    decode_command, decode_result, decode_scheduled_job, encode_command, encode_result,
    encode_scheduled_job, WireError,
};

#[cfg(test)]
mod property_tests;
