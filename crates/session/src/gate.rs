// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-agent request channel: a true rendezvous handoff from the HTTP
//! long-poll handler to the session task.
//!
//! Tokio's `mpsc` has a minimum buffer of one, so a literal capacity-0
//! channel isn't expressible. [`RequestGate`] gets the same observable
//! behavior — `send` doesn't return until the session has taken the poll
//! out of the slot and explicitly acknowledged it — with a single-item slot
//! plus a per-deposit acknowledgment, instead.

use std::time::Duration;

use rl_core::{Command, RoleSet};
use tokio::sync::{oneshot, Mutex, Notify};

/// What one HTTP long-poll request hands the session: the roles the agent
/// declared on this poll, and a one-shot sender the session may (or may
/// not) deliver a command through.
pub struct PollData {
    pub roles: RoleSet,
    pub command_out: oneshot::Sender<Command>,
}

type Slot = Option<(PollData, oneshot::Sender<()>)>;

pub struct RequestGate {
    slot: Mutex<Slot>,
    filled: Notify,
    freed: Notify,
}

impl RequestGate {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            filled: Notify::new(),
            freed: Notify::new(),
        }
    }

    /// Deposits `data` into the slot and waits for the session to take it
    /// out and acknowledge it. If another poll is already in flight for
    /// this agent, blocks until that one is taken first.
    pub async fn send(&self, data: PollData) {
        let (ack_tx, ack_rx) = oneshot::channel();
        let mut payload = Some((data, ack_tx));
        loop {
            let freed = self.freed.notified();
            tokio::pin!(freed);
            freed.as_mut().enable();

            {
                let mut slot = self.slot.lock().await;
                if slot.is_none() {
                    *slot = payload.take();
                    drop(slot);
                    self.filled.notify_waiters();
                    break;
                }
            }
            freed.await;
        }
        // The sender side of ack_tx is dropped without sending if the
        // session is torn down mid-handoff; a closed channel resolves
        // `recv`'s await immediately either way.
        let _ = ack_rx.await;
    }

    /// Waits for a deposited [`PollData`], or `None` if nothing arrives
    /// within `timeout` (the caller interprets that as inactivity).
    pub async fn recv(&self, timeout: Duration) -> Option<PollData> {
        loop {
            let filled = self.filled.notified();
            tokio::pin!(filled);
            filled.as_mut().enable();

            {
                let mut slot = self.slot.lock().await;
                if let Some((data, ack_tx)) = slot.take() {
                    drop(slot);
                    let _ = ack_tx.send(());
                    self.freed.notify_waiters();
                    return Some(data);
                }
            }
            if tokio::time::timeout(timeout, filled).await.is_err() {
                return None;
            }
        }
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
