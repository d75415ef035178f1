// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Round-trip properties for the codec, in the teacher's `oj-wire` style
//! (a `property_tests` module driven by `proptest`).

use proptest::prelude::*;
use rl_core::{AgentRole, Command, CommandArgs, CommandId};

use crate::{decode_command, encode_command};

fn arb_command() -> impl Strategy<Value = Command> {
    (
        "[a-z0-9-]{1,20}",
        0u64..1000,
        0u64..1000,
        "[a-z_]{1,10}",
        prop::collection::vec("[a-z]{1,8}", 0..4),
        any::<bool>(),
        "[a-zA-Z0-9 ]{0,40}",
    )
        .prop_map(|(id, grid, node, cmd, roles, fanout, data)| Command {
            id: CommandId::from(id),
            grid,
            node,
            cmd,
            roles: roles.into_iter().map(AgentRole::from).collect(),
            fanout,
            data,
            args: CommandArgs::default(),
        })
}

proptest! {
    #[test]
    fn any_command_survives_a_round_trip(cmd in arb_command()) {
        let encoded = encode_command(&cmd).expect("encode");
        let decoded = decode_command(&encoded).expect("decode");
        prop_assert_eq!(cmd, decoded);
    }
}
