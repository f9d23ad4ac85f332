//! CMPP 2.0 command identifiers.
//!
//! Uses a proper enum with `TryFrom` — no panics on unknown values.
//! The transport itself treats command ids as opaque `u32`s; this enum
//! is for callers that dispatch on them.

use std::fmt;

use crate::error::CmppError;

/// Bit set on every response command id.
pub const RESPONSE_BIT: u32 = 0x8000_0000;

/// All commands defined by CMPP 2.0.
///
/// Requests occupy `0x0000_0001..=0x0000_0008`; each response is the
/// request id with [`RESPONSE_BIT`] set.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// Login to the gateway.
    Connect = 0x0000_0001,
    ConnectResp = 0x8000_0001,
    /// Graceful logout.
    Terminate = 0x0000_0002,
    TerminateResp = 0x8000_0002,
    /// Submit a short message.
    Submit = 0x0000_0004,
    SubmitResp = 0x8000_0004,
    /// Gateway-originated message or status report.
    Deliver = 0x0000_0005,
    DeliverResp = 0x8000_0005,
    /// Traffic statistics query.
    Query = 0x0000_0006,
    QueryResp = 0x8000_0006,
    /// Cancel a previously submitted message.
    Cancel = 0x0000_0007,
    CancelResp = 0x8000_0007,
    /// Link keep-alive.
    ActiveTest = 0x0000_0008,
    ActiveTestResp = 0x8000_0008,
}

impl TryFrom<u32> for CommandId {
    type Error = CmppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x0000_0001 => Ok(CommandId::Connect),
            0x8000_0001 => Ok(CommandId::ConnectResp),
            0x0000_0002 => Ok(CommandId::Terminate),
            0x8000_0002 => Ok(CommandId::TerminateResp),
            0x0000_0004 => Ok(CommandId::Submit),
            0x8000_0004 => Ok(CommandId::SubmitResp),
            0x0000_0005 => Ok(CommandId::Deliver),
            0x8000_0005 => Ok(CommandId::DeliverResp),
            0x0000_0006 => Ok(CommandId::Query),
            0x8000_0006 => Ok(CommandId::QueryResp),
            0x0000_0007 => Ok(CommandId::Cancel),
            0x8000_0007 => Ok(CommandId::CancelResp),
            0x0000_0008 => Ok(CommandId::ActiveTest),
            0x8000_0008 => Ok(CommandId::ActiveTestResp),
            _ => Err(CmppError::UnknownVariant {
                type_name: "CommandId",
                value: u64::from(value),
            }),
        }
    }
}

impl From<CommandId> for u32 {
    fn from(cmd: CommandId) -> Self {
        cmd as u32
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl CommandId {
    /// Returns `true` for `*Resp` ids.
    pub fn is_response(&self) -> bool {
        (*self as u32) & RESPONSE_BIT != 0
    }

    /// The response id paired with this request. Responses map to
    /// themselves.
    pub fn response(&self) -> CommandId {
        match self {
            CommandId::Connect => CommandId::ConnectResp,
            CommandId::Terminate => CommandId::TerminateResp,
            CommandId::Submit => CommandId::SubmitResp,
            CommandId::Deliver => CommandId::DeliverResp,
            CommandId::Query => CommandId::QueryResp,
            CommandId::Cancel => CommandId::CancelResp,
            CommandId::ActiveTest => CommandId::ActiveTestResp,
            resp => *resp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CommandId; 14] = [
        CommandId::Connect,
        CommandId::ConnectResp,
        CommandId::Terminate,
        CommandId::TerminateResp,
        CommandId::Submit,
        CommandId::SubmitResp,
        CommandId::Deliver,
        CommandId::DeliverResp,
        CommandId::Query,
        CommandId::QueryResp,
        CommandId::Cancel,
        CommandId::CancelResp,
        CommandId::ActiveTest,
        CommandId::ActiveTestResp,
    ];

    #[test]
    fn command_roundtrip() {
        for cmd in ALL {
            assert_eq!(CommandId::try_from(u32::from(cmd)).unwrap(), cmd);
        }
    }

    #[test]
    fn command_invalid() {
        assert!(CommandId::try_from(0x0000_0003).is_err());
        assert!(CommandId::try_from(0xDEAD).is_err());
    }

    #[test]
    fn responses_carry_the_high_bit() {
        for cmd in ALL {
            let resp = cmd.response();
            assert!(resp.is_response());
            assert_eq!(u32::from(resp) & !RESPONSE_BIT, u32::from(cmd) & !RESPONSE_BIT);
        }
        assert!(!CommandId::Submit.is_response());
    }
}
