//! Caller-facing error codes and their descriptions.
//!
//! These classify failures at the level of a protocol exchange ("the
//! submit response could not be read") and sit above the transport's
//! [`TransportError`](crate::TransportError) kinds.

use std::fmt;

use crate::error::CmppError;

/// Description returned for codes outside the catalog.
pub const UNKNOWN_ERROR: &str = "unknown error";

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SocketCreate = 1,
    SocketConnect = 2,
    SocketSetup = 3,
    CredentialTooLong = 4,
    ConnectSend = 5,
    ConnectRecv = 6,
    ActiveTestSend = 7,
    ActiveTestRecv = 8,
    TerminateSend = 9,
    TerminateRecv = 10,
    SubmitSend = 11,
    SubmitRecv = 12,
    DeliverRespSend = 13,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::SocketCreate,
        ErrorCode::SocketConnect,
        ErrorCode::SocketSetup,
        ErrorCode::CredentialTooLong,
        ErrorCode::ConnectSend,
        ErrorCode::ConnectRecv,
        ErrorCode::ActiveTestSend,
        ErrorCode::ActiveTestRecv,
        ErrorCode::TerminateSend,
        ErrorCode::TerminateRecv,
        ErrorCode::SubmitSend,
        ErrorCode::SubmitRecv,
        ErrorCode::DeliverRespSend,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::SocketCreate => "can't create socket",
            ErrorCode::SocketConnect => "can't connect to remote server",
            ErrorCode::SocketSetup => "can't configure socket options",
            ErrorCode::CredentialTooLong => "user or password maximum length exceeded",
            ErrorCode::ConnectSend => "send cmpp_connect packet failed",
            ErrorCode::ConnectRecv => "receive cmpp_connect_resp packet error",
            ErrorCode::ActiveTestSend => "send cmpp_active_test packet failed",
            ErrorCode::ActiveTestRecv => "receive cmpp_active_test_resp packet error",
            ErrorCode::TerminateSend => "send cmpp_terminate packet failed",
            ErrorCode::TerminateRecv => "receive cmpp_terminate_resp packet error",
            ErrorCode::SubmitSend => "send cmpp_submit packet failed",
            ErrorCode::SubmitRecv => "receive cmpp_submit_resp packet error",
            ErrorCode::DeliverRespSend => "send cmpp_deliver_resp packet failed",
        }
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = CmppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| *code as u32 == value)
            .ok_or(CmppError::UnknownVariant {
                type_name: "ErrorCode",
                value: u64::from(value),
            })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Describe any 32-bit error code. Never fails.
pub fn describe(code: u32) -> &'static str {
    ErrorCode::try_from(code).map_or(UNKNOWN_ERROR, |c| c.description())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_its_own_text() {
        let mut seen = std::collections::HashSet::new();
        for code in ErrorCode::ALL {
            let text = describe(code as u32);
            assert_ne!(text, UNKNOWN_ERROR);
            assert!(seen.insert(text), "duplicate description {text:?}");
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [0, 14, 0xFFFF, u32::MAX] {
            assert_eq!(describe(code), "unknown error");
        }
    }

    #[test]
    fn specific_descriptions() {
        assert_eq!(describe(1), "can't create socket");
        assert_eq!(
            ErrorCode::SubmitRecv.to_string(),
            "receive cmpp_submit_resp packet error"
        );
    }

    #[test]
    fn code_roundtrip() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code as u32).unwrap(), code);
        }
        assert!(ErrorCode::try_from(0).is_err());
    }
}
