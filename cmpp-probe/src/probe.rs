//! Probe operations behind each subcommand.
//!
//! Every operation returns its report as a string so `main` only has to
//! print it. Link failures carry the catalog [`ErrorCode`] of the step
//! that failed.

use std::time::{Duration, Instant};

use cmpp_core::auth::to_hex;
use cmpp_core::text::Converter;
use cmpp_core::{
    CmppError, CommandId, Connection, ErrorCode, authenticator_source, describe, digest,
    ucs2_length,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ProbeConfig;

/// Frames from the gateway tolerated while waiting for our response.
const MAX_UNRELATED_FRAMES: usize = 16;

/// A failed probe operation.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A step with a catalog entry failed.
    #[error("{code}: {source}")]
    Step {
        code: ErrorCode,
        #[source]
        source: CmppError,
    },

    /// Any other failure.
    #[error(transparent)]
    Core(#[from] CmppError),
}

impl ProbeError {
    fn step(code: ErrorCode, source: impl Into<CmppError>) -> Self {
        ProbeError::Step {
            code,
            source: source.into(),
        }
    }

    /// Catalog code of the failed step, if it has one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ProbeError::Step { code, .. } => Some(*code),
            ProbeError::Core(_) => None,
        }
    }
}

/// Classify a failure to open the gateway link.
fn connect_error(e: CmppError) -> ProbeError {
    match e {
        CmppError::SocketSetup(_) => ProbeError::step(ErrorCode::SocketSetup, e),
        e => ProbeError::step(ErrorCode::SocketConnect, e),
    }
}

/// Hex MD5 of `text`.
pub fn digest_hex(text: &str) -> Result<String, CmppError> {
    digest(text.as_bytes()).map(|md| to_hex(&md))
}

/// Hex `AuthenticatorSource` for the configured account.
pub fn authenticator_hex(config: &ProbeConfig, timestamp: u32) -> Result<String, ProbeError> {
    let account = &config.account;
    authenticator_source(&account.source_addr, &account.shared_secret, timestamp)
        .map(|md| format!("timestamp={timestamp:010} authenticator={}", to_hex(&md)))
        .map_err(|e| match e {
            CmppError::CredentialTooLong { .. } => ProbeError::step(ErrorCode::CredentialTooLong, e),
            e => ProbeError::Core(e),
        })
}

/// Encode `text` as UCS-2 and report what the length probe sees.
pub fn ucs2_report(text: &str) -> Result<String, CmppError> {
    let mut body = cmpp_core::recode(text.as_bytes(), "UTF-8", "UCS-2", cmpp_core::MAX_MSG_LENGTH)?;
    let encoded = body.len();
    body.extend_from_slice(&[0, 0]);
    Ok(format!(
        "encoded={encoded} scanned={} bytes={}",
        ucs2_length(&body),
        to_hex(&body[..encoded])
    ))
}

/// Hex of `text` converted between two charsets.
pub fn recode_hex(text: &str, from: &str, to: &str, capacity: usize) -> Result<String, CmppError> {
    let mut conv = Converter::open(from, to)?;
    let out = conv.convert(text.as_bytes(), capacity);
    Ok(format!("{} ({:?}, {} bytes)", to_hex(&out.bytes), out.outcome, out.bytes.len()))
}

/// Catalog line for `code`.
pub fn describe_code(code: u32) -> String {
    format!("{code}: {}", describe(code))
}

/// Send `ACTIVE_TEST` and wait for the matching response.
///
/// Returns the sequence id used and the round-trip time.
pub fn active_test(config: &ProbeConfig) -> Result<(u32, Duration), ProbeError> {
    let info = config.connection_info();
    let mut conn = Connection::connect(&info)
        .map_err(connect_error)?
        .with_max_frame_size(config.limits.max_frame_size);

    let started = Instant::now();
    let seq = conn
        .send_command(CommandId::ActiveTest.into(), &[])
        .map_err(|e| ProbeError::step(ErrorCode::ActiveTestSend, e))?;
    info!(sequence_id = seq, gateway = %info, "active test sent");

    for _ in 0..MAX_UNRELATED_FRAMES {
        let frame = conn
            .receive_frame()
            .map_err(|e| ProbeError::step(ErrorCode::ActiveTestRecv, e))?;
        if frame.command_id() == u32::from(CommandId::ActiveTestResp) && frame.sequence_id() == seq
        {
            return Ok((seq, started.elapsed()));
        }
        debug!(
            command_id = frame.command_id(),
            sequence_id = frame.sequence_id(),
            "skipping unrelated frame"
        );
    }

    Err(ProbeError::step(
        ErrorCode::ActiveTestRecv,
        CmppError::Other(format!("no response after {MAX_UNRELATED_FRAMES} frames")),
    ))
}
