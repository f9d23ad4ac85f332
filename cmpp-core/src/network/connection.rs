use std::fmt;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{CmppError, TransportError};
use crate::frame::{Frame, MAX_FRAME_SIZE};
use crate::header::HEADER_SIZE;
use crate::sequence::SequenceGenerator;
use crate::transport::{self, Socket};

/// A CMPP link to a single gateway.
///
/// Owns the socket and draws sequence ids from a generator that may be
/// shared with other connections. One exchange at a time: every call
/// takes `&mut self`.
#[derive(Debug)]
pub struct Connection<S> {
    socket: S,
    sequence: Arc<SequenceGenerator>,
    recv_buf: Vec<u8>,
}

impl<S: Socket> Connection<S> {
    pub fn new(socket: S) -> Self {
        Self::with_sequence(socket, Arc::new(SequenceGenerator::new()))
    }

    pub fn with_sequence(socket: S, sequence: Arc<SequenceGenerator>) -> Self {
        Self {
            socket,
            sequence,
            recv_buf: vec![0u8; MAX_FRAME_SIZE],
        }
    }

    /// Lower the cap on incoming frames. Values above [`MAX_FRAME_SIZE`]
    /// are clamped to it.
    pub fn with_max_frame_size(mut self, max: usize) -> Self {
        self.recv_buf = vec![0u8; max.clamp(HEADER_SIZE, MAX_FRAME_SIZE)];
        self
    }

    /// Frame `body` under a fresh sequence id and send it.
    ///
    /// Returns the sequence id so the caller can match the response.
    pub fn send_command(&mut self, command_id: u32, body: &[u8]) -> Result<u32, CmppError> {
        let sequence_id = self.sequence.next_sequence();
        let frame = Frame::new(command_id, sequence_id, body.to_vec())?;
        self.send_frame(&frame)?;
        Ok(sequence_id)
    }

    /// Send a pre-built frame, e.g. a response echoing a peer's sequence id.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), TransportError> {
        transport::send(&mut self.socket, &frame.to_bytes())
    }

    /// Receive one frame into a caller buffer, returning its length.
    pub fn receive_into(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        transport::receive(&mut self.socket, buf)
    }

    /// Receive one frame into the connection's own buffer.
    pub fn receive_frame(&mut self) -> Result<Frame, CmppError> {
        let len = transport::receive(&mut self.socket, &mut self.recv_buf)?;
        Frame::from_bytes(&self.recv_buf[..len])
    }

    pub fn sequence(&self) -> &Arc<SequenceGenerator> {
        &self.sequence
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    pub fn into_inner(self) -> S {
        self.socket
    }
}

impl Connection<TcpStream> {
    /// Open a TCP connection with the timeouts from `info` applied.
    pub fn connect(info: &ConnectionInfo) -> Result<Self, CmppError> {
        let addrs = (info.host(), info.port()).to_socket_addrs()?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, info.connect_timeout) {
                Ok(stream) => {
                    configure(&stream, info).map_err(CmppError::SocketSetup)?;
                    info!(%addr, "connected to gateway");
                    return Ok(Self::new(stream));
                }
                Err(e) => {
                    debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => e.into(),
            None => CmppError::Other(format!("{info} did not resolve to any address")),
        })
    }
}

fn configure(stream: &TcpStream, info: &ConnectionInfo) -> std::io::Result<()> {
    stream.set_read_timeout(info.read_timeout)?;
    stream.set_write_timeout(info.write_timeout)?;
    stream.set_nodelay(true)
}

/// Where and how to reach a gateway.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    host: String,
    port: u16,
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(10),
            read_timeout: None,
            write_timeout: None,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `None` blocks indefinitely. A zero duration is refused by the
    /// socket when connecting.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
