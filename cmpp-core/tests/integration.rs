//! Integration tests — frame exchanges, sequence correlation and error
//! scenarios over a real TCP connection on localhost.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use cmpp_core::{
    CmppCodec, CmppError, CommandId, Connection, ConnectionInfo, Frame, HEADER_SIZE,
    TransportError, authenticator_source, is_command, receive, send, ucs2_length, write_header,
};
use futures::{SinkExt, StreamExt};
use tokio_util::codec::Framed;

// ── Helpers ──────────────────────────────────────────────────────

/// Bind a listener on an OS-assigned port and return it with the
/// matching connection info.
fn ephemeral_listener() -> (TcpListener, ConnectionInfo) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let info = ConnectionInfo::new(addr.ip().to_string(), addr.port())
        .with_read_timeout(Some(Duration::from_secs(5)))
        .with_write_timeout(Some(Duration::from_secs(5)));
    (listener, info)
}

/// Gateway stand-in: answers every request with its `*Resp` id and the
/// same sequence id, until the client hangs up.
fn spawn_echo_gateway(listener: TcpListener) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut gateway = Connection::new(stream);
        let mut answered = 0;
        while let Ok(frame) = gateway.receive_frame() {
            let resp_id = CommandId::try_from(frame.command_id())
                .map(|c| u32::from(c.response()))
                .unwrap_or(frame.command_id());
            let resp = Frame::new(resp_id, frame.sequence_id(), frame.body().to_vec()).unwrap();
            gateway.send_frame(&resp).unwrap();
            answered += 1;
        }
        answered
    })
}

// ── Exchanges ────────────────────────────────────────────────────

#[test]
fn active_test_round_trip() {
    let (listener, info) = ephemeral_listener();
    let gateway = spawn_echo_gateway(listener);

    let mut client = Connection::connect(&info).unwrap();
    let seq = client
        .send_command(CommandId::ActiveTest.into(), &[])
        .unwrap();

    let mut buf = [0u8; 64];
    let len = client.receive_into(&mut buf).unwrap();
    assert_eq!(len, HEADER_SIZE);
    assert!(is_command(&buf[..len], CommandId::ActiveTestResp.into()));
    assert_eq!(Frame::from_bytes(&buf[..len]).unwrap().sequence_id(), seq);

    drop(client);
    assert_eq!(gateway.join().unwrap(), 1);
}

#[test]
fn responses_correlate_by_sequence() {
    let (listener, info) = ephemeral_listener();
    let gateway = spawn_echo_gateway(listener);

    let mut client = Connection::connect(&info).unwrap();
    let mut sent = Vec::new();
    for i in 0u8..5 {
        let seq = client
            .send_command(CommandId::Submit.into(), &[i; 3])
            .unwrap();
        sent.push((seq, i));
    }

    for (seq, i) in sent {
        let resp = client.receive_frame().unwrap();
        assert_eq!(resp.command_id(), u32::from(CommandId::SubmitResp));
        assert_eq!(resp.sequence_id(), seq);
        assert_eq!(resp.body(), &[i; 3]);
    }

    drop(client);
    assert_eq!(gateway.join().unwrap(), 5);
}

#[test]
fn raw_send_and_receive_over_tcp() {
    let (listener, info) = ephemeral_listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 128];
        let len = receive(&mut stream, &mut buf).unwrap();
        buf[..len].to_vec()
    });

    let body = b"\x00\x4e\x00\x2d\x00\x00";
    let mut wire = write_header((HEADER_SIZE + body.len()) as u32, 4, 99)
        .encode()
        .to_vec();
    wire.extend_from_slice(body);

    let mut stream = TcpStream::connect((info.host(), info.port())).unwrap();
    send(&mut stream, &wire).unwrap();

    let got = server.join().unwrap();
    assert_eq!(got, wire);
    assert_eq!(ucs2_length(&got[HEADER_SIZE..]), 4);
}

// ── Failures ─────────────────────────────────────────────────────

#[test]
fn peer_closing_mid_frame_is_short_read() {
    let (listener, info) = ephemeral_listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Declares 100 bytes, delivers 20, hangs up.
        let mut wire = write_header(100, CommandId::Deliver.into(), 1).encode().to_vec();
        wire.extend_from_slice(&[0u8; 8]);
        stream.write_all(&wire).unwrap();
    });

    let mut client = Connection::connect(&info).unwrap();
    server.join().unwrap();

    let err = client.receive_frame().unwrap_err();
    assert!(matches!(
        err,
        CmppError::Transport(TransportError::ShortRead {
            expected: 88,
            actual: 8
        })
    ));
}

#[test]
fn absurd_declared_length_is_rejected() {
    let (listener, info) = ephemeral_listener();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .write_all(&write_header(u32::MAX, CommandId::Deliver.into(), 1).encode())
            .unwrap();
        stream
    });

    let mut client = Connection::connect(&info).unwrap();
    let err = client.receive_frame().unwrap_err();
    assert!(matches!(
        err,
        CmppError::Transport(TransportError::InvalidLength {
            declared: u32::MAX,
            ..
        })
    ));
    drop(server.join().unwrap());
}

#[test]
fn connect_to_closed_port_fails() {
    let (listener, info) = ephemeral_listener();
    drop(listener);
    let info = info.with_connect_timeout(Duration::from_secs(1));
    assert!(Connection::connect(&info).is_err());
}

#[test]
fn authenticator_is_stable() {
    let a = authenticator_source("901234", "secret", 102_030_405).unwrap();
    let b = authenticator_source("901234", "secret", 102_030_405).unwrap();
    let c = authenticator_source("901234", "secret", 102_030_406).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ── Async codec ──────────────────────────────────────────────────

#[tokio::test]
async fn codec_over_tokio_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let gateway = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut framed = Framed::new(stream, CmppCodec::new());
        let req = framed.next().await.unwrap().unwrap();
        let resp = Frame::empty(CommandId::ActiveTestResp.into(), req.sequence_id());
        framed.send(resp).await.unwrap();
    });

    let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let mut framed = Framed::new(stream, CmppCodec::new());
    framed
        .send(Frame::empty(CommandId::ActiveTest.into(), 41))
        .await
        .unwrap();

    let resp = tokio::time::timeout(Duration::from_secs(5), framed.next())
        .await
        .expect("timeout")
        .expect("stream closed")
        .unwrap();
    assert_eq!(resp.command_id(), u32::from(CommandId::ActiveTestResp));
    assert_eq!(resp.sequence_id(), 41);

    gateway.await.unwrap();
}
