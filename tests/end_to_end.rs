//! End-to-end tests driving the public API: configuration, validation,
//! encoding and transmission against loopback servers.

use std::{
    io::Read,
    net::{TcpListener, UdpSocket},
    sync::mpsc,
    thread,
    time::Duration,
};

use rstest::rstest;

use gelf_transmitter::{
    BreakerConfig, Payload, TcpConfig, TransmitError, TransmitterConfig, UdpConfig, check_valid,
    config::DEFAULT_VERSION, encode,
};

fn service_payload() -> Payload {
    let mut payload = Payload::new();
    payload.set_version(DEFAULT_VERSION);
    payload.set_host("app-host");
    payload.set_short_message("service started");
    payload.set_timestamp(1385053862.5);
    payload.set_level(6);
    payload.add_additional_field("application", "orders");
    payload
}

#[rstest]
fn udp_stack_delivers_a_validated_payload() {
    let receiver = UdpSocket::bind(("127.0.0.1", 0)).expect("bind receiver");
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set read timeout");
    let addr = receiver.local_addr().expect("receiver has address");

    let transmitter =
        TransmitterConfig::udp(UdpConfig::new("127.0.0.1").with_port(addr.port())).build();

    let payload = service_payload();
    assert!(check_valid(&payload));
    transmitter.transmit(&payload).expect("transmit");

    let mut buf = vec![0u8; 9000];
    let len = receiver.recv(&mut buf).expect("receive datagram");
    assert_eq!(&buf[..len], encode(&payload).expect("encode").as_slice());
}

#[rstest]
fn tcp_stack_delivers_a_nul_terminated_frame() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
    let addr = listener.local_addr().expect("listener has address");
    let (notify_tx, notify_rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).expect("read stream");
        notify_tx.send(bytes).expect("send bytes");
    });

    let transmitter = TransmitterConfig::tcp(
        TcpConfig::new("127.0.0.1")
            .with_port(addr.port())
            .with_so_timeout(Duration::from_millis(500)),
    )
    .build();

    let payload = service_payload();
    transmitter.transmit(&payload).expect("transmit");
    transmitter.close().expect("close");

    let bytes = notify_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("bytes received");
    let mut expected = encode(&payload).expect("encode");
    expected.push(0);
    assert_eq!(bytes, expected);
}

#[rstest]
fn breaker_wrapped_stack_trips_against_a_dead_peer() {
    // Bind then drop a listener so the port is known to refuse connections.
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
    let addr = listener.local_addr().expect("listener has address");
    drop(listener);

    let transmitter = TransmitterConfig::tcp(
        TcpConfig::new("127.0.0.1")
            .with_port(addr.port())
            .with_so_timeout(Duration::from_millis(200)),
    )
    .with_breaker(Some(BreakerConfig {
        max_failures: 2,
        recovery_period: Duration::from_secs(60),
    }))
    .build();

    let payload = service_payload();
    for _ in 0..2 {
        let err = transmitter.transmit(&payload).expect_err("dead peer");
        assert!(err.is_connection_error());
    }
    let err = transmitter.transmit(&payload).expect_err("circuit open");
    assert!(matches!(err, TransmitError::CircuitOpen));
}

#[rstest]
fn invalid_payload_is_rejected_before_any_network_attempt() {
    let mut payload = service_payload();
    payload.add_additional_field("~bad", "value");
    assert!(!check_valid(&payload));
}
