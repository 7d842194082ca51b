//! Remote control tests over real loopback sockets

use handctl::actuator::{Actuator, ActuatorCommand, RecordingActuator};
use handctl::remote::{send_command, MotionClient, MotionConfig, RemoteConfig, RemoteServer, ReplaySensor};
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start_server(recorder: &RecordingActuator, timeout_ms: u64) -> SocketAddr {
    let config = RemoteConfig {
        bind: "127.0.0.1:0".to_string(),
        request_timeout_ms: timeout_ms,
        ..RemoteConfig::default()
    };
    let actuator: Arc<dyn Actuator> = Arc::new(recorder.clone());
    let server = RemoteServer::bind(config, actuator).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

async fn request(addr: SocketAddr, text: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(text.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

async fn wait_for_next(recorder: &RecordingActuator, expected: usize) -> bool {
    for _ in 0..100 {
        if recorder.count(|c| *c == ActuatorCommand::PressNext) >= expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_browser_next_presses_key_and_serves_page() {
    let recorder = RecordingActuator::new();
    let addr = start_server(&recorder, 2000).await;

    let response = request(addr, "GET /next HTTP/1.1\r\nHost: phone\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("SHAKE OR TAP"));
    assert_eq!(recorder.calls(), vec![ActuatorCommand::PressNext]);
}

#[tokio::test]
async fn test_plain_page_request_does_nothing() {
    let recorder = RecordingActuator::new();
    let addr = start_server(&recorder, 2000).await;

    let response = request(addr, "GET / HTTP/1.1\r\nHost: phone\r\n\r\n").await;

    assert!(response.contains("devicemotion"));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_uplink_literal_triggers_next() {
    let recorder = RecordingActuator::new();
    let addr = start_server(&recorder, 2000).await;

    send_command(&addr.to_string(), "NEXT").await.unwrap();

    assert!(wait_for_next(&recorder, 1).await);
}

#[tokio::test]
async fn test_silent_client_does_not_block_others() {
    let recorder = RecordingActuator::new();
    let addr = start_server(&recorder, 200).await;

    // connects and never sends anything
    let _silent = TcpStream::connect(addr).await.unwrap();

    let response = request(addr, "GET /next HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(wait_for_next(&recorder, 1).await);
}

#[tokio::test]
async fn test_failing_actuator_still_answers() {
    let recorder = RecordingActuator::new();
    recorder.set_failing(true);
    let addr = start_server(&recorder, 2000).await;

    let first = request(addr, "GET /next HTTP/1.1\r\n\r\n").await;
    let second = request(addr, "GET /next HTTP/1.1\r\n\r\n").await;

    assert!(first.starts_with("HTTP/1.1 200 OK"));
    assert!(second.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(recorder.calls().len(), 2);
}

#[tokio::test]
async fn test_shake_from_phone_reaches_desktop() {
    let recorder = RecordingActuator::new();
    let addr = start_server(&recorder, 2000).await;

    let samples: String = [0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.2, 0.1]
        .iter()
        .map(|x| format!("{{\"x\":{},\"y\":1.0,\"z\":9.8}}\n", x))
        .collect();
    let config = MotionConfig {
        poll_interval_ms: 1,
        server: addr.to_string(),
        ..MotionConfig::default()
    };

    let stats = MotionClient::new(config, ReplaySensor::from_reader(Cursor::new(samples)))
        .run()
        .await;

    assert_eq!(stats.samples, 12);
    assert_eq!(stats.next_sent, 1);
    assert_eq!(stats.send_failures, 0);
    assert!(wait_for_next(&recorder, 1).await);
}

#[tokio::test]
async fn test_unreachable_desktop_is_not_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert!(send_command(&addr.to_string(), "NEXT").await.is_err());
}
