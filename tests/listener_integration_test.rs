mod common;

use common::{RecordingApi, request, wait_for};
use quarantine_relay::app::{Config, RelayService};
use quarantine_relay::buffer::HistoryBuffer;
use quarantine_relay::domain::{RawLine, Transport};
use quarantine_relay::listener::LinePipeline;
use quarantine_relay::listener::tcp::read_lines;
use quarantine_relay::sender::Dispatcher;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

const ALERT: &str = r#"<185>date=2024-05-01 devname="FAZ" log="devid=FW1 srcip=10.0.0.5 srcintf=port3""#;

fn local_config() -> Config {
    Config {
        listen_host: "127.0.0.1".to_string(),
        udp_port: 0,
        tcp_port: 0,
        ..Config::default()
    }
}

fn peer() -> SocketAddr {
    "192.0.2.10:5514".parse().unwrap()
}

#[tokio::test]
async fn test_pipeline_records_and_dispatches() {
    let history = Arc::new(HistoryBuffer::default());
    let pipeline =
        LinePipeline::new(history.clone(), Dispatcher::new(RecordingApi::accepting())).unwrap();

    let plain = pipeline
        .process(RawLine::new("<13>just a syslog line", Transport::Udp, "192.0.2.1"))
        .await;
    assert!(plain.is_none());

    let outcome = pipeline
        .process(RawLine::new(ALERT, Transport::Tcp, "192.0.2.2"))
        .await
        .expect("alert dispatched");
    assert!(outcome.success);

    assert_eq!(history.snapshot(), vec!["<13>just a syslog line", ALERT]);
    assert_eq!(
        pipeline.dispatcher().api().calls(),
        vec![request("FW1", "port3", "10.0.0.5")]
    );
}

#[tokio::test]
async fn test_failed_dispatch_does_not_stop_pipeline() {
    let history = Arc::new(HistoryBuffer::default());
    let pipeline =
        LinePipeline::new(history.clone(), Dispatcher::new(RecordingApi::rejecting(500))).unwrap();

    for _ in 0..3 {
        let outcome = pipeline
            .process(RawLine::new(ALERT, Transport::Udp, "192.0.2.3"))
            .await
            .unwrap();
        assert!(!outcome.success);
    }

    assert_eq!(history.len(), 3);
    assert_eq!(pipeline.dispatcher().stats().failed, 3);
}

#[tokio::test]
async fn test_tcp_connection_reads_until_eof() {
    let history = Arc::new(HistoryBuffer::default());
    let pipeline = Arc::new(
        LinePipeline::new(history.clone(), Dispatcher::new(RecordingApi::accepting())).unwrap(),
    );

    let (mut client, server) = tokio::io::duplex(64);
    let reader = tokio::spawn(read_lines(
        server,
        peer(),
        pipeline.clone(),
        CancellationToken::new(),
    ));

    client.write_all(b"first line\r\n").await.unwrap();
    client.write_all(b"bad \xff bytes\n").await.unwrap();
    client.write_all(format!("{ALERT}\n").as_bytes()).await.unwrap();
    client.write_all(b"no trailing newline").await.unwrap();
    drop(client);

    tokio::time::timeout(Duration::from_secs(5), reader)
        .await
        .expect("reader stops at end of stream")
        .unwrap();

    assert_eq!(
        history.snapshot(),
        vec![
            "first line".to_string(),
            "bad \u{FFFD} bytes".to_string(),
            ALERT.to_string(),
            "no trailing newline".to_string(),
        ]
    );
    assert_eq!(pipeline.dispatcher().api().calls().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_udp_and_tcp_keep_per_source_order() {
    let service = RelayService::bind_with_api(&local_config(), RecordingApi::accepting())
        .await
        .unwrap();
    let udp_addr = service.udp_addr();
    let tcp_addr = service.tcp_addr();
    let history = service.history();
    let cancel = CancellationToken::new();
    let running = tokio::spawn(service.run(cancel.clone()));

    let mut tcp = TcpStream::connect(tcp_addr).await.unwrap();
    let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    for i in 0..30 {
        tcp.write_all(format!("tcp {i}\n").as_bytes()).await.unwrap();
        udp.send_to(format!("udp {i}\n").as_bytes(), udp_addr)
            .await
            .unwrap();
    }
    tcp.flush().await.unwrap();

    wait_for(|| history.total_appended() == 60).await;

    let snapshot = history.snapshot();
    for transport in ["tcp", "udp"] {
        let seen: Vec<&String> = snapshot
            .iter()
            .filter(|line| line.starts_with(transport))
            .collect();
        let expected: Vec<String> = (0..30).map(|i| format!("{transport} {i}")).collect();
        assert_eq!(seen, expected.iter().collect::<Vec<_>>());
    }

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service stops on cancel")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_history_keeps_most_recent_lines() {
    let config = Config {
        history_capacity: 10,
        ..local_config()
    };
    let service = RelayService::bind_with_api(&config, RecordingApi::accepting())
        .await
        .unwrap();
    let tcp_addr = service.tcp_addr();
    let history = service.history();
    let cancel = CancellationToken::new();
    let running = tokio::spawn(service.run(cancel.clone()));

    let mut tcp = TcpStream::connect(tcp_addr).await.unwrap();
    for i in 0..25 {
        tcp.write_all(format!("line {i}\n").as_bytes()).await.unwrap();
    }
    tcp.flush().await.unwrap();

    wait_for(|| history.total_appended() == 25).await;

    let expected: Vec<String> = (15..25).map(|i| format!("line {i}")).collect();
    assert_eq!(history.snapshot(), expected);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service stops on cancel")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_udp_alert_reaches_api_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get-and-quarantine"))
        .and(body_json(json!({
            "deviceid": "FW1",
            "source_interface": "port3",
            "ip": "10.0.0.5"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config {
        api_url: format!("{}/get-and-quarantine", mock_server.uri()),
        ..local_config()
    };
    config.post_process();

    let service = RelayService::bind(&config).await.unwrap();
    let udp_addr = service.udp_addr();
    let pipeline = service.pipeline();
    let cancel = CancellationToken::new();
    let running = tokio::spawn(service.run(cancel.clone()));

    let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    udp.send_to(b"<13>routine line without alert", udp_addr)
        .await
        .unwrap();
    udp.send_to(ALERT.as_bytes(), udp_addr).await.unwrap();

    wait_for(|| pipeline.dispatcher().stats().succeeded == 1).await;
    assert_eq!(pipeline.history().len(), 2);
    assert_eq!(pipeline.dispatcher().stats().attempted, 1);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service stops on cancel")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = Config {
        tcp_port: taken.local_addr().unwrap().port(),
        ..local_config()
    };

    let result = RelayService::bind_with_api(&config, RecordingApi::accepting()).await;
    assert!(result.is_err());
}
