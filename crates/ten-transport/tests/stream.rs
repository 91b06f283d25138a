//! Integration tests for the stream transport.
//!
//! These use a real TCP listener for the network path and an in-memory
//! duplex pipe for the chunking behavior.

use ten_transport::{Connection, StreamConnection, TcpConnection};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_tcp_connect_and_send_receive() {
    // "127.0.0.1:0" tells the OS to pick an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"hello from server").await.unwrap();
        let mut buf = [0u8; 17];
        socket.read_exact(&mut buf).await.unwrap();
        buf
    });

    let conn = TcpConnection::connect(&addr).await.expect("should connect");
    assert!(conn.id().into_inner() > 0);

    // A single read may return fewer bytes than were written, so gather.
    let mut received = Vec::new();
    while received.len() < 17 {
        let chunk = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        received.extend_from_slice(&chunk);
    }
    assert_eq!(received, b"hello from server");

    conn.send(b"hello from client").await.expect("send should succeed");
    let echoed = server.await.unwrap();
    assert_eq!(&echoed, b"hello from client");
}

#[tokio::test]
async fn test_connect_refused_returns_connect_failed() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = TcpConnection::connect(&addr).await;
    assert!(matches!(
        result,
        Err(ten_transport::TransportError::ConnectFailed(_))
    ));
}

#[tokio::test]
async fn test_recv_returns_none_on_peer_close() {
    let (client, server) = tokio::io::duplex(64);
    let conn = StreamConnection::new(client);

    drop(server);

    let result = conn.recv().await.expect("recv should not error");
    assert!(result.is_none(), "should return None on peer close");
}

#[tokio::test]
async fn test_close_signals_eof_to_peer() {
    let (client, mut server) = tokio::io::duplex(64);
    let conn = StreamConnection::new(client);

    conn.send(&[4, 3]).await.unwrap();
    conn.close().await.expect("close should succeed");

    let mut all = Vec::new();
    server.read_to_end(&mut all).await.unwrap();
    assert_eq!(all, vec![4, 3]);
}

#[tokio::test]
async fn test_connections_get_distinct_ids() {
    let (a, _a_peer) = tokio::io::duplex(8);
    let (b, _b_peer) = tokio::io::duplex(8);
    let a = StreamConnection::new(a);
    let b = StreamConnection::new(b);
    assert_ne!(a.id(), b.id());
}
