use seabattle::transport::{FrameReceiver, FrameSender, Transport};
use seabattle::{InMemoryTransport, Outbox, Request, Response, ResponseSink};

#[tokio::test(flavor = "multi_thread")]
async fn test_pair_delivers_both_ways() -> anyhow::Result<()> {
    let (server_end, client_end) = InMemoryTransport::<Request, Response>::pair();
    let (mut server_rx, mut server_tx) = server_end.split();
    let (mut client_rx, mut client_tx) = client_end.split();

    client_tx
        .send(Request::new("p", "ls-rooms", Default::default()))
        .await?;
    assert_eq!(server_rx.recv().await?.action, "ls-rooms");

    server_tx.send(Response::wait("hold on")).await?;
    assert_eq!(client_rx.recv().await?.message, "hold on");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_ends_peer_stream() -> anyhow::Result<()> {
    let (server_end, client_end) = InMemoryTransport::<Request, Response>::pair();
    let (_server_rx, mut server_tx) = server_end.split();
    let (mut client_rx, _client_tx) = client_end.split();

    server_tx.close().await?;
    let err = client_rx.recv().await.unwrap_err();
    assert_eq!(err.to_string(), "Channel closed");
    let err = server_tx.send(Response::lose()).await.unwrap_err();
    assert_eq!(err.to_string(), "Transport is shut down");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_outbox_flushes_in_order_then_closes() -> anyhow::Result<()> {
    let (server_end, client_end) = InMemoryTransport::<Request, Response>::pair();
    let (_server_rx, server_tx) = server_end.split();
    let (mut client_rx, _client_tx) = client_end.split();

    let outbox = Outbox::spawn(Box::new(server_tx));
    outbox.send(Response::place_ship(5));
    outbox.send(Response::place_ship(4));
    outbox.close();
    outbox.send(Response::place_ship(3));

    assert_eq!(client_rx.recv().await?, Response::place_ship(5));
    assert_eq!(client_rx.recv().await?, Response::place_ship(4));
    assert!(client_rx.recv().await.is_err());
    Ok(())
}
