#![allow(dead_code)]

use seabattle::protocol::{actions, ArgValue, Args};
use seabattle::transport::{FrameReceiver, FrameSender, Transport};
use seabattle::{serve_connection, InMemoryTransport, RegistryHandle, Request, Response};
use tokio::time::{timeout, Duration};

/// Placements made by each player, in order; every ship points right.
pub const LAYOUT: [(i32, i32); 10] = [
    (0, 0),
    (0, 6),
    (2, 0),
    (2, 5),
    (4, 0),
    (4, 4),
    (4, 8),
    (6, 0),
    (6, 3),
    (6, 6),
];

pub const LENGTHS: [usize; 10] = [5, 4, 4, 3, 3, 3, 2, 2, 2, 2];

/// Every cell covered by [`LAYOUT`], ship by ship.
pub fn fleet_cells() -> Vec<(i32, i32)> {
    LAYOUT
        .iter()
        .zip(LENGTHS)
        .flat_map(|(&(r, c), len)| (0..len as i32).map(move |i| (r, c + i)))
        .collect()
}

/// Scripted player talking to a server over any framed transport.
pub struct TestClient {
    pub id: String,
    rx: Box<dyn FrameReceiver<Response>>,
    tx: Box<dyn FrameSender<Request>>,
}

impl TestClient {
    /// Wrap a client-side transport and consume the `register` greeting.
    pub async fn from_transport<T>(transport: T) -> TestClient
    where
        T: Transport<Response, Request>,
    {
        let (rx, tx) = transport.split();
        let mut client = TestClient {
            id: String::new(),
            rx: Box::new(rx),
            tx: Box::new(tx),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting.action, actions::REGISTER);
        assert_eq!(greeting.message, "Connected to server.");
        client.id = text(&greeting.args, "id");
        client
    }

    /// Connect to the registry through an in-process transport.
    pub async fn connect(registry: &RegistryHandle) -> TestClient {
        let (server_end, client_end) = InMemoryTransport::<Request, Response>::pair();
        tokio::spawn(serve_connection(registry.clone(), server_end, Duration::from_secs(60)));
        TestClient::from_transport(client_end).await
    }

    pub async fn send(&mut self, action: &str, args: Args) {
        let request = Request::new(self.id.clone(), action, args);
        self.tx.send(request).await.expect("send failed");
    }

    pub async fn recv(&mut self) -> Response {
        timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for a response")
            .expect("connection closed")
    }

    /// Wait until the server closes the connection.
    pub async fn closed(&mut self) {
        let res = timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for close");
        assert!(res.is_err(), "expected close, got {:?}", res);
    }

    /// Create a room and return its id.
    pub async fn create_room(&mut self) -> String {
        self.send(actions::CREATE_ROOM, Args::new()).await;
        let reply = self.recv().await;
        assert_eq!(reply.action, actions::WAIT);
        text(&reply.args, "id")
    }

    pub async fn place(&mut self, row: i32, col: i32, direction: &str) {
        self.send(
            actions::PLACE,
            seabattle::args! { "x" => row, "y" => col, "direction" => direction },
        )
        .await;
    }

    pub async fn shoot(&mut self, row: i32, col: i32) {
        self.send(actions::SHOOT, seabattle::args! { "x" => row, "y" => col })
            .await;
    }

    pub async fn close(mut self) {
        let _ = self.tx.close().await;
    }
}

pub fn text(args: &Args, key: &str) -> String {
    match args.get(key) {
        Some(ArgValue::Text(s)) => s.clone(),
        other => panic!("expected text for {}, got {:?}", key, other),
    }
}

/// Seat `a` and `b` in a fresh room. Returns the room id; `a` has been
/// prompted for its first ship.
pub async fn start_match(a: &mut TestClient, b: &mut TestClient) -> String {
    let room = a.create_room().await;
    b.send(actions::JOIN_ROOM, seabattle::args! { "roomId" => room.as_str() })
        .await;
    let joined = b.recv().await;
    assert_eq!(joined.action, actions::WAIT);
    assert!(joined.message.contains(&room));
    assert_eq!(a.recv().await, Response::place_ship(5));
    room
}

/// Both players place [`LAYOUT`]; afterwards `a` holds the first shot.
pub async fn place_fleets(a: &mut TestClient, b: &mut TestClient) {
    for (i, &(r, c)) in LAYOUT.iter().enumerate() {
        a.place(r, c, "right").await;
        assert_eq!(a.recv().await.action, actions::PLACED);
        assert_eq!(b.recv().await, Response::place_ship(LENGTHS[i]));

        b.place(r, c, "right").await;
        assert_eq!(b.recv().await.action, actions::PLACED);
        let prompt = a.recv().await;
        if i + 1 < LAYOUT.len() {
            assert_eq!(prompt, Response::place_ship(LENGTHS[i + 1]));
        } else {
            assert_eq!(prompt, Response::shoot(None));
        }
    }
}
