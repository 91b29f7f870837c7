//! Test helpers for integration tests
//!
//! Starts the registry, game backends and the gateway on loopback ports and
//! provides a small WebSocket client that speaks the gateway envelope.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use game_cache::{MemoryLeaseStore, MemoryWallet};
use game_core::{GameId, ServiceKind};
use game_framework::GameServer;
use game_gateway::router::{RegistryDiscovery, SmartRouter};
use game_gateway::{create_connector_app, GatewaySettings, GatewayState};
use game_registry::{LoginService, RegistryState, ServiceRegistry, DEFAULT_LEASE_TTL};
use game_rpc::{connector_pool, game_pool, CentralClient, Registrar, RegistrarConfig, RegistrarState};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::fixtures::{seeded_users, RecordingHandler};

/// How long a test waits for a frame or a condition
pub const WAIT: Duration = Duration::from_secs(5);

/// Bind a loopback listener and serve `app` on it
pub async fn spawn_app(app: Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    spawn_on(listener, app)
}

fn spawn_on(listener: TcpListener, app: Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok((addr, handle))
}

/// Poll `check` until it holds or [`WAIT`] runs out
pub async fn wait_until<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

/// Redis URL for the store tests, if the environment provides one
pub fn redis_url() -> Option<String> {
    match std::env::var("REDIS_URL") {
        Ok(url) if !url.is_empty() => Some(url),
        _ => {
            eprintln!("Skipping test: REDIS_URL not set");
            None
        }
    }
}

/// Registry and gateway running in-process
pub struct TestCluster {
    pub registry_addr: SocketAddr,
    pub gateway_addr: SocketAddr,
    pub connector_addr: SocketAddr,
    pub registry: Arc<ServiceRegistry>,
    pub client: Client,
    central: Arc<CentralClient>,
    handles: Vec<JoinHandle<()>>,
}

impl TestCluster {
    /// Start a registry with in-memory stores and a gateway routed by it
    pub async fn start() -> Result<Self> {
        let registry = ServiceRegistry::new_shared(MemoryLeaseStore::new_shared(), DEFAULT_LEASE_TTL);
        let login = LoginService::new(Arc::new(seeded_users()), Arc::new(MemoryWallet::new()));
        let registry_app =
            game_registry::create_app(RegistryState::new(registry.clone(), Arc::new(login)));
        let (registry_addr, registry_handle) = spawn_app(registry_app).await?;

        let central = Arc::new(CentralClient::connect(&registry_addr.to_string())?);

        // The connector address is advertised to backends, so bind it first.
        let connector_listener = TcpListener::bind("127.0.0.1:0").await?;
        let connector_addr = connector_listener.local_addr()?;

        let router = SmartRouter::new(Arc::new(RegistryDiscovery::new(central.clone())));
        let state = GatewayState::new(
            GatewaySettings::new(connector_addr.to_string()),
            router,
            central.clone(),
            Arc::new(game_pool()),
        );

        let (_, connector_handle) = spawn_on(connector_listener, create_connector_app(&state))?;
        let (gateway_addr, gateway_handle) = spawn_app(game_gateway::create_app(state)).await?;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            registry_addr,
            gateway_addr,
            connector_addr,
            registry,
            client,
            central,
            handles: vec![registry_handle, connector_handle, gateway_handle],
        })
    }

    /// Start a game backend and wait until it holds a lease
    pub async fn start_game(&self, name: &str, kind: ServiceKind, game_ids: Vec<GameId>) -> Result<GameInstance> {
        let handler = RecordingHandler::new();
        let server = Arc::new(GameServer::new(
            name,
            kind,
            handler.clone(),
            Arc::new(seeded_users()),
            Arc::new(MemoryWallet::new()),
            Arc::new(connector_pool()),
        ));
        let (addr, handle) = spawn_app(game_framework::create_app(server)).await?;

        let mut config = RegistrarConfig::new(name, kind, addr.to_string(), game_ids);
        config.heartbeat_interval = Duration::from_millis(200);
        config.retry_delay = Duration::from_millis(100);
        let registrar = Registrar::new(self.central.clone(), config);
        let registrar_handle = registrar.spawn();

        let registered = wait_until(|| {
            let registrar = registrar.clone();
            async move { registrar.state() == RegistrarState::Registered }
        })
        .await;
        if !registered {
            bail!("game instance {name} never registered");
        }

        Ok(GameInstance {
            addr,
            handler,
            registrar,
            handles: vec![handle, registrar_handle],
        })
    }

    /// Open a client WebSocket to the gateway
    pub async fn connect(&self) -> Result<WsClient> {
        let (stream, _) = connect_async(format!("ws://{}/gateway", self.gateway_addr)).await?;
        Ok(WsClient { stream })
    }

    /// Open a client WebSocket and log in with `token`
    pub async fn login(&self, token: &str) -> Result<WsClient> {
        let mut ws = self.connect().await?;
        ws.send_action("login", json!({ "token": token })).await?;
        let reply = ws.next_json().await?;
        if reply["data"]["success"] != json!(true) {
            bail!("login failed: {reply}");
        }
        Ok(ws)
    }

    /// POST JSON to the registry
    pub async fn post_registry<T: Serialize>(&self, path: &str, body: &T) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(format!("http://{}{}", self.registry_addr, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}

impl Drop for TestCluster {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// A game backend registered with the test registry
pub struct GameInstance {
    pub addr: SocketAddr,
    pub handler: Arc<RecordingHandler>,
    pub registrar: Arc<Registrar>,
    handles: Vec<JoinHandle<()>>,
}

impl GameInstance {
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Deregister and stop serving
    pub async fn shutdown(self) {
        self.registrar.stop().await;
    }
}

impl Drop for GameInstance {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// What the gateway did with the socket
#[derive(Debug, PartialEq, Eq)]
pub enum Closed {
    /// Close frame with its reason
    Frame(String),
    /// Stream ended without a close frame
    Dropped,
}

/// Client side of a gateway WebSocket
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Send `{action, payload}` as a text frame
    pub async fn send_action(&mut self, action: &str, payload: Value) -> Result<()> {
        self.send_text(json!({ "action": action, "payload": payload }).to_string())
            .await
    }

    pub async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Next text frame, decoded as JSON
    pub async fn next_json(&mut self) -> Result<Value> {
        let text = self.next_text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Next text frame, skipping control frames
    pub async fn next_text(&mut self) -> Result<String> {
        loop {
            let frame = tokio::time::timeout(WAIT, self.stream.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for a frame"))?;
            match frame {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Close(frame))) => bail!("connection closed: {frame:?}"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => bail!("connection dropped"),
            }
        }
    }

    /// Wait for the gateway to close the socket, skipping any frames before it
    pub async fn expect_closed(&mut self) -> Result<Closed> {
        loop {
            let frame = tokio::time::timeout(WAIT, self.stream.next())
                .await
                .map_err(|_| anyhow!("socket still open"))?;
            match frame {
                Some(Ok(Message::Close(Some(frame)))) => return Ok(Closed::Frame(frame.reason.to_string())),
                Some(Ok(Message::Close(None))) => return Ok(Closed::Frame(String::new())),
                Some(Ok(_)) => continue,
                Some(Err(_)) | None => return Ok(Closed::Dropped),
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
