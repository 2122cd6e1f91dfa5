use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener as StdTcpListener},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
use axum_test::TestServer;
use pactest_config::{
    Config, ConfigMetadata, OrchestratorSettings, ServerConfig, StoreConfig,
};
use pactest_core::engine::{EngineDescriptor, EngineFlag};
use pactest_server::{AppState, create_app};
use tokio::net::TcpListener;
use url::Url;

pub const DIRECT_PAC: &str = r#"function FindProxyForURL(url, host) { return "DIRECT"; }"#;

#[allow(unused)]
pub fn test_config(engines: Vec<EngineDescriptor>, public_url: Url) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            public_url,
        },
        store: StoreConfig { capacity: 5 },
        orchestrator: OrchestratorSettings {
            engine_timeout: Duration::from_secs(2),
        },
        engines,
        metadata: ConfigMetadata::default(),
    }
}

/// In-process server; engines cannot reach it, which is fine for tests that
/// do not need them to fetch the PAC.
#[allow(unused)]
pub fn build_test_server(engines: Vec<EngineDescriptor>) -> (TestServer, AppState) {
    let config = test_config(engines, Url::parse("http://127.0.0.1:8080/").unwrap());
    let state = AppState::from_config(config).expect("state builds");
    let server = TestServer::new(create_app(state.clone())).expect("test server builds");
    (server, state)
}

/// Real HTTP server on a known port, so engines can fetch `/pac/{uid}`.
#[allow(unused)]
pub fn build_http_test_server(engines: Vec<EngineDescriptor>) -> (TestServer, AppState) {
    let port = free_port();
    let public_url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
    let state = AppState::from_config(test_config(engines, public_url)).expect("state builds");
    let server = TestServer::builder()
        .http_transport_with_ip_port(Some(Ipv4Addr::LOCALHOST.into()), Some(port))
        .build(create_app(state.clone()))
        .expect("test server builds");
    (server, state)
}

fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[allow(unused)]
pub async fn start_engine(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// An engine that answers every call with the same status and body.
#[allow(unused)]
pub async fn canned_engine(status: StatusCode, body: &'static str) -> Url {
    start_engine(Router::new().route(
        "/",
        post(move || async move { (status, body).into_response() }),
    ))
    .await
}

/// A DIRECT-answering engine plus the number of calls it has received.
#[allow(unused)]
pub async fn counting_engine() -> (Url, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let url = start_engine(Router::new().route(
        "/",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::OK, r#"{"proxy":"DIRECT"}"#).into_response()
            }
        }),
    ))
    .await;
    (url, calls)
}

#[allow(unused)]
pub fn dead_engine(name: &str) -> EngineDescriptor {
    let port = free_port();
    EngineDescriptor::new(
        name,
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
        [EngineFlag::Evaluation],
    )
}
