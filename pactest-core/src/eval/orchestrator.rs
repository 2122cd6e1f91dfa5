use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{EngineResult, EvalRequest, EvalResponse};
use crate::{
    engine::{EngineDescriptor, EnginePayload, EngineRegistry, EngineReply},
    error::Result,
};

/// Per-engine timeout used when the configuration does not name one.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound for a single engine call, connect to last body byte.
    pub engine_timeout: Duration,
    /// Public base URL of this server, used to build each PAC's fetch URL.
    pub pac_base_url: Url,
}

/// Fans evaluations out to every registered engine.
///
/// Each engine gets its own task and its own timeout, so one slow or broken
/// engine never delays or spoils another engine's result. `evaluate` cannot
/// fail: transport and protocol problems become `failed` results.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    client: reqwest::Client,
    registry: EngineRegistry,
    config: OrchestratorConfig,
    shutdown: CancellationToken,
}

impl Orchestrator {
    pub fn new(registry: EngineRegistry, config: OrchestratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pactest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, registry, config))
    }

    pub fn with_client(
        client: reqwest::Client,
        registry: EngineRegistry,
        config: OrchestratorConfig,
    ) -> Self {
        info!(
            engines = registry.len(),
            engine_timeout_ms = config.engine_timeout.as_millis() as u64,
            pac_base_url = %config.pac_base_url,
            "orchestrator ready"
        );

        Self {
            client,
            registry,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Abandons in-flight engine calls; they report as cancelled.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Calls every engine concurrently and waits for all of them.
    ///
    /// Results follow registry order, whatever order the engines finish in.
    #[instrument(skip_all, fields(pac = %request.pac.uid, dest_host = %request.dest_host, src_ip = %request.src_ip))]
    pub async fn evaluate(&self, request: EvalRequest) -> EvalResponse {
        let started = Instant::now();
        let payload = Arc::new(EnginePayload::build(&request, &self.config.pac_base_url));

        let tasks = self.registry.iter().cloned().map(|engine| {
            let client = self.client.clone();
            let payload = Arc::clone(&payload);
            let timeout = self.config.engine_timeout;
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                call_engine(&client, &engine, &payload, timeout, &shutdown).await
            })
        });
        let joined = join_all(tasks).await;

        let results = joined
            .into_iter()
            .zip(self.registry.iter())
            .map(|(joined, engine)| match joined {
                Ok(result) => result,
                Err(err) => {
                    warn!(engine = %engine.name, error = %err, "engine task did not complete");
                    EngineResult::from_reply(engine, EngineReply::aborted(err.to_string()))
                }
            })
            .collect();

        let response = EvalResponse::aggregate(request, results);
        info!(
            status = ?response.status,
            succeeded = response.succeeded(),
            engines = response.results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evaluation finished"
        );
        response
    }
}

async fn call_engine(
    client: &reqwest::Client,
    engine: &EngineDescriptor,
    payload: &EnginePayload,
    timeout: Duration,
    shutdown: &CancellationToken,
) -> EngineResult {
    let started = Instant::now();
    let reply = tokio::select! {
        reply = dispatch(client, engine, payload, timeout) => reply,
        () = shutdown.cancelled() => EngineReply::cancelled(),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &reply {
        EngineReply::Success { proxy } => {
            debug!(engine = %engine.name, %proxy, elapsed_ms, "engine answered");
        }
        EngineReply::Failed {
            error,
            message,
            error_code,
        } => {
            warn!(
                engine = %engine.name,
                error = error.as_deref().unwrap_or_default(),
                message = message.as_deref().unwrap_or_default(),
                error_code = error_code.unwrap_or_default(),
                elapsed_ms,
                "engine evaluation failed"
            );
        }
    }

    EngineResult::from_reply(engine, reply)
}

async fn dispatch(
    client: &reqwest::Client,
    engine: &EngineDescriptor,
    payload: &EnginePayload,
    timeout: Duration,
) -> EngineReply {
    let response = match client
        .post(engine.url.clone())
        .timeout(timeout)
        .json(payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => return EngineReply::from_transport_error(&err),
    };

    let status = response.status();
    match response.text().await {
        Ok(body) => EngineReply::classify(status.as_u16(), &body),
        Err(err) => EngineReply::from_transport_error(&err),
    }
}
