//! # PAC Test Core
//!
//! Core library for the PAC test server: it stores submitted Proxy-Auto-Config
//! scripts and asks a set of independent evaluation engines what each of them
//! would do with a script.
//!
//! ## Overview
//!
//! - **PAC store** ([`pac::PacStore`]): a capacity-bounded, uid-addressed FIFO
//!   cache shared by the API handlers and the orchestrator
//! - **Engine registry** ([`engine::EngineRegistry`]): the immutable list of
//!   engines configured at startup
//! - **Orchestrator** ([`eval::Orchestrator`]): fans one evaluation out to every
//!   engine concurrently and folds the replies into an [`eval::EvalResponse`]
//! - **Validation** ([`validation`]): syntactic checks on hosts, source IPs and
//!   PAC content that run before anything is evaluated
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use pactest_core::{
//!     engine::{EngineDescriptor, EngineFlag, EngineRegistry},
//!     eval::{EvalRequest, Orchestrator, OrchestratorConfig},
//!     pac::{Pac, PacStore},
//! };
//!
//! async fn evaluate_once() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PacStore::new(100);
//!     let pac = Pac::new("function FindProxyForURL(u, h) { return 'DIRECT'; }");
//!     store.put(pac.clone());
//!
//!     let registry = EngineRegistry::new(vec![EngineDescriptor::new(
//!         "v8",
//!         "http://127.0.0.1:8081/".parse()?,
//!         [EngineFlag::Evaluation, EngineFlag::SrcIp],
//!     )])?;
//!     let orchestrator = Orchestrator::new(
//!         registry,
//!         OrchestratorConfig {
//!             engine_timeout: Duration::from_secs(5),
//!             pac_base_url: "http://127.0.0.1:8080/".parse()?,
//!         },
//!     )?;
//!
//!     let response = orchestrator
//!         .evaluate(EvalRequest::new(pac, "example.com", "10.0.0.1"))
//!         .await;
//!     println!("aggregate status: {:?}", response.status);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Route definitions shared by the server and its clients
pub mod api;

/// Evaluation engines: descriptors, registry and wire contract
pub mod engine;

/// Error types
pub mod error;

/// Evaluation requests, results and the fan-out orchestrator
pub mod eval;

/// PAC records and the bounded PAC store
pub mod pac;

/// Syntactic validation of evaluation inputs
pub mod validation;

pub use error::{PacError, Result};
