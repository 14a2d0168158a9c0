// clashscope-api: Async Rust client for the cloud clash-detection REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod requests;
pub mod transport;

pub use auth::{Authorization, StaticToken, TokenProvider};
pub use client::{ClashClient, DEFAULT_ACCEPT, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{
    ClashRecord, ClashResult, Link, NamedEntry, PageLinks, Point3d, Run, RunDetail, RunList,
    RunStarted, SuppressionRule, SuppressionRuleList, Test, TestList,
};
pub use requests::{ElementSet, RunRequest, TestDefinition};
pub use transport::{TlsMode, TransportConfig};
