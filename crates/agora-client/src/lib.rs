#![doc = include_str!("../README.md")]

pub mod api;
mod client;
mod config;
mod error;
mod feed;
mod gateway;
mod reaction;
mod session;

pub use client::AgoraClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use feed::{PostFeedStore, RefreshTicket, RemovalUndo};
pub use gateway::{
    ApiRequest, FormPart, HttpTransport, Method, OutboundRequest, RawResponse, RequestBody,
    RequestGateway, Transport,
};
pub use reaction::{ReactionDelta, ReactionEngine, ReactionOutcome};
pub use session::{
    AuthSession, FileSessionStore, MemorySessionStore, NavigationPort, Screen, ScreenTracker,
    SessionStore, SessionStoreError, SESSION_FILE,
};

pub use agora_types::*;
