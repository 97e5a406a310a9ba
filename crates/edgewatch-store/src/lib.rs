//! # edgewatch-store
//!
//! Store client abstraction for edgewatch.
//!
//! The watcher only needs four things from the shared store: read a hash
//! field, write a hash field, publish a message, and answer a ping. Those
//! four operations make up the [`StoreClient`] trait so the watch loop can
//! run against Redis in production and against an in-process store in tests.
//!
//! ## Key components
//!
//! - [`StoreClient`] — the async capability trait consumed by the watcher
//! - [`RedisStore`] — Redis backend (HGET / HSET / PUBLISH / PING)
//! - [`MemoryStore`] — in-process backend with failure injection
//! - [`StoreConfig`] — connection settings for the Redis backend
//! - [`StoreError`] — errors surfaced by any backend

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod redis_store;

pub use client::StoreClient;
pub use config::StoreConfig;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
