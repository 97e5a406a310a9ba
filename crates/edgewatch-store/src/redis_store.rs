// redis_store.rs — RedisStore: StoreClient backed by a Redis server.
//
// Uses a ConnectionManager, which reconnects on its own after a dropped
// connection. The manager is a cheap handle around a shared multiplexed
// connection, so each call clones it to get the `&mut` the command API wants.

use async_trait::async_trait;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Value};

use crate::client::StoreClient;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Redis implementation of [`StoreClient`].
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    endpoint: String,
}

impl RedisStore {
    /// Open a connection described by `config`.
    ///
    /// Only the initial connect is bounded by `connect_timeout_ms`; later
    /// commands rely on the connection manager's own behaviour.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = config.endpoint();
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo {
                db: config.db,
                password: config.password.clone(),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info).map_err(|source| StoreError::Connect {
            endpoint: endpoint.clone(),
            source,
        })?;

        let timeout = config.connect_timeout();
        let conn = match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => {
                return Err(StoreError::Connect { endpoint, source });
            }
            Err(_) => return Err(StoreError::ConnectTimeout { endpoint, timeout }),
        };

        tracing::debug!(%endpoint, "redis connection established");
        Ok(Self { conn, endpoint })
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let reply = conn.req_packed_command(&redis::cmd("PING")).await?;
        match reply {
            Value::SimpleString(s) if s == "PONG" => Ok(()),
            other => Err(StoreError::UnexpectedPingReply(format!("{:?}", other))),
        }
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let receivers: i64 = conn.publish(topic, message).await?;
        tracing::debug!(topic, receivers, "published message");
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}
