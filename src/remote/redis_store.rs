//! Redis client support for the remote adapter.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::cache::Ttl;
use crate::error::RemoteError;
use crate::remote::RemoteStore;

// PTTL replies for a missing key and for a key without expiry
const PTTL_MISSING: i64 = -2;
const PTTL_PERSISTENT: i64 = -1;

#[async_trait]
impl RemoteStore for MultiplexedConnection {
    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, RemoteError> {
        let mut conn = self.clone();
        let payload: Option<Vec<u8>> = conn.get(key).await?;
        Ok(payload)
    }

    async fn store(&self, key: &str, payload: Vec<u8>, ttl: Ttl) -> Result<(), RemoteError> {
        let mut conn = self.clone();
        match ttl {
            Ttl::Permanent => conn.set::<_, _, ()>(key, payload).await?,
            // PSETEX rejects 0, and a zero lifetime is already expired
            Ttl::Expires(ttl) if ttl.as_millis() == 0 => conn.del::<_, ()>(key).await?,
            Ttl::Expires(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                conn.pset_ex::<_, _, ()>(key, payload, millis).await?
            }
        }
        Ok(())
    }

    async fn remaining(&self, key: &str) -> Result<Option<Ttl>, RemoteError> {
        let mut conn = self.clone();
        let millis: i64 = conn.pttl(key).await?;
        Ok(match millis {
            PTTL_MISSING => None,
            PTTL_PERSISTENT => Some(Ttl::Permanent),
            millis => Some(Ttl::Expires(Duration::from_millis(millis.max(0) as u64))),
        })
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), RemoteError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.clone();
        conn.del::<_, ()>(keys).await?;
        Ok(())
    }
}
