//! Redis-backed distributed cache tier. Uses `ConnectionManager` so transient
//! disconnects reconnect transparently instead of requiring the caller to
//! re-dial; a failed command here downgrades the hybrid cache to
//! memory-only for the duration of the outage.

use super::error::CacheResult;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

pub struct RedisTier {
    conn: ConnectionManager,
}

impl RedisTier {
    pub async fn connect(url: &str, db: i64) -> CacheResult<Self> {
        let client = Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        if db != 0 {
            redis::cmd("SELECT").arg(db).query_async(&mut conn).await?;
        }
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(Self { conn })
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    pub async fn get_with_ttl(&self, key: &str) -> CacheResult<Option<(Vec<u8>, Option<Duration>)>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        let Some(bytes) = value.filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        let ttl_secs: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await.unwrap_or(-1);
        let ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs.unsigned_abs()));
        Ok(Some((bytes, ttl)))
    }

    pub async fn set_ex(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    pub async fn delete_many(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(keys).await?;
        Ok(removed)
    }

    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    pub async fn clear_namespace(&self, pattern: &str) -> CacheResult<()> {
        let keys = self.scan_keys(pattern).await?;
        self.delete_many(&keys).await?;
        Ok(())
    }

    pub async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await?;
            cursor = next_cursor;
            keys.extend(batch);
            if cursor == 0 {
                break;
            }
        }
        Ok(keys)
    }

    pub async fn get_ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        let ttl_secs: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await?;
        Ok((ttl_secs > 0).then(|| Duration::from_secs(ttl_secs.unsigned_abs())))
    }

    pub async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let ok: bool = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(ok)
    }

    pub async fn sadd(&self, set_key: &str, member: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(set_key, member).await?;
        let _: () = conn.expire(set_key, ttl.as_secs() as i64).await?;
        Ok(())
    }

    pub async fn smembers(&self, set_key: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(set_key).await?;
        Ok(members)
    }

    pub async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}
