//! Typed IPC message enum exchanged between the supervisor and its workers,
//! plus the length-prefixed framing used to carry it over a worker's piped
//! stdin/stdout. Encryption, when enabled, is a transparent seal/open wrapper
//! around the serialized payload using the same AES-256-GCM envelope as the
//! cache tier.

use super::error::{ClusterError, ClusterResult};
use crate::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcMessage {
    Config { seq: u64, payload: Value },
    Broadcast { seq: u64, payload: Value },
    Heartbeat { seq: u64, worker_id: u32, load: f64 },
    Shutdown { seq: u64 },
    Metrics { seq: u64, payload: Value },
}

impl IpcMessage {
    pub fn sequence(&self) -> u64 {
        match self {
            IpcMessage::Config { seq, .. }
            | IpcMessage::Broadcast { seq, .. }
            | IpcMessage::Heartbeat { seq, .. }
            | IpcMessage::Shutdown { seq }
            | IpcMessage::Metrics { seq, .. } => *seq,
        }
    }
}

/// Wraps the existing AES-256-GCM envelope from the cache module. Reused
/// rather than reimplemented: the data model's requirements for "IV stored
/// alongside ciphertext" are identical in both places.
pub struct IpcCipher {
    envelope: crate::cache::CipherEnvelope,
}

impl IpcCipher {
    pub fn new(master_key: &[u8; 32]) -> Self {
        Self {
            envelope: crate::cache::CipherEnvelope::new(master_key),
        }
    }

    pub fn seal(&self, message: &IpcMessage) -> ClusterResult<Vec<u8>> {
        let plaintext = serde_json::to_vec(message).map_err(|e| ClusterError::Ipc(e.to_string()))?;
        self.envelope.seal(&plaintext).map_err(|e| ClusterError::Ipc(e.to_string()))
    }

    pub fn open(&self, envelope: &[u8]) -> ClusterResult<IpcMessage> {
        let plaintext = self
            .envelope
            .open(envelope)
            .map_err(|e| ClusterError::Ipc(e.to_string()))?;
        serde_json::from_slice(&plaintext).map_err(|e| ClusterError::Ipc(e.to_string()))
    }
}

const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Writes one length-prefixed frame: a 4-byte little-endian length followed
/// by the sealed (or, with no cipher, plain JSON) payload bytes. Framing is
/// needed regardless of encryption since stdout/stdin are raw byte streams
/// with no message boundaries of their own.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &IpcMessage,
    cipher: Option<&IpcCipher>,
) -> ClusterResult<()> {
    let payload = match cipher {
        Some(cipher) => cipher.seal(message)?,
        None => serde_json::to_vec(message).map_err(|e| ClusterError::Ipc(e.to_string()))?,
    };
    let len = u32::try_from(payload.len()).map_err(|_| ClusterError::Ipc("ipc payload too large".into()))?;
    writer.write_all(&len.to_le_bytes()).await.map_err(|e| ClusterError::Ipc(e.to_string()))?;
    writer.write_all(&payload).await.map_err(|e| ClusterError::Ipc(e.to_string()))?;
    writer.flush().await.map_err(|e| ClusterError::Ipc(e.to_string()))?;
    Ok(())
}

/// Reads one length-prefixed frame. Returns `Ok(None)` on a clean EOF at the
/// frame boundary (the peer closed its side); any other I/O failure, or a
/// partial frame cut off mid-payload, is a real `ClusterError::Ipc`.
pub async fn try_read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
    cipher: Option<&IpcCipher>,
) -> ClusterResult<Option<IpcMessage>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(ClusterError::Ipc(err.to_string())),
    }
    let len = u32::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(ClusterError::Ipc(format!("ipc frame of {len} bytes exceeds max")));
    }
    let mut payload = vec![0u8; len as usize];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| ClusterError::Ipc(e.to_string()))?;

    let message = match cipher {
        Some(cipher) => cipher.open(&payload)?,
        None => serde_json::from_slice(&payload).map_err(|e| ClusterError::Ipc(e.to_string()))?,
    };
    Ok(Some(message))
}

/// Configuration pushed to a worker at spawn time, serialized into the
/// `XYPRISS_SERVER_CONFIG` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerBootConfig {
    pub worker_id: u32,
    pub port: u16,
    pub cache: Option<CacheConfig>,
    pub ipc_key: Option<[u8; 32]>,
}

/// Worker-side counterpart to [`super::supervisor::ClusterSupervisor`]'s IPC
/// handling. The library has no binary entrypoint of its own, so a consuming
/// application's worker process constructs this over its inherited stdin and
/// stdout and drives it from its own event loop.
pub struct WorkerIpcClient<R, W> {
    reader: R,
    writer: W,
    cipher: Option<IpcCipher>,
    seq: u64,
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> WorkerIpcClient<R, W> {
    pub fn new(reader: R, writer: W, ipc_key: Option<[u8; 32]>) -> Self {
        Self {
            reader,
            writer,
            cipher: ipc_key.map(|key| IpcCipher::new(&key)),
            seq: 0,
        }
    }

    /// Sends one heartbeat carrying the worker's current connection load.
    pub async fn send_heartbeat(&mut self, worker_id: u32, load: f64) -> ClusterResult<()> {
        self.seq += 1;
        let message = IpcMessage::Heartbeat {
            seq: self.seq,
            worker_id,
            load,
        };
        write_message(&mut self.writer, &message, self.cipher.as_ref()).await
    }

    /// Blocks until the supervisor sends a message or closes the pipe.
    /// Returns `Ok(None)` on clean closure (the worker should begin its own
    /// shutdown if it hasn't already received an explicit `Shutdown`).
    pub async fn recv(&mut self) -> ClusterResult<Option<IpcMessage>> {
        try_read_message(&mut self.reader, self.cipher.as_ref()).await
    }
}
