use hashbrown::HashMap as FastHashMap;

/// Outbound response under construction. `committed` tracks whether headers
/// have been sent or the body ended -- once true, the pipeline skips all
/// remaining handlers (the short-circuit rule in the middleware contract).
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: FastHashMap<String, String>,
    pub body: Vec<u8>,
    committed: bool,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: 0,
            headers: FastHashMap::new(),
            body: Vec::new(),
            committed: false,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Writes a status + body and marks the response committed, short
    /// circuiting any handlers still queued behind this one.
    pub fn send(&mut self, status: u16, body: impl Into<Vec<u8>>) {
        self.status = status;
        self.body = body.into();
        self.committed = true;
    }

    pub fn send_json(&mut self, status: u16, body: &serde_json::Value) {
        self.set_header("content-type", "application/json");
        self.send(status, serde_json::to_vec(body).unwrap_or_default());
    }
}
