use crate::enums::HttpMethod;
use hashbrown::HashMap as FastHashMap;
use std::net::IpAddr;

/// Normalized inbound request as seen by the middleware pipeline. Body
/// parsing (JSON/form/multipart) is a plugin's job; this crate only carries
/// raw bytes.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub headers: FastHashMap<String, String>,
    pub body: Vec<u8>,
    pub remote_addr: Option<IpAddr>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: FastHashMap::new(),
            body: Vec::new(),
            remote_addr: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }
}
