use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
    /// Response headers (lowercased header names). Multiple values are joined with ", ".
    pub headers: Vec<(String, String)>,
}

/// Top-level shape of a JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// A JSON array with this many elements.
    List(usize),
    Object,
    /// Any other JSON value, or a body that is not JSON at all.
    Other,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> super::Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn json_shape(&self) -> BodyShape {
        match self.json::<serde_json::Value>() {
            Ok(serde_json::Value::Array(items)) => BodyShape::List(items.len()),
            Ok(serde_json::Value::Object(_)) => BodyShape::Object,
            _ => BodyShape::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        Self::get_owned(url.to_string())
    }

    pub fn get_owned(url: String) -> Self {
        Self {
            method: http::Method::GET,
            url,
            headers: Vec::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    pub fn post(url: &str, body: Bytes) -> Self {
        Self {
            method: http::Method::POST,
            url: url.to_string(),
            headers: Vec::new(),
            body,
            timeout: None,
        }
    }

    /// POST with `value` serialized as the JSON body.
    pub fn post_json<T: Serialize + ?Sized>(url: &str, value: &T) -> super::Result<Self> {
        let body = serde_json::to_vec(value)?;
        let mut req = Self::post(url, Bytes::from(body));
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        Ok(req)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
