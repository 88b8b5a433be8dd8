use bytes::Bytes;
use http_body_util::{BodyExt as _, Full};
use hyper::Request;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::collections::BTreeMap;
use std::time::Duration;

use super::util::{check_scheme, has_header, host_header_value};
use super::{Error, HttpRequest, HttpResponse, Result};

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        // The OS-level TCP connect timeout can be tens of seconds; an unreachable target
        // should show up as failed requests, not as a stalled worker.
        Self::new(Some(Duration::from_secs(3)))
    }
}

impl HttpClient {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        let mut http_connector = HttpConnector::new();
        http_connector.enforce_http(false);
        http_connector.set_connect_timeout(connect_timeout);

        let https_connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector);

        let inner = Client::builder(TokioExecutor::new()).build(https_connector);

        Self { inner }
    }

    /// Send `req` and read the whole response body.
    ///
    /// When `req.timeout` is set it bounds the entire exchange, body included.
    pub async fn request(&self, req: HttpRequest) -> Result<HttpResponse> {
        match req.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.exchange(req)).await {
                Ok(res) => res,
                Err(_) => Err(Error::Timeout(timeout)),
            },
            None => self.exchange(req).await,
        }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(HttpRequest::get(url)).await
    }

    async fn exchange(&self, req: HttpRequest) -> Result<HttpResponse> {
        let parsed = check_scheme(&req.url)?;

        let uri: hyper::Uri = req
            .url
            .parse()
            .map_err(|_| Error::InvalidUrl(req.url.clone()))?;

        let mut builder = Request::builder().method(req.method).uri(uri);

        if !has_header(&req.headers, "host")
            && let Some(host) = host_header_value(&parsed)
        {
            builder = builder.header(http::header::HOST, host);
        }
        if !req.body.is_empty() && !has_header(&req.headers, "content-length") {
            builder = builder.header(http::header::CONTENT_LENGTH, req.body.len());
        }

        for (k, v) in req.headers {
            let name = http::header::HeaderName::from_bytes(k.as_bytes())?;
            let value = http::header::HeaderValue::from_str(&v)?;
            builder = builder.header(name, value);
        }

        let req: Request<Full<Bytes>> = builder.body(Full::new(req.body))?;
        let res: hyper::Response<Incoming> = self.inner.request(req).await?;

        let (parts, body) = res.into_parts();
        let status = parts.status.as_u16();

        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in parts.headers.iter() {
            let key = name.as_str().to_ascii_lowercase();
            let v = String::from_utf8_lossy(value.as_bytes()).to_string();
            merged
                .entry(key)
                .and_modify(|cur| {
                    if !cur.is_empty() {
                        cur.push_str(", ");
                    }
                    cur.push_str(&v);
                })
                .or_insert(v);
        }

        let body = body.collect().await?.to_bytes();

        Ok(HttpResponse {
            status,
            body,
            headers: merged.into_iter().collect(),
        })
    }
}
