use hyper::{Body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::error::TransportError;

pub type HttpsClient = Client<HttpsConnector<hyper::client::HttpConnector>>;

pub fn build_client() -> HttpsClient {
    let https = HttpsConnector::new();
    // One request per iteration: a request canceled on a stale pooled
    // connection is reported, not resent.
    Client::builder()
        .retry_canceled_requests(false)
        .build::<_, Body>(https)
}

pub fn to_uri(url: &Url) -> Result<Uri, TransportError> {
    url.as_str()
        .parse::<Uri>()
        .map_err(|e| TransportError::InvalidUri(e.to_string()))
}

/// Plain GET, no body, no extra headers. The response body is read to the
/// end before returning so the connection goes back to the pool whatever
/// the status was.
pub async fn send_get(
    client: &HttpsClient,
    uri: &Uri,
    max_duration: Option<Duration>,
) -> Result<StatusCode, TransportError> {
    let exchange = async {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.clone())
            .body(Body::empty())
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let response = client.request(request).await?;
        let status = response.status();
        hyper::body::to_bytes(response.into_body()).await?;
        Ok::<_, TransportError>(status)
    };

    match max_duration {
        Some(limit) => timeout(limit, exchange)
            .await
            .unwrap_or(Err(TransportError::Timeout)),
        None => exchange.await,
    }
}
