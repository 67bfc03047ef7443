//! TLS connector plumbing for [`crate::HyperClient`].

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

/// Build the connector every `HyperClient` dispatches through.
///
/// rustls with the webpki (Mozilla) root store, no client certificates.
/// Plain-HTTP URLs are allowed so `Fetch` can talk to local servers;
/// HTTPS negotiates HTTP/1.1 or HTTP/2 via ALPN.
#[must_use]
pub fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}
