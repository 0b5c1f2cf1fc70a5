use crate::Result;

/// Anything that can download the bytes behind a tile URL.
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[cfg(feature = "net")]
pub use http::HttpTileFetcher;

#[cfg(feature = "net")]
mod http {
    use super::TileFetcher;
    use crate::{MapError, Result};
    use once_cell::sync::Lazy;
    use reqwest::blocking::Client;

    /// Shared blocking HTTP client with a custom User-Agent so that public tile
    /// servers don't reject the request. Building the client once avoids the
    /// cost of TLS and connection pool setup for every tile.
    static HTTP_CLIENT: Lazy<std::result::Result<Client, String>> = Lazy::new(|| {
        Client::builder()
            .user_agent(concat!("itinerary-map/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())
    });

    /// Fetches tiles over HTTP(S) with the shared blocking client.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct HttpTileFetcher;

    impl TileFetcher for HttpTileFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            let client = HTTP_CLIENT
                .as_ref()
                .map_err(|e| MapError::Precache(format!("http client unavailable: {e}")))?;
            let resp = client.get(url).send()?;
            if !resp.status().is_success() {
                return Err(MapError::Precache(format!("HTTP {} for {}", resp.status(), url)));
            }
            Ok(resp.bytes()?.to_vec())
        }
    }
}
