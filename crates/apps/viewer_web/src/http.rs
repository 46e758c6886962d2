use formats::{FetchError, Source};
use gloo_net::http::Request;
use web_sys::RequestCache;

/// Fetches datasets over HTTP, bypassing the browser cache so a freshly
/// published forecast is picked up on reload.
#[derive(Debug, Default, Copy, Clone)]
pub struct HttpSource;

impl Source for HttpSource {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let resp = Request::get(location)
            .cache(RequestCache::NoStore)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if !resp.ok() {
            return Err(FetchError::Status(resp.status()));
        }
        resp.text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}
