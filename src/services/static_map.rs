use crate::core::constants::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::core::view::MapViewState;
use crate::services::client::HTTP_CLIENT;
use crate::{MapError, Result};

const DEFAULT_ENDPOINT: &str = "https://static-maps.yandex.ru/1.x/";
const MAX_ATTEMPTS: usize = 2;

/// Builds static-map requests for a view state and fetches the rendered
/// image. A non-success status is reported as a recoverable
/// [`MapError::Service`] so the app can keep its last good image and offer a
/// retry instead of dying.
pub struct StaticMapSource {
    endpoint: String,
}

impl StaticMapSource {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Points the source at a different renderer, e.g. a local stub.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Request parameters for the current view. The `pt` marker parameter is
    /// present only when the view has a pointer.
    pub fn params(&self, view: &MapViewState) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ll", view.center.to_query()),
            ("l", view.style.layer_code().to_string()),
            ("z", view.zoom.to_string()),
            ("size", format!("{},{}", VIEWPORT_WIDTH, VIEWPORT_HEIGHT)),
        ];
        if let Some(pointer) = view.pointer {
            params.push(("pt", pointer.to_query()));
        }
        params
    }

    /// Fetches the rendered map image as PNG bytes, retrying once on failure
    /// before giving up.
    pub fn fetch(&self, view: &MapViewState) -> Result<Vec<u8>> {
        let params = self.params(view);
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            log::debug!("fetch map image attempt {} ({:?})", attempt, view.center);
            match self.fetch_once(&params) {
                Ok(bytes) => {
                    log::info!("downloaded map image ({} bytes)", bytes.len());
                    return Ok(bytes);
                }
                Err(e) => {
                    log::warn!("map image fetch failed on attempt {}: {}", attempt, e);
                    if attempt < MAX_ATTEMPTS {
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                    last_err = Some(e);
                }
            }
        }

        log::error!("giving up on map image fetch");
        Err(last_err.unwrap_or(MapError::Service {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }))
    }

    fn fetch_once(&self, params: &[(&'static str, String)]) -> Result<Vec<u8>> {
        let resp = HTTP_CLIENT.get(&self.endpoint).query(params).send()?;
        if !resp.status().is_success() {
            return Err(MapError::Service {
                status: resp.status(),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }
}

impl Default for StaticMapSource {
    fn default() -> Self {
        Self::new()
    }
}
