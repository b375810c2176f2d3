//! Cache-first asset policy used by the service worker.
//!
//! The policy is written against [`CacheBackend`] so it can run against the
//! browser Cache API in the worker and against an in-memory store in tests.

pub const DEFAULT_CACHE_NAME: &str = "quizdeck-cache";
pub const DEFAULT_OFFLINE_PAGE: &str = "/offline.html";

/// Fixed list of assets stored at install time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheManifest {
    pub cache_name: String,
    pub precache: Vec<String>,
    /// Document served when an uncached request cannot reach the network.
    pub offline_page: String,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            precache: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/style.css".to_string(),
                "/quizdeck.js".to_string(),
                "/quizdeck_bg.wasm".to_string(),
                DEFAULT_OFFLINE_PAGE.to_string(),
            ],
            offline_page: DEFAULT_OFFLINE_PAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Active,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OfflineError {
    #[error("failed to open cache {name}: {message}")]
    CacheOpen { name: String, message: String },
    #[error("failed to precache assets into {name}: {message}")]
    Precache { name: String, message: String },
    #[error("failed to look up {url} in cache: {message}")]
    Lookup { url: String, message: String },
    #[error("network request for {url} failed: {message}")]
    Fetch { url: String, message: String },
    #[error("{url} is not cached, unreachable, and no offline page is available")]
    Unavailable { url: String },
}

/// Storage and network primitives the offline policy is built on.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    type Request;
    type Response;

    fn request_url(&self, request: &Self::Request) -> String;

    /// Opens `cache_name` and stores every path in it, failing as a whole.
    async fn precache(&self, cache_name: &str, paths: &[String]) -> Result<(), OfflineError>;

    async fn lookup(
        &self,
        cache_name: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, OfflineError>;

    async fn lookup_path(
        &self,
        cache_name: &str,
        path: &str,
    ) -> Result<Option<Self::Response>, OfflineError>;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, OfflineError>;
}

/// Where a response came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served<T> {
    Cache(T),
    Network(T),
    Fallback(T),
}

impl<T> Served<T> {
    pub fn into_response(self) -> T {
        match self {
            Self::Cache(response) | Self::Network(response) | Self::Fallback(response) => {
                response
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineCache {
    manifest: CacheManifest,
    state: WorkerState,
}

impl OfflineCache {
    pub fn new(manifest: CacheManifest) -> Self {
        Self {
            manifest,
            state: WorkerState::Installing,
        }
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Stores the manifest's assets and marks the worker active.
    pub async fn install<B: CacheBackend>(&mut self, backend: &B) -> Result<(), OfflineError> {
        backend
            .precache(&self.manifest.cache_name, &self.manifest.precache)
            .await?;

        self.state = WorkerState::Active;
        log::info!(
            "cached {} assets into {}",
            self.manifest.precache.len(),
            self.manifest.cache_name
        );
        Ok(())
    }

    /// Serves `request` from the cache, then the network, then the offline page.
    pub async fn respond<B: CacheBackend>(
        &self,
        backend: &B,
        request: &B::Request,
    ) -> Result<Served<B::Response>, OfflineError> {
        let cache_name = &self.manifest.cache_name;

        match backend.lookup(cache_name, request).await {
            Ok(Some(response)) => return Ok(Served::Cache(response)),
            Ok(None) => {}
            Err(error) => log::warn!("{}", error),
        }

        let fetch_error = match backend.fetch(request).await {
            Ok(response) => return Ok(Served::Network(response)),
            Err(error) => error,
        };

        let url = backend.request_url(request);
        log::warn!("{}; serving {}", fetch_error, self.manifest.offline_page);

        match backend
            .lookup_path(cache_name, &self.manifest.offline_page)
            .await
        {
            Ok(Some(response)) => Ok(Served::Fallback(response)),
            Ok(None) => Err(OfflineError::Unavailable { url }),
            Err(error) => {
                log::warn!("{}", error);
                Err(OfflineError::Unavailable { url })
            }
        }
    }
}

impl Default for OfflineCache {
    fn default() -> Self {
        Self::new(CacheManifest::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryBackend {
        network: HashMap<String, String>,
        caches: RefCell<HashMap<String, HashMap<String, String>>>,
    }

    impl MemoryBackend {
        fn online(paths: &[(&str, &str)]) -> Self {
            Self {
                network: paths
                    .iter()
                    .map(|(path, body)| (path.to_string(), body.to_string()))
                    .collect(),
                caches: RefCell::new(HashMap::new()),
            }
        }

        fn go_offline(&mut self) {
            self.network.clear();
        }
    }

    impl CacheBackend for MemoryBackend {
        type Request = String;
        type Response = String;

        fn request_url(&self, request: &String) -> String {
            request.clone()
        }

        async fn precache(&self, cache_name: &str, paths: &[String]) -> Result<(), OfflineError> {
            let mut entries = HashMap::new();
            for path in paths {
                let body = self.network.get(path).ok_or_else(|| OfflineError::Precache {
                    name: cache_name.to_string(),
                    message: format!("{} not found", path),
                })?;
                entries.insert(path.clone(), body.clone());
            }

            self.caches
                .borrow_mut()
                .entry(cache_name.to_string())
                .or_default()
                .extend(entries);
            Ok(())
        }

        async fn lookup(
            &self,
            cache_name: &str,
            request: &String,
        ) -> Result<Option<String>, OfflineError> {
            self.lookup_path(cache_name, request).await
        }

        async fn lookup_path(
            &self,
            cache_name: &str,
            path: &str,
        ) -> Result<Option<String>, OfflineError> {
            Ok(self
                .caches
                .borrow()
                .get(cache_name)
                .and_then(|cache| cache.get(path).cloned()))
        }

        async fn fetch(&self, request: &String) -> Result<String, OfflineError> {
            self.network
                .get(request)
                .cloned()
                .ok_or_else(|| OfflineError::Fetch {
                    url: request.clone(),
                    message: "offline".to_string(),
                })
        }
    }

    fn small_manifest() -> CacheManifest {
        CacheManifest {
            cache_name: "test-cache".to_string(),
            precache: vec!["/".to_string(), "/offline.html".to_string()],
            offline_page: "/offline.html".to_string(),
        }
    }

    #[test]
    fn install_moves_to_active() {
        let backend = MemoryBackend::online(&[("/", "home"), ("/offline.html", "offline")]);
        let mut cache = OfflineCache::new(small_manifest());
        assert_eq!(cache.state(), WorkerState::Installing);

        block_on(cache.install(&backend)).expect("install should succeed");

        assert_eq!(cache.state(), WorkerState::Active);
    }

    #[test]
    fn failed_install_stays_installing() {
        let backend = MemoryBackend::online(&[("/", "home")]);
        let mut cache = OfflineCache::new(small_manifest());

        let error = block_on(cache.install(&backend)).expect_err("missing asset should fail");

        assert!(matches!(error, OfflineError::Precache { .. }));
        assert_eq!(cache.state(), WorkerState::Installing);
        assert!(backend.caches.borrow().get("test-cache").is_none());
    }

    #[test]
    fn cached_assets_win_over_network() {
        let mut backend = MemoryBackend::online(&[("/", "home"), ("/offline.html", "offline")]);
        let mut cache = OfflineCache::new(small_manifest());
        block_on(cache.install(&backend)).expect("install should succeed");
        backend.network.insert("/".to_string(), "newer home".to_string());

        let served = block_on(cache.respond(&backend, &"/".to_string())).expect("should serve");

        assert_eq!(served, Served::Cache("home".to_string()));
    }

    #[test]
    fn uncached_assets_come_from_network() {
        let mut backend = MemoryBackend::online(&[("/", "home"), ("/offline.html", "offline")]);
        let mut cache = OfflineCache::new(small_manifest());
        block_on(cache.install(&backend)).expect("install should succeed");
        backend
            .network
            .insert("/extra.png".to_string(), "png".to_string());

        let served =
            block_on(cache.respond(&backend, &"/extra.png".to_string())).expect("should serve");

        assert_eq!(served, Served::Network("png".to_string()));
    }

    #[test]
    fn unreachable_assets_fall_back_to_offline_page() {
        let mut backend = MemoryBackend::online(&[("/", "home"), ("/offline.html", "offline")]);
        let mut cache = OfflineCache::new(small_manifest());
        block_on(cache.install(&backend)).expect("install should succeed");
        backend.go_offline();

        let served =
            block_on(cache.respond(&backend, &"/missing.js".to_string())).expect("should serve");

        assert_eq!(served, Served::Fallback("offline".to_string()));
        assert_eq!(served.into_response(), "offline");
    }

    #[test]
    fn reports_unavailable_without_offline_page() {
        let backend = MemoryBackend::default();
        let cache = OfflineCache::new(small_manifest());

        let error = block_on(cache.respond(&backend, &"/missing.js".to_string()))
            .expect_err("nothing can serve the request");

        assert_eq!(
            error,
            OfflineError::Unavailable {
                url: "/missing.js".to_string()
            }
        );
    }

    #[test]
    fn default_manifest_caches_offline_page() {
        let manifest = CacheManifest::default();

        assert!(manifest.precache.contains(&manifest.offline_page));
        assert!(manifest.precache.contains(&"/".to_string()));
    }
}
