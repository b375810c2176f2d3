#![cfg(target_arch = "wasm32")]

//! Browser Cache API backend for the offline policy, driven from the service
//! worker script.

use js_sys::{Array, Promise};
use std::cell::RefCell;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Cache, Request, Response, ServiceWorkerGlobalScope};

use crate::{CacheBackend, OfflineCache, OfflineError};

thread_local! {
    static OFFLINE_CACHE: RefCell<OfflineCache> = RefCell::new(OfflineCache::default());
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub struct BrowserCache {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserCache {
    pub fn current() -> Result<Self, JsValue> {
        let scope = js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| JsValue::from_str("not running inside a service worker"))?;

        Ok(Self { scope })
    }

    async fn open(&self, name: &str) -> Result<Cache, OfflineError> {
        let open_error = |error: &JsValue| OfflineError::CacheOpen {
            name: name.to_string(),
            message: describe(error),
        };

        let storage = self.scope.caches().map_err(|error| open_error(&error))?;
        let cache = JsFuture::from(storage.open(name))
            .await
            .map_err(|error| open_error(&error))?;

        cache.dyn_into::<Cache>().map_err(|error| open_error(&error))
    }

    async fn matched(promise: Promise, url: &str) -> Result<Option<Response>, OfflineError> {
        let lookup_error = |error: &JsValue| OfflineError::Lookup {
            url: url.to_string(),
            message: describe(error),
        };

        let value = JsFuture::from(promise)
            .await
            .map_err(|error| lookup_error(&error))?;

        if value.is_undefined() {
            return Ok(None);
        }

        value
            .dyn_into::<Response>()
            .map(Some)
            .map_err(|error| lookup_error(&error))
    }
}

impl CacheBackend for BrowserCache {
    type Request = Request;
    type Response = Response;

    fn request_url(&self, request: &Request) -> String {
        request.url()
    }

    async fn precache(&self, cache_name: &str, paths: &[String]) -> Result<(), OfflineError> {
        let cache = self.open(cache_name).await?;
        let requests: Array = paths.iter().map(|path| JsValue::from_str(path)).collect();

        JsFuture::from(cache.add_all_with_str_sequence(&requests))
            .await
            .map(|_| ())
            .map_err(|error| OfflineError::Precache {
                name: cache_name.to_string(),
                message: describe(&error),
            })
    }

    async fn lookup(
        &self,
        cache_name: &str,
        request: &Request,
    ) -> Result<Option<Response>, OfflineError> {
        let cache = self.open(cache_name).await?;
        Self::matched(cache.match_with_request(request), &request.url()).await
    }

    async fn lookup_path(
        &self,
        cache_name: &str,
        path: &str,
    ) -> Result<Option<Response>, OfflineError> {
        let cache = self.open(cache_name).await?;
        Self::matched(cache.match_with_str(path), path).await
    }

    async fn fetch(&self, request: &Request) -> Result<Response, OfflineError> {
        let url = request.url();

        gloo_net::http::Request::from(request.clone())
            .send()
            .await
            .map(Response::from)
            .map_err(|error| OfflineError::Fetch {
                url,
                message: error.to_string(),
            })
    }
}

fn to_js_error(error: OfflineError) -> JsValue {
    log::error!("{}", error);
    JsValue::from_str(&error.to_string())
}

pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Handles the worker `install` event. The returned promise settles once the
/// assets are cached.
pub fn install() -> Promise {
    future_to_promise(async move {
        let backend = BrowserCache::current()?;
        let mut cache = OFFLINE_CACHE.with(|cell| cell.borrow().clone());

        cache.install(&backend).await.map_err(to_js_error)?;
        OFFLINE_CACHE.with(|cell| *cell.borrow_mut() = cache);

        Ok(JsValue::UNDEFINED)
    })
}

/// Handles a worker `fetch` event, resolving to the `Response` to serve.
pub fn respond(request: Request) -> Promise {
    future_to_promise(async move {
        let backend = BrowserCache::current()?;
        let cache = OFFLINE_CACHE.with(|cell| cell.borrow().clone());

        let served = cache
            .respond(&backend, &request)
            .await
            .map_err(to_js_error)?;

        Ok(served.into_response().into())
    })
}
