//! Service worker module. `public/service-worker.js` loads this build with
//! `importScripts` and forwards its `install` and `fetch` events to the
//! exported handlers below.

#[cfg(target_arch = "wasm32")]
use js_sys::Promise;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;
#[cfg(target_arch = "wasm32")]
use web_sys::Request;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn handle_install() -> Promise {
    quizdeck::worker::install()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn handle_fetch(request: Request) -> Promise {
    quizdeck::worker::respond(request)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    quizdeck::worker::init_logging();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {}
