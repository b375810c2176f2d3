#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    quizdeck::wasm::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {}
