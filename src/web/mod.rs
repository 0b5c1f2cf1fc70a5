//! Browser bindings for the interaction controller.

pub mod dom;

pub use dom::DomHost;

use crate::core::config::MapConfig;
use crate::interaction::host::{attach, Teardown};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Live pan/zoom on the page's route map, exposed to JavaScript
#[wasm_bindgen]
pub struct MapInteraction {
    inner: Teardown,
}

#[wasm_bindgen]
impl MapInteraction {
    /// Removes every listener; safe to call more than once
    #[wasm_bindgen]
    pub fn teardown(&mut self) {
        self.inner.teardown();
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.state().scale
    }

    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Wires pan and zoom onto the map currently in the document.
///
/// Returns `undefined` when the page holds no map surface.
#[wasm_bindgen(js_name = initMapInteraction)]
pub fn init_map_interaction() -> Option<MapInteraction> {
    let host = DomHost::from_window()?;
    attach(Rc::new(host), &MapConfig::default()).map(|inner| MapInteraction { inner })
}
