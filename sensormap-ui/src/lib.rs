pub mod components;
pub mod config;
pub mod format;
pub mod markers;
pub mod model;
pub mod simulation;

use wasm_bindgen::prelude::*;
use yew::prelude::*;
use yew::Renderer;

use components::Dashboard;

#[function_component(App)]
fn app() -> Html {
    html! {
        <Dashboard />
    }
}

/// This is invoked automatically in the browser when the module loads
#[wasm_bindgen(start)]
pub fn run_app() {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("root"));

    match root {
        Some(root) => {
            Renderer::<App>::with_root(root).render();
        }
        None => {
            Renderer::<App>::new().render();
        }
    }
}
