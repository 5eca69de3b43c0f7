//! Browser bindings and the wasm entry point.
//!
//! `start` runs when the module loads, waits for `DOMContentLoaded` if the
//! document is still parsing, then builds one controller, runs `init` and
//! attaches listeners to the discovered controls.

mod dom;
mod window;

pub use dom::WebDom;
pub use window::{WindowNavigator, WindowNotifier, WindowTimer};

use std::rc::Rc;

use cart_core::{ControlId, WidgetConfig};
use cart_data::{BrowserTransport, FetchClient};
use cart_observability::StructuredLogger;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::controller::{CartWidgetController, WidgetBindings};
use crate::host::WidgetHost;

/// Id of an optional `<script type="application/json">` holding a
/// `WidgetConfig` document.
pub const CONFIG_ELEMENT_ID: &str = "cart-widget-config";

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))?
        .as_string()
        .unwrap_or_default();

    if ready_state == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = launch() {
                web_sys::console::error_1(&err);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        Ok(())
    } else {
        launch()
    }
}

fn launch() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = read_config(&document);
    let dom = Rc::new(WebDom::new(document));
    let host = WidgetHost {
        dom: dom.clone(),
        notifier: Rc::new(WindowNotifier::new(window.clone())),
        timer: Rc::new(WindowTimer::new(window.clone())),
        navigator: Rc::new(WindowNavigator::new(window)),
    };
    let client = FetchClient::new(BrowserTransport::new())
        .with_default_header("X-Requested-With", "XMLHttpRequest");
    let controller = Rc::new(CartWidgetController::new(config, client, host));

    spawn_local(async move {
        let bindings = controller.init().await;
        if let Err(err) = attach(&controller, &dom, bindings) {
            web_sys::console::error_1(&err);
        }
    });

    Ok(())
}

fn read_config(document: &Document) -> WidgetConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|e| e.text_content())
    else {
        return WidgetConfig::default();
    };

    WidgetConfig::from_json(&raw).unwrap_or_else(|err| {
        StructuredLogger::new("cart_widget.browser")
            .warn_builder("invalid widget config; using defaults")
            .field("error", err.to_string())
            .emit();
        WidgetConfig::default()
    })
}

fn attach(
    controller: &Rc<CartWidgetController>,
    dom: &WebDom,
    bindings: WidgetBindings,
) -> Result<(), JsValue> {
    for binding in bindings.add {
        let controller = Rc::clone(controller);
        let control = binding.control.clone();
        listen(dom, &control, "click", move || {
            let controller = Rc::clone(&controller);
            let binding = binding.clone();
            spawn_local(async move {
                controller.add_item(&binding.control, &binding.item, 1).await;
            });
        })?;
    }

    if let Some(clear) = bindings.clear {
        let controller = Rc::clone(controller);
        let control = clear.clone();
        listen(dom, &control, "click", move || {
            let controller = Rc::clone(&controller);
            let clear = clear.clone();
            spawn_local(async move {
                controller.clear_cart(&clear).await;
            });
        })?;
    }

    for binding in bindings.remove {
        let controller = Rc::clone(controller);
        let control = binding.control.clone();
        listen(dom, &control, "click", move || {
            let controller = Rc::clone(&controller);
            let binding = binding.clone();
            spawn_local(async move {
                controller.remove_item(&binding.control, &binding.item).await;
            });
        })?;
    }

    for binding in bindings.quantity {
        let controller = Rc::clone(controller);
        let control = binding.control.clone();
        listen(dom, &control, "change", move || {
            let controller = Rc::clone(&controller);
            let binding = binding.clone();
            spawn_local(async move {
                controller.set_quantity_from_input(&binding).await;
            });
        })?;
    }

    Ok(())
}

fn listen(
    dom: &WebDom,
    control: &ControlId,
    event: &str,
    handler: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let Some(element) = dom.element(control) else {
        return Ok(());
    };
    let closure = Closure::<dyn FnMut()>::new(handler);
    element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}
