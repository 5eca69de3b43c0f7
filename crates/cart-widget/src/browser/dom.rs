//! `web-sys` backed document access.

use std::cell::RefCell;
use std::collections::HashMap;

use cart_core::ControlId;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::host::CartDom;

/// Document adapter handing out stable handles for looked-up elements.
///
/// Handles are `#<id>` for id lookups and `<selector>[<index>]` for
/// selector matches.
#[derive(Debug)]
pub struct WebDom {
    document: Document,
    registry: RefCell<HashMap<ControlId, Element>>,
}

impl WebDom {
    /// Wrap a document.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            registry: RefCell::new(HashMap::new()),
        }
    }

    /// The element behind a handle.
    pub fn element(&self, control: &ControlId) -> Option<Element> {
        self.registry.borrow().get(control).cloned()
    }

    fn register(&self, key: String, element: Element) -> ControlId {
        let control = ControlId::new(key);
        self.registry.borrow_mut().insert(control.clone(), element);
        control
    }
}

impl CartDom for WebDom {
    fn element_by_id(&self, id: &str) -> Option<ControlId> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.register(format!("#{}", id), element))
    }

    fn query_all(&self, selector: &str) -> Vec<ControlId> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| {
                let element = nodes.get(i)?.dyn_into::<Element>().ok()?;
                Some(self.register(format!("{}[{}]", selector, i), element))
            })
            .collect()
    }

    fn attribute(&self, element: &ControlId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn value(&self, element: &ControlId) -> Option<String> {
        let element = self.element(element)?;
        element
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
    }

    fn inner_html(&self, element: &ControlId) -> String {
        self.element(element)
            .map(|e| e.inner_html())
            .unwrap_or_default()
    }

    fn set_inner_html(&self, element: &ControlId, html: &str) {
        if let Some(e) = self.element(element) {
            e.set_inner_html(html);
        }
    }

    fn set_text(&self, element: &ControlId, text: &str) {
        if let Some(e) = self.element(element) {
            e.set_text_content(Some(text));
        }
    }

    fn has_class(&self, element: &ControlId, class: &str) -> bool {
        self.element(element)
            .map(|e| e.class_list().contains(class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: &ControlId, class: &str) {
        if let Some(e) = self.element(element) {
            // Only fails on empty or whitespace class names.
            let _ = e.class_list().add_1(class);
        }
    }

    fn remove_class(&self, element: &ControlId, class: &str) {
        if let Some(e) = self.element(element) {
            let _ = e.class_list().remove_1(class);
        }
    }
}
