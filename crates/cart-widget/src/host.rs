//! Host capabilities injected into the controller.
//!
//! The controller never touches a browser API directly. Each trait here is
//! implemented by the `browser` module on `wasm32` and by the fakes in
//! [`crate::testing`].

use std::rc::Rc;
use std::time::Duration;

use cart_core::ControlId;
use thiserror::Error;

/// Minimal DOM surface the widget needs.
///
/// Elements are addressed by opaque [`ControlId`] handles handed out by the
/// lookup methods.
pub trait CartDom {
    /// Find an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ControlId>;

    /// Find all elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ControlId>;

    /// Read an attribute.
    fn attribute(&self, element: &ControlId, name: &str) -> Option<String>;

    /// Read the current value of a form input.
    fn value(&self, element: &ControlId) -> Option<String>;

    /// Read the inner HTML.
    fn inner_html(&self, element: &ControlId) -> String;

    /// Replace the inner HTML.
    fn set_inner_html(&self, element: &ControlId, html: &str);

    /// Replace the content with plain text.
    fn set_text(&self, element: &ControlId, text: &str);

    /// Check for a class.
    fn has_class(&self, element: &ControlId, class: &str) -> bool;

    /// Add a class.
    fn add_class(&self, element: &ControlId, class: &str);

    /// Remove a class.
    fn remove_class(&self, element: &ControlId, class: &str);
}

/// Blocking user dialogs.
pub trait Notifier {
    /// Show a message and wait for acknowledgement.
    fn notify(&self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&self, message: &str) -> bool;
}

/// A timer could not schedule a callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Timer unavailable: {0}")]
pub struct TimerError(pub String);

/// Deferred callbacks.
pub trait Timer {
    /// Run `callback` once after `delay`.
    ///
    /// When the callback cannot be scheduled it runs immediately, before the
    /// error is returned, so whatever it releases is never leaked.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<(), TimerError>;
}

/// Page navigation.
pub trait Navigator {
    /// Reload the current page.
    fn reload(&self);
}

/// The set of capabilities a controller runs against.
#[derive(Clone)]
pub struct WidgetHost {
    /// Document access.
    pub dom: Rc<dyn CartDom>,
    /// Dialogs.
    pub notifier: Rc<dyn Notifier>,
    /// Timers.
    pub timer: Rc<dyn Timer>,
    /// Navigation.
    pub navigator: Rc<dyn Navigator>,
}

impl std::fmt::Debug for WidgetHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHost").finish_non_exhaustive()
    }
}
