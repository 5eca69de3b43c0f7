//! In-memory host capabilities (for development/testing).
//!
//! `FakeHost` wires a fake DOM, a recording notifier, a manual clock and a
//! recording navigator together; dialogs and reloads land in one shared
//! journal so tests can assert their order.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Duration;

use cart_core::ControlId;

use crate::host::{CartDom, Navigator, Notifier, Timer, TimerError, WidgetHost};

/// A user-visible host side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A notification was shown.
    Notify(String),
    /// A confirmation was asked.
    Confirm(String),
    /// The page was reloaded.
    Reload,
}

type Journal = Rc<RefCell<Vec<HostEvent>>>;

/// An element of the fake document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeElement {
    /// The `id` attribute.
    pub id: Option<String>,
    /// Class list.
    pub classes: BTreeSet<String>,
    /// Other attributes.
    pub attributes: BTreeMap<String, String>,
    /// Inner HTML.
    pub html: String,
    /// Input value.
    pub value: Option<String>,
}

impl FakeElement {
    /// Create an empty element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the inner HTML.
    pub fn with_html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    /// Set the input value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            self.classes.contains(class)
        } else if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else {
            false
        }
    }
}

/// Document holding elements in insertion order.
///
/// Selectors support the `.class` and `#id` forms only.
#[derive(Debug, Default)]
pub struct FakeDom {
    elements: RefCell<Vec<(ControlId, FakeElement)>>,
}

impl FakeDom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element under a handle.
    pub fn insert(&self, key: &str, element: FakeElement) -> ControlId {
        let control = ControlId::new(key);
        self.elements.borrow_mut().push((control.clone(), element));
        control
    }

    /// Snapshot of an element.
    pub fn element(&self, control: &ControlId) -> Option<FakeElement> {
        self.elements
            .borrow()
            .iter()
            .find(|(c, _)| c == control)
            .map(|(_, e)| e.clone())
    }

    /// Set an input's value, as a user typing would.
    pub fn set_value(&self, control: &ControlId, value: &str) {
        self.with_element(control, |e| e.value = Some(value.to_string()));
    }

    fn with_element(&self, control: &ControlId, f: impl FnOnce(&mut FakeElement)) {
        if let Some((_, element)) = self
            .elements
            .borrow_mut()
            .iter_mut()
            .find(|(c, _)| c == control)
        {
            f(element);
        }
    }

    fn read<T>(&self, control: &ControlId, f: impl FnOnce(&FakeElement) -> T) -> Option<T> {
        self.elements
            .borrow()
            .iter()
            .find(|(c, _)| c == control)
            .map(|(_, e)| f(e))
    }
}

impl CartDom for FakeDom {
    fn element_by_id(&self, id: &str) -> Option<ControlId> {
        self.elements
            .borrow()
            .iter()
            .find(|(_, e)| e.id.as_deref() == Some(id))
            .map(|(c, _)| c.clone())
    }

    fn query_all(&self, selector: &str) -> Vec<ControlId> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, e)| e.matches(selector))
            .map(|(c, _)| c.clone())
            .collect()
    }

    fn attribute(&self, element: &ControlId, name: &str) -> Option<String> {
        self.read(element, |e| e.attributes.get(name).cloned()).flatten()
    }

    fn value(&self, element: &ControlId) -> Option<String> {
        self.read(element, |e| e.value.clone()).flatten()
    }

    fn inner_html(&self, element: &ControlId) -> String {
        self.read(element, |e| e.html.clone()).unwrap_or_default()
    }

    fn set_inner_html(&self, element: &ControlId, html: &str) {
        self.with_element(element, |e| e.html = html.to_string());
    }

    fn set_text(&self, element: &ControlId, text: &str) {
        self.with_element(element, |e| e.html = text.to_string());
    }

    fn has_class(&self, element: &ControlId, class: &str) -> bool {
        self.read(element, |e| e.classes.contains(class)).unwrap_or(false)
    }

    fn add_class(&self, element: &ControlId, class: &str) {
        self.with_element(element, |e| {
            e.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, element: &ControlId, class: &str) {
        self.with_element(element, |e| {
            e.classes.remove(class);
        });
    }
}

/// Notifier recording every dialog and answering confirms from a setting.
#[derive(Debug)]
pub struct RecordingNotifier {
    journal: Journal,
    confirm_answer: Cell<bool>,
}

impl RecordingNotifier {
    /// Set the answer to future confirmation prompts.
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    /// Messages passed to `notify`, in order.
    pub fn notifications(&self) -> Vec<String> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Notify(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of confirmation prompts shown.
    pub fn confirms(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|e| matches!(e, HostEvent::Confirm(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.journal
            .borrow_mut()
            .push(HostEvent::Notify(message.to_string()));
    }

    fn confirm(&self, message: &str) -> bool {
        self.journal
            .borrow_mut()
            .push(HostEvent::Confirm(message.to_string()));
        self.confirm_answer.get()
    }
}

/// Navigator recording reloads.
#[derive(Debug)]
pub struct RecordingNavigator {
    journal: Journal,
}

impl RecordingNavigator {
    /// Number of reloads requested.
    pub fn reloads(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|e| matches!(e, HostEvent::Reload))
            .count()
    }
}

impl Navigator for RecordingNavigator {
    fn reload(&self) {
        self.journal.borrow_mut().push(HostEvent::Reload);
    }
}

struct Scheduled {
    due: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Manually advanced clock.
#[derive(Default)]
pub struct FakeTimer {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    scheduled: RefCell<Vec<Scheduled>>,
    refuse: Cell<bool>,
}

impl std::fmt::Debug for FakeTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeTimer")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl FakeTimer {
    /// Create a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fake time.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Make later `set_timeout` calls fail, as a browser without timers
    /// would.
    pub fn refuse_scheduling(&self, refuse: bool) {
        self.refuse.set(refuse);
    }

    /// Number of callbacks not yet fired.
    pub fn pending(&self) -> usize {
        self.scheduled.borrow().len()
    }

    /// Move time forward, firing due callbacks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut scheduled = self.scheduled.borrow_mut();
                let index = scheduled
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= target)
                    .min_by_key(|(_, s)| (s.due, s.seq))
                    .map(|(i, _)| i);
                index.map(|i| scheduled.remove(i))
            };
            match next {
                Some(task) => {
                    self.now.set(task.due);
                    (task.callback)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }
}

impl Timer for FakeTimer {
    fn set_timeout(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<(), TimerError> {
        if self.refuse.get() {
            callback();
            return Err(TimerError("scheduling refused".to_string()));
        }
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.scheduled.borrow_mut().push(Scheduled {
            due: self.now.get() + delay,
            seq,
            callback,
        });
        Ok(())
    }
}

/// A complete fake host.
#[derive(Debug)]
pub struct FakeHost {
    /// Document.
    pub dom: Rc<FakeDom>,
    /// Dialogs.
    pub notifier: Rc<RecordingNotifier>,
    /// Clock.
    pub timer: Rc<FakeTimer>,
    /// Navigation.
    pub navigator: Rc<RecordingNavigator>,
    journal: Journal,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Create a host with an empty document. Confirmations are accepted.
    pub fn new() -> Self {
        let journal: Journal = Rc::default();
        Self {
            dom: Rc::new(FakeDom::new()),
            notifier: Rc::new(RecordingNotifier {
                journal: Rc::clone(&journal),
                confirm_answer: Cell::new(true),
            }),
            timer: Rc::new(FakeTimer::new()),
            navigator: Rc::new(RecordingNavigator {
                journal: Rc::clone(&journal),
            }),
            journal,
        }
    }

    /// Capabilities to hand to a controller.
    pub fn host(&self) -> WidgetHost {
        WidgetHost {
            dom: self.dom.clone(),
            notifier: self.notifier.clone(),
            timer: self.timer.clone(),
            navigator: self.navigator.clone(),
        }
    }

    /// Every dialog and reload, in order.
    pub fn events(&self) -> Vec<HostEvent> {
        self.journal.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_timer_fires_in_order() {
        let timer = FakeTimer::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        for (label, ms) in [("b", 20), ("a", 10), ("c", 30)] {
            let fired = fired.clone();
            timer
                .set_timeout(
                    Duration::from_millis(ms),
                    Box::new(move || fired.borrow_mut().push(label)),
                )
                .unwrap();
        }

        timer.advance(Duration::from_millis(25));
        assert_eq!(*fired.borrow(), vec!["a", "b"]);
        assert_eq!(timer.pending(), 1);

        timer.advance(Duration::from_millis(5));
        assert_eq!(*fired.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fake_timer_nested_schedule() {
        let timer = Rc::new(FakeTimer::new());
        let fired = Rc::new(Cell::new(0));

        let inner_timer = timer.clone();
        let inner_fired = fired.clone();
        timer
            .set_timeout(
                Duration::from_millis(10),
                Box::new(move || {
                    inner_fired.set(inner_fired.get() + 1);
                    let again = inner_fired.clone();
                    inner_timer
                        .set_timeout(
                            Duration::from_millis(10),
                            Box::new(move || again.set(again.get() + 1)),
                        )
                        .unwrap();
                }),
            )
            .unwrap();

        timer.advance(Duration::from_millis(20));
        assert_eq!(fired.get(), 2);
        assert_eq!(timer.now(), Duration::from_millis(20));
    }

    #[test]
    fn test_fake_timer_refusal_runs_callback_now() {
        let timer = FakeTimer::new();
        let fired = Rc::new(Cell::new(false));
        timer.refuse_scheduling(true);

        let flag = fired.clone();
        let result = timer.set_timeout(Duration::from_millis(10), Box::new(move || flag.set(true)));

        assert!(result.is_err());
        assert!(fired.get());
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn test_fake_dom_selectors() {
        let dom = FakeDom::new();
        let badge = dom.insert("badge", FakeElement::new().with_id("cart-item-count"));
        let add = dom.insert(
            "add-0",
            FakeElement::new()
                .with_class("add-to-cart-btn")
                .with_attr("data-plato-id", "3"),
        );

        assert_eq!(dom.element_by_id("cart-item-count"), Some(badge));
        assert_eq!(dom.query_all(".add-to-cart-btn"), vec![add.clone()]);
        assert_eq!(dom.attribute(&add, "data-plato-id").as_deref(), Some("3"));
        assert!(dom.query_all("button").is_empty());
    }

    #[test]
    fn test_journal_order() {
        let host = FakeHost::new();
        host.notifier.notify("hola");
        host.navigator.reload();

        assert_eq!(
            host.events(),
            vec![HostEvent::Notify("hola".to_string()), HostEvent::Reload]
        );
    }
}
