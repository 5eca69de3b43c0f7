//! The cart widget controller.

use std::cell::Cell;
use std::rc::Rc;

use cart_core::{ControlId, ItemId, Quantity, WidgetConfig};
use cart_data::FetchClient;
use cart_observability::StructuredLogger;

use crate::api::CartApi;
use crate::busy::{BusyControls, BusyGuard};
use crate::error::WidgetError;
use crate::host::{CartDom, Navigator, Notifier, Timer, WidgetHost};

/// How a user-triggered operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the change and the page was updated.
    Applied,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// The control already had an operation in progress.
    Busy,
    /// The operation failed; the user has been told.
    Failed(WidgetError),
}

impl ActionOutcome {
    /// Check for `Applied`.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A control bound to a specific cart item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemControl {
    /// The control element.
    pub control: ControlId,
    /// Item id read from the control's data attribute.
    pub item: ItemId,
}

/// Controls discovered by [`CartWidgetController::init`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetBindings {
    /// Add-to-cart buttons.
    pub add: Vec<ItemControl>,
    /// The clear-cart button, if the page has one.
    pub clear: Option<ControlId>,
    /// Remove-from-cart buttons.
    pub remove: Vec<ItemControl>,
    /// Quantity inputs.
    pub quantity: Vec<ItemControl>,
}

impl WidgetBindings {
    /// Check whether nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
            && self.clear.is_none()
            && self.remove.is_empty()
            && self.quantity.is_empty()
    }
}

/// Keeps the cart badge in sync with the server and forwards cart actions.
///
/// Each operation runs `idle -> in flight -> settled -> idle` per control.
/// A control stays busy until its operation settles, which for a successful
/// add includes the feedback window.
pub struct CartWidgetController {
    config: Rc<WidgetConfig>,
    api: CartApi,
    dom: Rc<dyn CartDom>,
    notifier: Rc<dyn Notifier>,
    timer: Rc<dyn Timer>,
    navigator: Rc<dyn Navigator>,
    logger: StructuredLogger,
    busy: BusyControls,
    initialized: Cell<bool>,
}

impl std::fmt::Debug for CartWidgetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartWidgetController")
            .field("api", &self.api)
            .field("initialized", &self.initialized.get())
            .finish_non_exhaustive()
    }
}

impl CartWidgetController {
    /// Create a controller.
    pub fn new(config: WidgetConfig, client: FetchClient, host: WidgetHost) -> Self {
        let logger = StructuredLogger::from_config("cart_widget", &config.log);
        let api = CartApi::new(client, config.api.clone());
        Self {
            config: Rc::new(config),
            api,
            dom: host.dom,
            notifier: host.notifier,
            timer: host.timer,
            navigator: host.navigator,
            logger,
            busy: BusyControls::new(),
            initialized: Cell::new(false),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Check whether a control has an operation in progress.
    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.busy.is_busy(control)
    }

    /// Page-ready entry point: sync the badge and discover controls.
    ///
    /// Runs once per controller; later calls log a warning and return empty
    /// bindings.
    pub async fn init(&self) -> WidgetBindings {
        if self.initialized.replace(true) {
            self.logger.warn("init called more than once; ignoring");
            return WidgetBindings::default();
        }

        self.refresh_badge().await;

        let dom = &self.config.dom;
        let bindings = WidgetBindings {
            add: self.item_controls(&dom.add_button_selector),
            clear: self.dom.element_by_id(&dom.clear_button_id),
            remove: self.item_controls(&dom.remove_button_selector),
            quantity: self.item_controls(&dom.quantity_input_selector),
        };

        self.logger
            .info_builder("widget initialized")
            .field_i64("add_controls", bindings.add.len() as i64)
            .field_bool("clear_control", bindings.clear.is_some())
            .field_i64("remove_controls", bindings.remove.len() as i64)
            .field_i64("quantity_inputs", bindings.quantity.len() as i64)
            .emit();

        bindings
    }

    /// Fetch the cart status and render the badge.
    ///
    /// Failures are logged and leave the badge untouched. Returns the count
    /// when the fetch succeeded.
    pub async fn refresh_badge(&self) -> Option<u64> {
        let count = match self.api.cart_status().await {
            Ok(count) => count,
            Err(err) => {
                self.logger
                    .error_builder("Error fetching cart status")
                    .field("error", err.to_string())
                    .emit();
                return None;
            }
        };

        let dom = &self.config.dom;
        match self.dom.element_by_id(&dom.badge_id) {
            Some(badge) => {
                self.dom.set_text(&badge, &count.to_string());
                if count > 0 {
                    self.dom.remove_class(&badge, &dom.hidden_class);
                } else {
                    self.dom.add_class(&badge, &dom.hidden_class);
                }
                self.logger
                    .debug_builder("badge updated")
                    .field_i64("total_items", count as i64)
                    .emit();
            }
            None => self.logger.debug("no badge element on page"),
        }

        Some(count)
    }

    /// Add units of an item from an add-to-cart control.
    ///
    /// On success the badge is refreshed and the control shows transient
    /// feedback; on failure the user is alerted.
    pub async fn add_item(
        &self,
        control: &ControlId,
        item: &ItemId,
        quantity: u32,
    ) -> ActionOutcome {
        let quantity = match Quantity::for_add(quantity) {
            Ok(quantity) => quantity,
            Err(err) => return self.fail(&self.config.messages.add_error, err.into()),
        };
        let Some(guard) = self.acquire(control) else {
            return ActionOutcome::Busy;
        };

        match self.api.add_to_cart(item, quantity).await {
            Ok(message) => {
                self.logger
                    .info_builder("item added")
                    .field("item_id", item.as_str())
                    .field_i64("quantity", i64::from(quantity.get()))
                    .field("message", message)
                    .emit();
                // The status request goes out first; feedback does not wait
                // for it to settle.
                futures::join!(self.refresh_badge(), async move { self.show_feedback(guard) });
                ActionOutcome::Applied
            }
            Err(err) => self.fail(&self.config.messages.add_error, err),
        }
    }

    /// Empty the cart after user confirmation, then reload the page.
    pub async fn clear_cart(&self, control: &ControlId) -> ActionOutcome {
        let Some(_guard) = self.acquire(control) else {
            return ActionOutcome::Busy;
        };

        if !self.notifier.confirm(&self.config.messages.confirm_clear) {
            self.logger.debug("clear cart declined");
            return ActionOutcome::Cancelled;
        }

        match self.api.clear_cart().await {
            Ok(message) => {
                self.logger.info("cart cleared");
                self.notifier.notify(&message);
                self.navigator.reload();
                ActionOutcome::Applied
            }
            Err(err) => self.fail(&self.config.messages.clear_error, err),
        }
    }

    /// Remove an item line, then reload the page.
    pub async fn remove_item(&self, control: &ControlId, item: &ItemId) -> ActionOutcome {
        let Some(_guard) = self.acquire(control) else {
            return ActionOutcome::Busy;
        };

        match self.api.remove_from_cart(item).await {
            Ok(_) => {
                self.logger
                    .info_builder("item removed")
                    .field("item_id", item.as_str())
                    .emit();
                self.refresh_badge().await;
                self.navigator.reload();
                ActionOutcome::Applied
            }
            Err(err) => self.fail(&self.config.messages.remove_error, err),
        }
    }

    /// Set an item's quantity from the raw value of a quantity input.
    pub async fn set_quantity(
        &self,
        control: &ControlId,
        item: &ItemId,
        raw_value: &str,
    ) -> ActionOutcome {
        let quantity = match Quantity::parse_input(raw_value) {
            Ok(quantity) => quantity,
            Err(err) => return self.fail(&self.config.messages.update_error, err.into()),
        };
        let Some(_guard) = self.acquire(control) else {
            return ActionOutcome::Busy;
        };

        match self.api.update_quantity(item, quantity).await {
            Ok(_) => {
                self.logger
                    .info_builder("quantity updated")
                    .field("item_id", item.as_str())
                    .field_i64("quantity", i64::from(quantity.get()))
                    .emit();
                self.refresh_badge().await;
                ActionOutcome::Applied
            }
            Err(err) => self.fail(&self.config.messages.update_error, err),
        }
    }

    /// Read a quantity input's current value and apply it.
    pub async fn set_quantity_from_input(&self, input: &ItemControl) -> ActionOutcome {
        let raw = self.dom.value(&input.control).unwrap_or_default();
        self.set_quantity(&input.control, &input.item, &raw).await
    }

    fn item_controls(&self, selector: &str) -> Vec<ItemControl> {
        let attribute = &self.config.dom.item_id_attribute;
        self.dom
            .query_all(selector)
            .into_iter()
            .filter_map(|control| {
                let raw = self.dom.attribute(&control, attribute);
                match raw.as_deref().map(ItemId::parse) {
                    Some(Ok(item)) => Some(ItemControl { control, item }),
                    Some(Err(err)) => {
                        self.logger
                            .warn_builder("skipping control with invalid item id")
                            .field("selector", selector)
                            .field("error", err.to_string())
                            .emit();
                        None
                    }
                    None => {
                        self.logger
                            .warn_builder("skipping control without item id")
                            .field("selector", selector)
                            .field("attribute", attribute.as_str())
                            .emit();
                        None
                    }
                }
            })
            .collect()
    }

    fn acquire(&self, control: &ControlId) -> Option<BusyGuard> {
        let guard = self.busy.try_acquire(control);
        if guard.is_none() {
            self.logger
                .debug_builder("control busy; ignoring")
                .field("control", control.as_str())
                .emit();
        }
        guard
    }

    /// Swap the control into its success look, and schedule the revert. The
    /// busy flag is released by the revert, which runs at once if the timer
    /// refuses it.
    fn show_feedback(&self, guard: BusyGuard) {
        let dom_config = &self.config.dom;
        let control = guard.control().clone();
        let original_html = self.dom.inner_html(&control);
        let had_idle_class = self.dom.has_class(&control, &dom_config.idle_class);

        self.dom.set_text(&control, &self.config.feedback.label);
        self.dom.remove_class(&control, &dom_config.idle_class);
        self.dom.add_class(&control, &dom_config.success_class);

        let dom = Rc::clone(&self.dom);
        let config = Rc::clone(&self.config);
        let scheduled = self.timer.set_timeout(
            self.config.feedback.duration(),
            Box::new(move || {
                dom.set_inner_html(&control, &original_html);
                dom.remove_class(&control, &config.dom.success_class);
                if had_idle_class {
                    dom.add_class(&control, &config.dom.idle_class);
                }
                drop(guard);
            }),
        );
        if let Err(err) = scheduled {
            self.logger
                .error_builder("feedback revert not scheduled; reverted now")
                .field("error", err.to_string())
                .emit();
        }
    }

    fn fail(&self, prefix: &str, err: WidgetError) -> ActionOutcome {
        self.logger
            .error_builder("cart action failed")
            .field("error", err.to_string())
            .emit();
        self.notifier
            .notify(&err.user_message(prefix, &self.config.messages));
        ActionOutcome::Failed(err)
    }
}
