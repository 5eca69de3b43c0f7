//! Cart badge and cart button controller for storefront pages.
//!
//! The controller keeps the `#cart-item-count` badge in sync with the
//! server and forwards add, clear, remove and quantity actions to the cart
//! API. It talks to the page only through the traits in [`host`], so the
//! same code runs in the browser (see `browser`, `wasm32` only) and against
//! the fakes in [`testing`].
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_widget::prelude::*;
//! use cart_widget::testing::FakeHost;
//! use cart_data::{mock::MockTransport, FetchClient};
//!
//! let fake = FakeHost::new();
//! let controller = CartWidgetController::new(
//!     WidgetConfig::default(),
//!     FetchClient::new(MockTransport::new()),
//!     fake.host(),
//! );
//!
//! let bindings = controller.init().await;
//! for add in &bindings.add {
//!     controller.add_item(&add.control, &add.item, 1).await;
//! }
//! ```

pub mod api;
pub mod busy;
pub mod controller;
pub mod error;
pub mod host;
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use api::CartApi;
pub use controller::{ActionOutcome, CartWidgetController, ItemControl, WidgetBindings};
pub use error::WidgetError;
pub use host::{CartDom, Navigator, Notifier, Timer, TimerError, WidgetHost};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::CartApi;
    pub use crate::controller::{
        ActionOutcome, CartWidgetController, ItemControl, WidgetBindings,
    };
    pub use crate::error::WidgetError;
    pub use crate::host::{CartDom, Navigator, Notifier, Timer, TimerError, WidgetHost};
    pub use cart_core::prelude::*;
}
