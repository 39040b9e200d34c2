//! Overlay Controller
//!
//! One [`OverlayController`] exists per host surface. The host drives it
//! through five callbacks, all on the UI thread and never reentrant:
//!
//! | Callback | Module |
//! |----------|--------|
//! | [`on_content_loaded`](OverlayController::on_content_loaded) | this module |
//! | [`on_refresh`](OverlayController::on_refresh) | `render` |
//! | [`on_function_call`](OverlayController::on_function_call) | `menu` |
//! | [`on_click_screen_object`](OverlayController::on_click_screen_object) | `input` |
//! | [`on_move_screen_object`](OverlayController::on_move_screen_object) | `input` |
//!
//! # Deferred functions
//!
//! A submenu picked from a popup list cannot be opened from within that
//! list's own callback. The request is parked in a single [`DeferredSlot`]
//! and replayed at the end of the next decoration pass:
//!
//! ```text
//!  popup callback                     next AfterLists pass
//!  ──────────────                     ────────────────────
//!  OpenSelectProfile(Request)
//!    └─► slot = OpenSelectProfile(Open) ──► take slot
//!                                           └─► open "Select profile"
//! ```
//!
//! A second request before the flush replaces the first: only one popup
//! chain can be open at a time.

mod badge;
mod input;
mod menu;
mod render;

pub use badge::{
    anchor_from_drag, badge_label, BadgeLayout, BadgeStyle, COLOR_CONTROLLING,
    COLOR_DISCONNECTED, COLOR_FOREGROUND, COLOR_MESSAGE, COLOR_OBSERVING, DEFAULT_LABEL, HEIGHT,
    ICON_DIRECT, ICON_DISCONNECTED, ICON_LOCAL, LABEL_LEN, PADDING,
};

use log::{debug, info};

use crate::client::LightingClient;
use crate::geometry::Rect;
use crate::host::Host;
use crate::settings::{MenuAnchor, ScreenSettings};
use crate::tag_function::TagFunction;

/// Capacity-one queue of tag functions waiting for the next decoration pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredSlot(Option<(TagFunction, Rect)>);

impl DeferredSlot {
    /// Park `function`, returning whatever it replaced
    pub fn defer(&mut self, function: TagFunction, area: Rect) -> Option<(TagFunction, Rect)> {
        self.0.replace((function, area))
    }

    pub fn take(&mut self) -> Option<(TagFunction, Rect)> {
        self.0.take()
    }

    pub fn peek(&self) -> Option<&(TagFunction, Rect)> {
        self.0.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Interactive overlay for one host surface
#[derive(Debug)]
pub struct OverlayController<C: LightingClient> {
    /// Surface is geographically referenced
    geo: bool,
    client: C,
    anchor: MenuAnchor,
    pending: DeferredSlot,
}

impl<C: LightingClient> OverlayController<C> {
    pub fn new(client: C, geo: bool) -> Self {
        OverlayController {
            geo,
            client,
            anchor: MenuAnchor::default(),
            pending: DeferredSlot::default(),
        }
    }

    pub fn is_geo(&self) -> bool {
        self.geo
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn anchor(&self) -> MenuAnchor {
        self.anchor
    }

    pub fn pending(&self) -> &DeferredSlot {
        &self.pending
    }

    fn is_connected(&self) -> bool {
        self.client.connection_state().is_connected()
    }

    /// Restore persisted settings once the host has loaded them
    pub fn on_content_loaded<H: Host + ?Sized>(&mut self, host: &H, loaded: bool) {
        if !loaded {
            return;
        }

        let settings = ScreenSettings::load(host);
        if let Some(icao) = settings.aerodrome.as_deref() {
            info!("Restoring aerodrome {}", icao);
            self.client.set_aerodrome(Some(icao));
        }
        settings.apply_anchor(&mut self.anchor);
        debug!(
            "Menu anchor {:?}, client {}",
            self.anchor,
            self.client.connection_state()
        );
    }

    fn refresh_if_required<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.client.is_background_refresh_required() {
            host.refresh_map_content();
        }
    }
}
