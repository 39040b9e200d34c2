//! Render-phase handlers.
//!
//! Each phase has its own handler so it can be driven and tested in
//! isolation; [`OverlayController::on_refresh`] only dispatches.

use log::debug;

use super::badge::{badge_label, BadgeLayout, BadgeStyle, COLOR_FOREGROUND, COLOR_MESSAGE};
use super::OverlayController;
use crate::canvas::{Canvas, SavedTransform};
use crate::client::LightingClient;
use crate::geometry::PointF;
use crate::host::{Host, RefreshPhase, ScreenObject};
use crate::viewport::Viewport;

pub const MESSAGE_DISCONNECTED: &str = "Disconnected";
pub const MESSAGE_NO_VIEWS: &str = "No views defined";

impl<C: LightingClient> OverlayController<C> {
    pub fn on_refresh<H, K>(&mut self, host: &mut H, canvas: &mut K, phase: RefreshPhase)
    where
        H: Host + ?Sized,
        K: Canvas + ?Sized,
    {
        match phase {
            RefreshPhase::BackBitmap => self.render_background(host, canvas),
            RefreshPhase::BeforeTags => self.render_foreground(host, canvas),
            RefreshPhase::AfterLists => self.render_decorations(host, canvas),
            RefreshPhase::AfterTags => {}
        }
    }

    /// Message drawn instead of content when there is nothing to show
    pub fn status_message(&self) -> Option<&'static str> {
        if !self.is_connected() {
            Some(MESSAGE_DISCONNECTED)
        } else if !self.geo && self.client.views().is_empty() {
            Some(MESSAGE_NO_VIEWS)
        } else {
            None
        }
    }

    pub fn render_background<H, K>(&mut self, host: &mut H, canvas: &mut K)
    where
        H: Host + ?Sized,
        K: Canvas + ?Sized,
    {
        if let Some(message) = self.status_message() {
            let center = host.radar_area().center();
            let extent = canvas.measure_text(message);
            let origin = PointF::new(center.x as f32 - extent.width / 2.0, center.y as f32);
            canvas.draw_text(message, origin, COLOR_MESSAGE);
            return;
        }

        let viewport = Viewport::for_surface(host, self.geo);
        if !viewport.is_drawable() {
            debug!("Skipping background for degenerate viewport");
            return;
        }
        self.client.draw_background(canvas.surface(), &viewport);
    }

    pub fn render_foreground<H, K>(&mut self, host: &mut H, canvas: &mut K)
    where
        H: Host + ?Sized,
        K: Canvas + ?Sized,
    {
        // Geometry follows every pan and zoom, so push it each frame
        let viewport = Viewport::for_surface(host, self.geo);
        if !viewport.is_drawable() {
            debug!("Skipping foreground for degenerate viewport");
            return;
        }
        self.client.set_viewport(&viewport);
        self.client.draw_foreground(canvas.surface());

        for region in self.client.click_regions() {
            host.add_screen_object(ScreenObject::ClickRegion, region, false);
        }
    }

    pub fn render_decorations<H, K>(&mut self, host: &mut H, canvas: &mut K)
    where
        H: Host + ?Sized,
        K: Canvas + ?Sized,
    {
        let aerodrome = self.client.aerodrome();
        let style = BadgeStyle::new(
            self.client.connection_state(),
            self.client.activity(),
            aerodrome.is_some(),
        );
        let label = badge_label(aerodrome.as_deref());

        let extent = canvas.measure_text(&label);
        let layout = BadgeLayout::new(&host.radar_area(), self.anchor, extent.width);

        canvas.fill_rect(layout.rect, style.background);
        host.add_screen_object(ScreenObject::Menu, layout.rect, true);
        {
            let mut icon = SavedTransform::new(canvas);
            icon.translate(layout.icon_origin.x, layout.icon_origin.y);
            icon.draw_lines(style.icon, COLOR_FOREGROUND);
        }
        canvas.draw_text(&label, layout.label_origin, COLOR_FOREGROUND);

        self.refresh_if_required(host);

        if let Some((function, area)) = self.pending.take() {
            debug!("Flushing deferred {:?}", function);
            self.call_function(host, function, "", area);
        }
    }
}
