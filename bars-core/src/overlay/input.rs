//! Click and drag handling for registered screen objects.

use log::debug;

use super::badge::anchor_from_drag;
use super::OverlayController;
use crate::client::{ClickType, LightingClient};
use crate::geometry::{Point, Rect};
use crate::host::{Host, MouseButton, ScreenObject};
use crate::settings::save_anchor;
use crate::tag_function::TagFunction;

impl<C: LightingClient> OverlayController<C> {
    pub fn on_click_screen_object<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        object: ScreenObject,
        point: Point,
        area: Rect,
        button: MouseButton,
    ) {
        match object {
            ScreenObject::ClickRegion => {
                let click = match button {
                    MouseButton::Left => ClickType::Primary,
                    _ => ClickType::Auxiliary,
                };
                self.client.handle_click(point, click);
            }
            ScreenObject::Menu => {
                let menu = button == MouseButton::Left
                    && self.is_connected()
                    && self.client.aerodrome().is_some();
                let function = if menu {
                    TagFunction::OpenMenu
                } else {
                    TagFunction::OpenEditAerodrome
                };
                self.call_function(host, function, "", area);
            }
        }
    }

    /// Drag the badge; the anchor is only persisted once the drag ends
    pub fn on_move_screen_object<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        object: ScreenObject,
        point: Point,
        released: bool,
    ) {
        if object != ScreenObject::Menu {
            return;
        }

        self.anchor = anchor_from_drag(&host.radar_area(), point);
        if released {
            debug!("Menu anchor moved to {:?}", self.anchor);
            save_anchor(host, self.anchor);
        }
    }
}
