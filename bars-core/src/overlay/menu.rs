//! Tag-function dispatch and popup menus.

use log::{debug, info, warn};

use super::OverlayController;
use crate::client::{ActivityState, ConnectionState, LightingClient};
use crate::geometry::Rect;
use crate::host::{Host, PopupCheckbox, PopupElement};
use crate::settings::save_aerodrome;
use crate::tag_function::{SubmenuStep, TagFunction};

pub const TITLE_MENU: &str = "BARS menu";
pub const TITLE_PROFILES: &str = "Select profile";
pub const TITLE_PRESETS: &str = "Select preset";
pub const TITLE_VIEWS: &str = "Select view";

pub const ENTRY_AERODROME: &str = "Active aerodrome";
pub const ENTRY_CONTROL: &str = "Control";
pub const ENTRY_PROFILES: &str = "Profiles";
pub const ENTRY_PRESETS: &str = "Presets";
pub const ENTRY_VIEWS: &str = "Views";

const POPUP_COLUMNS: i32 = 1;

/// Which client list a submit index refers to
#[derive(Debug, Clone, Copy)]
enum ListKind {
    Profile,
    Preset,
    View,
}

impl<C: LightingClient> OverlayController<C> {
    /// Handle a function id from a popup element or edit submit
    pub fn on_function_call<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        id: i32,
        text: &str,
        area: Rect,
    ) {
        match TagFunction::decode(id) {
            Ok(function) => self.call_function(host, function, text, area),
            Err(e) => warn!("Ignoring function id {:#x}: {}", id, e),
        }
    }

    pub fn call_function<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        function: TagFunction,
        text: &str,
        area: Rect,
    ) {
        if let Some(deferred) = function.deferred() {
            if let Some((replaced, _)) = self.pending.defer(deferred, area) {
                debug!("Deferred {:?} replaced by {:?}", replaced, deferred);
            }
        } else {
            self.dispatch(host, function, text, area);
        }

        self.refresh_if_required(host);
    }

    fn dispatch<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        function: TagFunction,
        text: &str,
        area: Rect,
    ) {
        match function {
            TagFunction::None => {}
            TagFunction::OpenMenu => self.open_menu(host, area),
            TagFunction::OpenEditAerodrome => {
                let current = self.client.aerodrome().unwrap_or_default();
                host.open_popup_edit(area, TagFunction::SubmitEditAerodrome, &current);
            }
            TagFunction::SubmitEditAerodrome => self.submit_aerodrome(host, text),
            TagFunction::ToggleControlling => {
                if !self.can_control(host) {
                    warn!("Control toggle without controller permission");
                    return;
                }
                let activity = self.client.activity().toggled();
                info!("Switching to {:?}", activity);
                self.client.set_activity(activity);
            }
            TagFunction::OpenSelectProfile(_) => self.open_profiles(host, area),
            TagFunction::OpenSelectPreset(_) => self.open_presets(host, area),
            TagFunction::OpenSelectView(_) => self.open_views(host, area),
            TagFunction::SubmitSelectProfile(index) => {
                if self.checked_index(ListKind::Profile, index) {
                    self.client.set_profile(index);
                }
            }
            TagFunction::SubmitSelectPreset(index) => {
                if self.checked_index(ListKind::Preset, index) {
                    self.client.apply_preset(index);
                }
            }
            TagFunction::SubmitSelectView(index) => {
                if self.checked_index(ListKind::View, index) {
                    self.client.set_view(index);
                }
            }
        }
    }

    /// Controller role on the network, or a local server
    fn can_control<H: Host + ?Sized>(&self, host: &H) -> bool {
        host.is_controller() || self.client.connection_state() == ConnectionState::ConnectedLocal
    }

    fn is_controlling(&self) -> bool {
        self.client.activity() == ActivityState::Controlling
    }

    fn open_menu<H: Host + ?Sized>(&mut self, host: &mut H, area: Rect) {
        let can_control = self.can_control(host);
        let controlling = self.is_controlling();

        host.open_popup_list(area, TITLE_MENU, POPUP_COLUMNS);
        host.add_popup_list_element(PopupElement::new(
            ENTRY_AERODROME,
            TagFunction::OpenEditAerodrome,
        ));

        let toggle = if can_control {
            TagFunction::ToggleControlling
        } else {
            TagFunction::None
        };
        host.add_popup_list_element(
            PopupElement::new(ENTRY_CONTROL, toggle)
                .checkbox(PopupCheckbox::checked_if(controlling))
                .disabled(!can_control),
        );

        host.add_popup_list_element(PopupElement::new(
            ENTRY_PROFILES,
            TagFunction::OpenSelectProfile(SubmenuStep::Request),
        ));

        if !self.client.presets().is_empty() {
            let presets = if controlling {
                TagFunction::OpenSelectPreset(SubmenuStep::Request)
            } else {
                TagFunction::None
            };
            host.add_popup_list_element(
                PopupElement::new(ENTRY_PRESETS, presets).disabled(!controlling),
            );
        }

        if !self.geo {
            host.add_popup_list_element(PopupElement::new(
                ENTRY_VIEWS,
                TagFunction::OpenSelectView(SubmenuStep::Request),
            ));
        }
    }

    fn submit_aerodrome<H: Host + ?Sized>(&mut self, host: &mut H, text: &str) {
        let icao = text.trim();
        if icao.is_empty() {
            info!("Clearing aerodrome");
            self.client.set_aerodrome(None);
        } else {
            info!("Selecting aerodrome {}", icao);
            self.client.set_aerodrome(Some(icao));
        }
        save_aerodrome(host, icao);
    }

    fn open_profiles<H: Host + ?Sized>(&mut self, host: &mut H, area: Rect) {
        let controlling = self.is_controlling();
        let current = self.client.profile();

        host.open_popup_list(area, TITLE_PROFILES, POPUP_COLUMNS);
        for (i, name) in self.client.profiles().into_iter().enumerate() {
            let function = if controlling {
                TagFunction::SubmitSelectProfile(i)
            } else {
                TagFunction::None
            };
            host.add_popup_list_element(
                PopupElement::new(name, function)
                    .checkbox(PopupCheckbox::checked_if(current == i))
                    .disabled(!controlling),
            );
        }
    }

    fn open_presets<H: Host + ?Sized>(&mut self, host: &mut H, area: Rect) {
        host.open_popup_list(area, TITLE_PRESETS, POPUP_COLUMNS);
        for (i, name) in self.client.presets().into_iter().enumerate() {
            host.add_popup_list_element(PopupElement::new(
                name,
                TagFunction::SubmitSelectPreset(i),
            ));
        }
    }

    fn open_views<H: Host + ?Sized>(&mut self, host: &mut H, area: Rect) {
        let current = self.client.view();

        host.open_popup_list(area, TITLE_VIEWS, POPUP_COLUMNS);
        for (i, name) in self.client.views().into_iter().enumerate() {
            host.add_popup_list_element(
                PopupElement::new(name, TagFunction::SubmitSelectView(i))
                    .checkbox(PopupCheckbox::checked_if(current == i)),
            );
        }
    }

    /// Check `index` against the client's current list
    fn checked_index(&self, list: ListKind, index: usize) -> bool {
        let len = match list {
            ListKind::Profile => self.client.profiles().len(),
            ListKind::Preset => self.client.presets().len(),
            ListKind::View => self.client.views().len(),
        };
        if index >= len {
            warn!("{:?} index {} out of range ({} entries)", list, index, len);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClient, FakeHost};

    const AREA: Rect = Rect::new(700, 0, 800, 20);

    fn overlay(client: FakeClient, geo: bool) -> OverlayController<FakeClient> {
        OverlayController::new(client, geo)
    }

    fn labels(host: &FakeHost) -> Vec<&str> {
        host.last_popup()
            .elements
            .iter()
            .map(|e| e.label.as_str())
            .collect()
    }

    #[test]
    fn test_requests_never_open_popups() {
        for request in [
            TagFunction::OpenSelectProfile(SubmenuStep::Request),
            TagFunction::OpenSelectPreset(SubmenuStep::Request),
            TagFunction::OpenSelectView(SubmenuStep::Request),
        ] {
            let mut host = FakeHost::new();
            let mut overlay = overlay(FakeClient::observing("EGLL"), false);

            overlay.call_function(&mut host, request, "", AREA);

            assert!(host.popups.is_empty());
            assert_eq!(overlay.pending().peek(), Some(&(request.deferred().unwrap(), AREA)));
        }
    }

    #[test]
    fn test_second_request_replaces_first() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), false);

        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectProfile(SubmenuStep::Request),
            "",
            AREA,
        );
        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectView(SubmenuStep::Request),
            "",
            Rect::new(0, 0, 10, 10),
        );

        assert_eq!(
            overlay.pending().peek(),
            Some(&(
                TagFunction::OpenSelectView(SubmenuStep::Open),
                Rect::new(0, 0, 10, 10)
            ))
        );
    }

    #[test]
    fn test_decoded_request_is_deferred() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);
        let id = TagFunction::OpenSelectPreset(SubmenuStep::Request)
            .encode()
            .unwrap();

        overlay.on_function_call(&mut host, id, "", AREA);

        assert!(host.popups.is_empty());
        assert!(overlay.pending().is_pending());
    }

    #[test]
    fn test_unknown_function_id_ignored() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.on_function_call(&mut host, 0xff, "", AREA);

        assert!(host.popups.is_empty());
        assert!(host.edits.is_empty());
        assert!(!overlay.pending().is_pending());
    }

    #[test]
    fn test_menu_entries_observing_geo() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.call_function(&mut host, TagFunction::OpenMenu, "", AREA);

        let popup = host.last_popup();
        assert_eq!(popup.title, TITLE_MENU);
        assert_eq!(popup.area, AREA);
        assert_eq!(popup.columns, 1);
        assert_eq!(labels(&host), vec!["Active aerodrome", "Control", "Profiles", "Presets"]);

        let control = &popup.elements[1];
        assert_eq!(control.function, TagFunction::ToggleControlling);
        assert_eq!(control.checkbox, PopupCheckbox::Unchecked);
        assert!(!control.disabled);

        // Presets need an active session
        let presets = &popup.elements[3];
        assert_eq!(presets.function, TagFunction::None);
        assert_eq!(presets.checkbox, PopupCheckbox::NoCheckbox);
        assert!(presets.disabled);
    }

    #[test]
    fn test_menu_entries_controlling_planar() {
        let mut client = FakeClient::observing("EGLL");
        client.activity = ActivityState::Controlling;

        let mut host = FakeHost::new();
        let mut overlay = overlay(client, false);
        overlay.call_function(&mut host, TagFunction::OpenMenu, "", AREA);

        assert_eq!(
            labels(&host),
            vec!["Active aerodrome", "Control", "Profiles", "Presets", "Views"]
        );
        let popup = host.last_popup();
        assert_eq!(popup.elements[1].checkbox, PopupCheckbox::Checked);
        assert_eq!(
            popup.elements[3].function,
            TagFunction::OpenSelectPreset(SubmenuStep::Request)
        );
        assert!(!popup.elements[3].disabled);
        assert_eq!(
            popup.elements[4].function,
            TagFunction::OpenSelectView(SubmenuStep::Request)
        );
    }

    #[test]
    fn test_menu_without_presets_or_permission() {
        let mut client = FakeClient::observing("EGLL");
        client.presets.clear();

        let mut host = FakeHost::new();
        host.controller = false;
        let mut overlay = overlay(client, true);
        overlay.call_function(&mut host, TagFunction::OpenMenu, "", AREA);

        assert_eq!(labels(&host), vec!["Active aerodrome", "Control", "Profiles"]);
        let control = &host.last_popup().elements[1];
        assert_eq!(control.function, TagFunction::None);
        assert!(control.disabled);
    }

    #[test]
    fn test_local_server_grants_control() {
        let mut client = FakeClient::observing("EGLL");
        client.connection = ConnectionState::ConnectedLocal;

        let mut host = FakeHost::new();
        host.controller = false;
        let mut overlay = overlay(client, true);
        overlay.call_function(&mut host, TagFunction::OpenMenu, "", AREA);

        let control = &host.last_popup().elements[1];
        assert_eq!(control.function, TagFunction::ToggleControlling);
        assert!(!control.disabled);
    }

    #[test]
    fn test_edit_aerodrome_prefilled() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);
        overlay.call_function(&mut host, TagFunction::OpenEditAerodrome, "", AREA);

        assert_eq!(host.edits.len(), 1);
        assert_eq!(host.edits[0].function, TagFunction::SubmitEditAerodrome);
        assert_eq!(host.edits[0].initial, "EGLL");
        assert_eq!(host.edits[0].area, AREA);

        let mut overlay = overlay_without_target();
        overlay.call_function(&mut host, TagFunction::OpenEditAerodrome, "", AREA);
        assert_eq!(host.edits[1].initial, "");
    }

    fn overlay_without_target() -> OverlayController<FakeClient> {
        overlay(FakeClient::new(), true)
    }

    #[test]
    fn test_submit_aerodrome_sets_and_persists() {
        let mut host = FakeHost::new();
        let mut overlay = overlay_without_target();
        overlay.call_function(&mut host, TagFunction::SubmitEditAerodrome, "EGKK", AREA);

        assert_eq!(overlay.client().aerodrome.as_deref(), Some("EGKK"));
        assert_eq!(host.settings.get("aerodrome").map(String::as_str), Some("EGKK"));
        assert_eq!(host.saves, 1);
    }

    #[test]
    fn test_submit_empty_aerodrome_clears_and_persists() {
        let mut host = FakeHost::new();
        host.settings.insert("aerodrome".into(), "EGLL".into());
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.call_function(&mut host, TagFunction::SubmitEditAerodrome, "", AREA);

        assert_eq!(overlay.client().aerodrome, None);
        assert_eq!(host.settings.get("aerodrome").map(String::as_str), Some(""));
        assert_eq!(host.saves, 1);
    }

    #[test]
    fn test_submit_aerodrome_trims_input() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.call_function(&mut host, TagFunction::SubmitEditAerodrome, "  ", AREA);
        assert_eq!(overlay.client().aerodrome, None);
        assert_eq!(host.settings.get("aerodrome").map(String::as_str), Some(""));

        overlay.call_function(&mut host, TagFunction::SubmitEditAerodrome, " EGKK\t", AREA);
        assert_eq!(overlay.client().aerodrome.as_deref(), Some("EGKK"));
        assert_eq!(host.settings.get("aerodrome").map(String::as_str), Some("EGKK"));
        assert_eq!(host.saves, 2);
    }

    #[test]
    fn test_toggle_controlling() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.call_function(&mut host, TagFunction::ToggleControlling, "", AREA);
        assert_eq!(overlay.client().activity, ActivityState::Controlling);
        // Activity change makes the client ask for a redraw
        assert_eq!(host.refreshes, 1);

        overlay.call_function(&mut host, TagFunction::ToggleControlling, "", AREA);
        assert_eq!(overlay.client().activity, ActivityState::Observing);
        assert_eq!(host.refreshes, 2);
    }

    #[test]
    fn test_toggle_without_permission_ignored() {
        let mut host = FakeHost::new();
        host.controller = false;
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);

        overlay.call_function(&mut host, TagFunction::ToggleControlling, "", AREA);

        assert_eq!(overlay.client().activity, ActivityState::Observing);
        assert_eq!(host.refreshes, 0);
    }

    #[test]
    fn test_profile_list_observing_is_disabled() {
        let mut client = FakeClient::observing("EGLL");
        client.profile = 1;

        let mut host = FakeHost::new();
        let mut overlay = overlay(client, true);
        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectProfile(SubmenuStep::Open),
            "",
            AREA,
        );

        let popup = host.last_popup();
        assert_eq!(popup.title, TITLE_PROFILES);
        assert_eq!(labels(&host), vec!["Day", "Night"]);
        assert!(popup.elements.iter().all(|e| e.disabled));
        assert!(popup.elements.iter().all(|e| e.function == TagFunction::None));
        assert_eq!(popup.elements[0].checkbox, PopupCheckbox::Unchecked);
        assert_eq!(popup.elements[1].checkbox, PopupCheckbox::Checked);
    }

    #[test]
    fn test_profile_list_controlling_submits() {
        let mut client = FakeClient::observing("EGLL");
        client.activity = ActivityState::Controlling;

        let mut host = FakeHost::new();
        let mut overlay = overlay(client, true);
        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectProfile(SubmenuStep::Open),
            "",
            AREA,
        );

        let elements = &host.last_popup().elements;
        assert_eq!(elements[0].function, TagFunction::SubmitSelectProfile(0));
        assert_eq!(elements[1].function, TagFunction::SubmitSelectProfile(1));
        assert!(elements.iter().all(|e| !e.disabled));
        assert_eq!(elements[0].checkbox, PopupCheckbox::Checked);

        overlay.call_function(&mut host, TagFunction::SubmitSelectProfile(1), "", AREA);
        assert_eq!(overlay.client().profile, 1);
    }

    #[test]
    fn test_preset_list_always_enabled() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);
        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectPreset(SubmenuStep::Open),
            "",
            AREA,
        );

        let popup = host.last_popup();
        assert_eq!(popup.title, TITLE_PRESETS);
        assert_eq!(labels(&host), vec!["All on", "All off"]);
        for (i, element) in popup.elements.iter().enumerate() {
            assert_eq!(element.function, TagFunction::SubmitSelectPreset(i));
            assert_eq!(element.checkbox, PopupCheckbox::NoCheckbox);
            assert!(!element.disabled);
        }

        overlay.call_function(&mut host, TagFunction::SubmitSelectPreset(1), "", AREA);
        assert_eq!(overlay.client().applied_presets, vec![1]);
    }

    #[test]
    fn test_view_list_checks_current() {
        let mut client = FakeClient::observing("EGLL");
        client.view = 1;

        let mut host = FakeHost::new();
        let mut overlay = overlay(client, false);
        overlay.call_function(
            &mut host,
            TagFunction::OpenSelectView(SubmenuStep::Open),
            "",
            AREA,
        );

        let popup = host.last_popup();
        assert_eq!(popup.title, TITLE_VIEWS);
        assert_eq!(popup.elements[0].function, TagFunction::SubmitSelectView(0));
        assert_eq!(popup.elements[0].checkbox, PopupCheckbox::Unchecked);
        assert_eq!(popup.elements[1].checkbox, PopupCheckbox::Checked);

        overlay.call_function(&mut host, TagFunction::SubmitSelectView(0), "", AREA);
        assert_eq!(overlay.client().view, 0);
        assert_eq!(host.refreshes, 1);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), false);

        overlay.call_function(&mut host, TagFunction::SubmitSelectProfile(2), "", AREA);
        overlay.call_function(&mut host, TagFunction::SubmitSelectPreset(7), "", AREA);
        overlay.call_function(&mut host, TagFunction::SubmitSelectView(99), "", AREA);

        assert_eq!(overlay.client().profile, 0);
        assert!(overlay.client().applied_presets.is_empty());
        assert_eq!(overlay.client().view, 0);
        assert_eq!(host.refreshes, 0);
    }

    #[test]
    fn test_none_does_nothing() {
        let mut host = FakeHost::new();
        let mut overlay = overlay(FakeClient::observing("EGLL"), true);
        overlay.call_function(&mut host, TagFunction::None, "", AREA);

        assert!(host.popups.is_empty());
        assert!(host.edits.is_empty());
        assert_eq!(host.saves, 0);
    }
}
