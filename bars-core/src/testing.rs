//! Recording fakes of the host, canvas and lighting client for unit tests.

use std::collections::HashMap;

use crate::canvas::{Canvas, SurfaceHandle, TransformState};
use crate::client::{ActivityState, ClickType, ConnectionState, LightingClient};
use crate::geometry::{Color, GeoPosition, Point, PointF, Rect, SizeF};
use crate::host::{Host, PopupElement, ScreenObject};
use crate::tag_function::TagFunction;
use crate::viewport::Viewport;

/// Width the fake canvas measures per character
pub const CHAR_WIDTH: f32 = 6.0;

// =============================================================================
// Host
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub area: Rect,
    pub title: String,
    pub columns: i32,
    pub elements: Vec<PopupElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditPopup {
    pub area: Rect,
    pub function: TagFunction,
    pub initial: String,
}

/// Host with a north-up linear projection and recorded side effects
#[derive(Debug)]
pub struct FakeHost {
    pub area: Rect,
    pub controller: bool,
    /// Position under pixel (0, 0)
    pub map_origin: GeoPosition,
    pub pixels_per_degree: f64,
    pub display: (GeoPosition, GeoPosition),
    pub settings: HashMap<String, String>,
    pub saves: usize,
    pub popups: Vec<Popup>,
    pub edits: Vec<EditPopup>,
    pub objects: Vec<(ScreenObject, Rect, bool)>,
    pub refreshes: usize,
}

impl FakeHost {
    pub fn new() -> Self {
        FakeHost {
            area: Rect::new(0, 0, 800, 600),
            controller: true,
            map_origin: GeoPosition::new(52.0, -1.0),
            pixels_per_degree: 1000.0,
            display: (GeoPosition::new(51.5, -1.0), GeoPosition::new(52.0, -0.2)),
            settings: HashMap::new(),
            saves: 0,
            popups: Vec::new(),
            edits: Vec::new(),
            objects: Vec::new(),
            refreshes: 0,
        }
    }

    pub fn objects_of(&self, kind: ScreenObject) -> Vec<Rect> {
        self.objects
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, rect, _)| *rect)
            .collect()
    }

    pub fn last_popup(&self) -> &Popup {
        self.popups.last().expect("no popup opened")
    }
}

impl Host for FakeHost {
    fn radar_area(&self) -> Rect {
        self.area
    }

    fn pixel_to_position(&self, point: Point) -> GeoPosition {
        GeoPosition::new(
            self.map_origin.latitude - point.y as f64 / self.pixels_per_degree,
            self.map_origin.longitude + point.x as f64 / self.pixels_per_degree,
        )
    }

    fn position_to_pixel(&self, position: GeoPosition) -> Point {
        Point::new(
            ((position.longitude - self.map_origin.longitude) * self.pixels_per_degree).round()
                as i32,
            ((self.map_origin.latitude - position.latitude) * self.pixels_per_degree).round()
                as i32,
        )
    }

    fn display_area(&self) -> (GeoPosition, GeoPosition) {
        self.display
    }

    fn is_controller(&self) -> bool {
        self.controller
    }

    fn open_popup_list(&mut self, area: Rect, title: &str, columns: i32) {
        self.popups.push(Popup {
            area,
            title: title.to_string(),
            columns,
            elements: Vec::new(),
        });
    }

    fn add_popup_list_element(&mut self, element: PopupElement) {
        self.popups
            .last_mut()
            .expect("element added without an open popup")
            .elements
            .push(element);
    }

    fn open_popup_edit(&mut self, area: Rect, function: TagFunction, initial: &str) {
        self.edits.push(EditPopup {
            area,
            function,
            initial: initial.to_string(),
        });
    }

    fn add_screen_object(&mut self, object: ScreenObject, area: Rect, movable: bool) {
        self.objects.push((object, area, movable));
    }

    fn refresh_map_content(&mut self) {
        self.refreshes += 1;
    }

    fn load_setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    fn save_setting(&mut self, key: &str, _description: &str, value: &str) {
        self.saves += 1;
        self.settings.insert(key.to_string(), value.to_string());
    }
}

// =============================================================================
// Canvas
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(String, PointF, Color),
    FillRect(Rect, Color),
    /// Points as they land on the surface, after translation
    Lines(Vec<Point>, Color),
    Save(TransformState),
    Translate(f32, f32),
    Restore(TransformState),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    pub offset: (f32, f32),
    saved: Vec<(TransformState, (f32, f32))>,
    next_state: u32,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn surface(&self) -> SurfaceHandle {
        SurfaceHandle(0x5eed)
    }

    fn measure_text(&mut self, text: &str) -> SizeF {
        SizeF {
            width: text.chars().count() as f32 * CHAR_WIDTH,
            height: 14.0,
        }
    }

    fn draw_text(&mut self, text: &str, origin: PointF, color: Color) {
        self.ops.push(DrawOp::Text(text.to_string(), origin, color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn draw_lines(&mut self, points: &[Point], color: Color) {
        let (dx, dy) = self.offset;
        let points = points
            .iter()
            .map(|p| Point::new(p.x + dx as i32, p.y + dy as i32))
            .collect();
        self.ops.push(DrawOp::Lines(points, color));
    }

    fn save(&mut self) -> TransformState {
        self.next_state += 1;
        let state = TransformState(self.next_state);
        self.saved.push((state, self.offset));
        self.ops.push(DrawOp::Save(state));
        state
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.offset.0 += dx;
        self.offset.1 += dy;
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn restore(&mut self, state: TransformState) {
        if let Some(pos) = self.saved.iter().position(|(s, _)| *s == state) {
            self.offset = self.saved[pos].1;
            self.saved.truncate(pos);
        }
        self.ops.push(DrawOp::Restore(state));
    }
}

// =============================================================================
// Lighting client
// =============================================================================

#[derive(Debug, Default)]
pub struct FakeClient {
    pub connection: ConnectionState,
    pub aerodrome: Option<String>,
    pub activity: ActivityState,
    pub profiles: Vec<String>,
    pub profile: usize,
    pub presets: Vec<String>,
    pub applied_presets: Vec<usize>,
    pub views: Vec<String>,
    pub view: usize,
    pub regions: Vec<Rect>,
    /// Returned once by `is_background_refresh_required`, then cleared
    pub refresh_required: bool,
    pub viewports: Vec<Viewport>,
    pub backgrounds: Vec<Viewport>,
    pub foregrounds: usize,
    pub clicks: Vec<(Point, ClickType)>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connected directly, observing `icao`, with two profiles and presets
    pub fn observing(icao: &str) -> Self {
        FakeClient {
            connection: ConnectionState::ConnectedDirect,
            aerodrome: Some(icao.to_string()),
            activity: ActivityState::Observing,
            profiles: vec!["Day".into(), "Night".into()],
            presets: vec!["All on".into(), "All off".into()],
            views: vec!["Ground".into(), "Tower".into()],
            ..Default::default()
        }
    }
}

impl LightingClient for FakeClient {
    fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    fn aerodrome(&self) -> Option<String> {
        self.aerodrome.clone()
    }

    fn set_aerodrome(&mut self, icao: Option<&str>) {
        self.aerodrome = icao.map(str::to_string);
    }

    fn activity(&self) -> ActivityState {
        self.activity
    }

    fn set_activity(&mut self, state: ActivityState) {
        self.activity = state;
        self.refresh_required = true;
    }

    fn profiles(&self) -> Vec<String> {
        self.profiles.clone()
    }

    fn profile(&self) -> usize {
        self.profile
    }

    fn set_profile(&mut self, index: usize) {
        self.profile = index;
        self.refresh_required = true;
    }

    fn presets(&self) -> Vec<String> {
        self.presets.clone()
    }

    fn apply_preset(&mut self, index: usize) {
        self.applied_presets.push(index);
    }

    fn views(&self) -> Vec<String> {
        self.views.clone()
    }

    fn view(&self) -> usize {
        self.view
    }

    fn set_view(&mut self, index: usize) {
        self.view = index;
        self.refresh_required = true;
    }

    fn draw_background(&mut self, _surface: SurfaceHandle, viewport: &Viewport) {
        self.backgrounds.push(*viewport);
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewports.push(*viewport);
    }

    fn draw_foreground(&mut self, _surface: SurfaceHandle) {
        self.foregrounds += 1;
    }

    fn click_regions(&self) -> Vec<Rect> {
        self.regions.clone()
    }

    fn is_background_refresh_required(&mut self) -> bool {
        std::mem::take(&mut self.refresh_required)
    }

    fn handle_click(&mut self, point: Point, click: ClickType) {
        self.clicks.push((point, click));
    }
}
