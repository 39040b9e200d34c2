//! Drawing surface handed to each render-phase callback.

use std::ops::{Deref, DerefMut};

use crate::geometry::{Color, Point, PointF, Rect, SizeF};

/// Raw device context the lighting client draws into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub usize);

/// Opaque saved graphics state, returned by [`Canvas::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformState(pub u32);

/// 2D drawing operations for the overlay's own decorations.
///
/// A canvas is only valid for the duration of the callback it was created
/// for. Implementations release their graphics resources on drop.
pub trait Canvas {
    /// Device context for the lighting client.
    fn surface(&self) -> SurfaceHandle;

    /// Layout extent of `text` in the overlay font.
    fn measure_text(&mut self, text: &str) -> SizeF;

    fn draw_text(&mut self, text: &str, origin: PointF, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Connected line segments through `points`, 1px wide.
    fn draw_lines(&mut self, points: &[Point], color: Color);

    fn save(&mut self) -> TransformState;

    fn translate(&mut self, dx: f32, dy: f32);

    fn restore(&mut self, state: TransformState);
}

/// Saves the canvas transform and restores it when dropped
pub struct SavedTransform<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    state: TransformState,
}

impl<'a, C: Canvas + ?Sized> SavedTransform<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        let state = canvas.save();
        SavedTransform { canvas, state }
    }
}

impl<C: Canvas + ?Sized> Deref for SavedTransform<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for SavedTransform<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for SavedTransform<'_, C> {
    fn drop(&mut self) {
        self.canvas.restore(self.state);
    }
}
