use eframe::egui::{Pos2, Vec2};

/// Pan translation between world coordinates (where node positions live)
/// and canvas-local screen coordinates (where pointer events arrive).
///
/// There is no zoom: the transform is a pure translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    offset: Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: Vec2) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        world + self.offset
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        screen - self.offset
    }

    /// Shift the view by a pointer delta. Node data is never touched.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
    }
}
