use eframe::egui::{Vec2, vec2};

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;
pub const ZONE_MARGIN: f32 = 60.0;
const ZONE_FRACTIONS: [f32; 3] = [0.3, 0.6, 1.0];

/// Affine canvas-to-screen map: `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl ViewTransform {
    pub fn apply(self, world: Vec2) -> Vec2 {
        world * self.scale + self.translate
    }

    pub fn invert(self, screen: Vec2) -> Vec2 {
        (screen - self.translate) / self.scale
    }
}

/// Canvas geometry and view state. Node physics runs in canvas space; zoom
/// and pan only affect the transform handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    zoom: f32,
    pan: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn zone_radii(&self) -> [f32; 3] {
        let outer = (self.width.min(self.height) * 0.5 - ZONE_MARGIN).max(0.0);
        ZONE_FRACTIONS.map(|fraction| outer * fraction)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let width = width.max(1.0);
        let height = height.max(1.0);
        if (width - self.width).abs() < 0.5 && (height - self.height).abs() < 0.5 {
            return false;
        }

        self.width = width;
        self.height = height;
        true
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[cfg(test)]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    pub fn zoom_by_notches(&mut self, notches: f32) {
        self.set_zoom(self.zoom + notches * ZOOM_STEP);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.pan += delta;
        }
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }

    /// Zooms around the canvas center, then pans.
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.zoom,
            translate: self.center() * (1.0 - self.zoom) + self.pan,
        }
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.transform().apply(world)
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        self.transform().invert(screen)
    }
}
