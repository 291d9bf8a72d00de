//! The renderable surface an edge effect draws onto.
//!
//! The engine never owns the surface. The host hands it in for each frame, and
//! the engine writes a translation, a scale and a pivot onto it.

/// Linear part of the surface's ambient transform
///
/// Maps `(x, y)` to `(a*x + b*y, c*x + d*y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Counter-clockwise rotation by a multiple of 90 degrees
    pub fn quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Self::IDENTITY,
            1 => Self::new(0.0, -1.0, 1.0, 0.0),
            2 => Self::new(-1.0, 0.0, 0.0, -1.0),
            _ => Self::new(0.0, 1.0, -1.0, 0.0),
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy)
    }

    /// Apply to a direction vector; translation never affects vectors
    #[inline]
    pub fn map_vector(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.b * y, self.c * x + self.d * y)
    }
}

/// One frame of the fallback glow overlay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowFrame {
    pub alpha: f32,
    pub scale_y: f32,
    /// Horizontal centre of the glow, in surface pixels
    pub translate_x: f32,
    pub radius: f32,
}

/// Stretch extent to hand the renderer: `own` when positive, else `fallback`, else 1
///
/// Renderers reject a non-positive maximum stretch.
#[inline]
pub fn stretch_extent(own: f32, fallback: f32) -> f32 {
    if own > 0.0 {
        own
    } else if fallback > 0.0 {
        fallback
    } else {
        1.0
    }
}

/// Host-side handle the engine writes transforms onto
pub trait RenderSurface {
    fn set_translation(&mut self, x: f32, y: f32);

    fn set_scale(&mut self, x: f32, y: f32);

    fn set_pivot(&mut self, x: f32, y: f32);

    /// Hand the stretch region to the host renderer; a zero vector clears it
    fn stretch(&mut self, vec_x: f32, vec_y: f32, max_width: f32, max_height: f32);

    /// Stretch needs a hardware renderer; anything else skips the effect
    fn is_hardware_accelerated(&self) -> bool;

    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn transform(&self) -> Transform2D {
        Transform2D::IDENTITY
    }

    fn draw_glow(&mut self, _frame: &GlowFrame) {}

    /// Put the surface back to an untransformed state
    fn reset(&mut self) {
        let max_width = stretch_extent(self.width(), 0.0);
        let max_height = stretch_extent(self.height(), 0.0);
        self.reset_with_extents(max_width, max_height);
    }

    /// Like [`RenderSurface::reset`], clearing the stretch with explicit extents
    fn reset_with_extents(&mut self, max_width: f32, max_height: f32) {
        self.set_translation(0.0, 0.0);
        self.set_scale(1.0, 1.0);
        self.stretch(0.0, 0.0, max_width, max_height);
    }
}

/// Surface that records everything written to it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub hardware_accelerated: bool,
    pub ambient: Transform2D,
    pub translation: (f32, f32),
    pub scale: (f32, f32),
    pub pivot: (f32, f32),
    pub last_stretch: Option<[f32; 4]>,
    pub stretch_calls: usize,
    pub glow_frames: Vec<GlowFrame>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            hardware_accelerated: true,
            ambient: Transform2D::IDENTITY,
            translation: (0.0, 0.0),
            scale: (1.0, 1.0),
            pivot: (0.0, 0.0),
            last_stretch: None,
            stretch_calls: 0,
            glow_frames: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.ambient = transform;
        self
    }

    pub fn software(mut self) -> Self {
        self.hardware_accelerated = false;
        self
    }

    /// No translation and unit scale
    pub fn is_identity(&self) -> bool {
        self.translation == (0.0, 0.0) && self.scale == (1.0, 1.0)
    }
}

impl RenderSurface for RecordingSurface {
    fn set_translation(&mut self, x: f32, y: f32) {
        self.translation = (x, y);
    }

    fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = (x, y);
    }

    fn set_pivot(&mut self, x: f32, y: f32) {
        self.pivot = (x, y);
    }

    fn stretch(&mut self, vec_x: f32, vec_y: f32, max_width: f32, max_height: f32) {
        self.last_stretch = Some([vec_x, vec_y, max_width, max_height]);
        self.stretch_calls += 1;
    }

    fn is_hardware_accelerated(&self) -> bool {
        self.hardware_accelerated
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn transform(&self) -> Transform2D {
        self.ambient
    }

    fn draw_glow(&mut self, frame: &GlowFrame) {
        self.glow_frames.push(*frame);
    }
}
