//! Render abstraction
//!
//! The simulation core never computes pixel data. It emits geometric draw
//! parameters (sprite transforms, debug line segments and markers) to a
//! [`RenderSink`], and the host decides how to present them.

use crate::assets::VisualId;
use crate::foundation::math::Vec2;

/// RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque green (velocity debug vectors)
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    /// Opaque red (acceleration debug vectors)
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Per-entity sprite draw parameters
#[derive(Debug, Clone, Copy)]
pub struct SpriteParams {
    /// Visual resource to draw, if one has been created
    pub visual: Option<VisualId>,

    /// World position of the sprite center
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Tint color
    pub tint: Color,

    /// Sprite origin offset (half extents of the visual)
    pub origin: Vec2,
}

/// A geometric debug primitive
#[derive(Debug, Clone, Copy)]
pub enum DebugPrimitive {
    /// A colored line segment
    Line {
        /// Segment start
        from: Vec2,
        /// Segment end
        to: Vec2,
        /// Line color
        color: Color,
    },
    /// A colored filled triangle
    Triangle {
        /// Triangle vertices
        points: [Vec2; 3],
        /// Fill color
        color: Color,
    },
}

/// Sink for draw commands produced by the world
///
/// Implementations batch, rasterize, or simply log the commands; the core
/// only guarantees the geometry is valid for the frame it was emitted in.
pub trait RenderSink {
    /// Draw an entity sprite
    fn draw_sprite(&mut self, sprite: &SpriteParams);

    /// Draw a debug primitive
    fn draw_debug(&mut self, primitive: &DebugPrimitive);
}

/// A render sink that discards everything (headless simulation and tests)
#[derive(Debug, Default)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn draw_sprite(&mut self, _sprite: &SpriteParams) {}

    fn draw_debug(&mut self, _primitive: &DebugPrimitive) {}
}
