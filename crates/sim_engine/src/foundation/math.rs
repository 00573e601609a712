//! Math utilities and types
//!
//! Provides the fundamental 2D math types for the simulation core.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Reflect a vector across a surface with the given unit normal
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - normal * (2.0 * v.dot(&normal))
}

/// 2D cross product (the z component of the equivalent 3D cross product)
///
/// Used to derive torque from a lever arm and an applied force.
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Limit a vector's magnitude by uniform rescale, leaving direction intact
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    let magnitude = v.norm();
    if magnitude > max && magnitude > 0.0 {
        v * (max / magnitude)
    } else {
        v
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}
