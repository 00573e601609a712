//! Visual resource management
//!
//! Device-dependent resource creation lives behind [`VisualFactory`]. The
//! core only needs two things back from the host: an opaque handle to draw
//! with, and a characteristic radius used to derive moment of inertia.

/// Asset loading errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// The named resource could not be found
    #[error("Visual resource not found: {0}")]
    NotFound(String),

    /// The backend failed to create the resource
    #[error("Visual backend error: {0}")]
    Backend(String),
}

/// Opaque handle to a host-side visual resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

/// A created visual resource and its physical footprint
#[derive(Debug, Clone, Copy)]
pub struct Visual {
    /// Handle the render sink understands
    pub id: VisualId,

    /// Characteristic radius (half extent of the loaded image)
    pub radius: f32,
}

/// Factory for device-dependent visual resources
///
/// Failure is a recoverable per-entity error; the caller decides whether a
/// missing visual rejects the spawn or degrades to an invisible entity.
pub trait VisualFactory {
    /// Create a visual resource for the named asset
    fn create_visual(&mut self, name: &str) -> Result<Visual, AssetError>;
}

/// A visual factory for headless runs: hands out sequential ids with a
/// fixed radius and never touches a device
#[derive(Debug)]
pub struct HeadlessVisualFactory {
    next_id: u64,
    radius: f32,
}

impl HeadlessVisualFactory {
    /// Create a factory producing visuals with the given radius
    pub fn new(radius: f32) -> Self {
        Self { next_id: 0, radius }
    }
}

impl VisualFactory for HeadlessVisualFactory {
    fn create_visual(&mut self, _name: &str) -> Result<Visual, AssetError> {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        Ok(Visual {
            id,
            radius: self.radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_factory_sequential_ids() {
        let mut factory = HeadlessVisualFactory::new(8.0);
        let a = factory.create_visual("a.png").unwrap();
        let b = factory.create_visual("b.png").unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.radius, 8.0);
        assert_eq!(b.radius, 8.0);
    }
}
