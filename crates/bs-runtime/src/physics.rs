pub const DEFAULT_GRAVITY: (f32, f32) = (0.0, -10.0);

/// Handle to the physics simulation of a scene. Only the parameters the
/// scene decides are kept here.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsWorld {
    pub width: u32,
    pub height: u32,
    pub gravity: (f32, f32),
}

impl PhysicsWorld {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            gravity: DEFAULT_GRAVITY,
        }
    }
}
