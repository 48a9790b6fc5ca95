/// Live camera background composited behind the scene.
pub trait CameraFeed {
    /// Advance the background to the current video frame.
    fn update(&mut self);
}

/// Background that never changes; counts its updates.
#[derive(Debug, Default)]
pub struct StaticFeed {
    updates: u64,
}

impl StaticFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl CameraFeed for StaticFeed {
    fn update(&mut self) {
        self.updates += 1;
    }
}
