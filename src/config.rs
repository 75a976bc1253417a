//! Construction-time configuration for the allocator façade.

#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Penalty reported on a request when its allocation had to fall back
    /// to an adjacent zone. Opaque to the allocation policy itself.
    pub cross_zone_penalty: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            cross_zone_penalty: 10,
        }
    }
}
