/// Startup choices for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Present in step with the display (FIFO). Without vsync the lowest
    /// latency mode the surface offers is used.
    pub vsync: bool,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}
