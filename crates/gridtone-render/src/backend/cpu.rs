//! CPU backend.

use glam::Vec2;
use gridtone_core::Image;
use gridtone_ops::parallel::fill_rows;
use tracing::trace;

use super::{FrameJob, RenderBackend};
use crate::{RenderError, RenderResult};

/// Evaluates frames on the CPU.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn render(&mut self, job: &FrameJob<'_>) -> RenderResult<Image> {
        if job.source.is_empty() {
            return Err(RenderError::SurfaceNotReady);
        }
        let (tw, th) = job.source.dimensions();
        let (tw, th) = (tw as f32, th as f32);
        let surface = Vec2::new(job.width as f32, job.height as f32);
        trace!(w = job.width, h = job.height, "cpu frame");

        let mut out = Image::new(job.width, job.height);
        fill_rows(out.data_mut(), job.width, |x, y| {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(uv) = job.quad.uv_at(p) else {
                return [0.0; 4];
            };
            let screen = p / surface;
            let c = job
                .pipeline
                .shade(job.source, uv.x * tw, uv.y * th, screen.to_array());
            [c[0], c[1], c[2], 1.0]
        });
        Ok(out)
    }
}
