//! Frame evaluation backends.
//!
//! A backend turns one [`FrameJob`] (source texture, shading pipeline and
//! quad placement) into an RGBA frame of the surface size. Pixels outside
//! the quad are transparent black; covered pixels are opaque.
//!
//! | Backend | Feature | Notes |
//! |---------|---------|-------|
//! | [`CpuBackend`] | always | Rayon row parallelism via `gridtone-ops` |
//! | `WgpuBackend` | `wgpu` | Compute shader, staging-buffer readback |

mod cpu;
#[cfg(feature = "wgpu")]
mod gpu;

pub use cpu::CpuBackend;
#[cfg(feature = "wgpu")]
pub use gpu::WgpuBackend;

use gridtone_core::Image;
use gridtone_ops::Pipeline;
use tracing::debug;

use crate::RenderResult;
use crate::config::BackendKind;
use crate::geometry::Quad;

/// Everything a backend needs to produce one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameJob<'a> {
    /// Source texture
    pub source: &'a Image,
    /// Parameters resolved from the latest property snapshot
    pub pipeline: &'a Pipeline,
    /// Output width
    pub width: u32,
    /// Output height
    pub height: u32,
    /// Image placement on the surface
    pub quad: Quad,
}

/// A frame evaluator.
pub trait RenderBackend: Send {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Renders one frame.
    fn render(&mut self, job: &FrameJob<'_>) -> RenderResult<Image>;
}

impl BackendKind {
    /// Returns `true` if this backend can be created on this machine.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Auto | BackendKind::Cpu => true,
            #[cfg(feature = "wgpu")]
            BackendKind::Wgpu => WgpuBackend::is_available(),
            #[cfg(not(feature = "wgpu"))]
            BackendKind::Wgpu => false,
        }
    }

    /// Backend name.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::Cpu => "cpu",
            BackendKind::Wgpu => "wgpu",
        }
    }
}

/// Creates a backend. `Auto` prefers the GPU and falls back to the CPU.
pub fn create_backend(kind: BackendKind) -> RenderResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(CpuBackend::new())),
        BackendKind::Wgpu => wgpu_backend(),
        BackendKind::Auto => match wgpu_backend() {
            Ok(b) => Ok(b),
            Err(e) => {
                debug!(error = %e, "GPU backend unavailable, using CPU");
                Ok(Box::new(CpuBackend::new()))
            }
        },
    }
}

#[cfg(feature = "wgpu")]
fn wgpu_backend() -> RenderResult<Box<dyn RenderBackend>> {
    Ok(Box::new(WgpuBackend::new()?))
}

#[cfg(not(feature = "wgpu"))]
fn wgpu_backend() -> RenderResult<Box<dyn RenderBackend>> {
    Err(crate::RenderError::Backend("wgpu support not compiled in".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_always_available() {
        assert!(BackendKind::Cpu.is_available());
        let b = create_backend(BackendKind::Cpu).unwrap();
        assert_eq!(b.name(), "cpu");
    }

    #[test]
    fn auto_never_fails() {
        assert!(create_backend(BackendKind::Auto).is_ok());
    }
}
