//! The render surface.
//!
//! A [`RenderSurface`] owns one source texture, the latest property
//! snapshot, a backend and the background LUT loader. The host drives it
//! with [`RenderSurface::submit`] when parameters change and
//! [`RenderSurface::tick`] once per frame; [`RenderSurface::capture_frame`]
//! produces the PNG that gets saved.
//!
//! ```text
//! Uninitialized --attach_texture--> Ready --tick (dirty)--> Rendering --> Ready
//! ```

use gridtone_core::{Image, ImageProperties};
use gridtone_ops::Pipeline;
use tracing::{debug, info, trace};

use crate::backend::{FrameJob, RenderBackend, create_backend};
use crate::capture::encode_png;
use crate::config::{RenderConfig, SurfaceDims};
use crate::geometry::{FitMode, Quad};
use crate::loader::LutLoader;
use crate::texture;
use crate::{RenderError, RenderResult};

/// Lifecycle of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// No texture attached yet.
    Uninitialized,
    /// Texture attached, idle.
    Ready,
    /// A frame is being evaluated.
    Rendering,
}

/// Drawing surface for one image being edited.
pub struct RenderSurface {
    config: RenderConfig,
    backend: Box<dyn RenderBackend>,
    state: SurfaceState,
    texture: Option<Image>,
    props: ImageProperties,
    dirty: bool,
    frame: Option<Image>,
    luts: LutLoader,
    frames_rendered: u64,
}

impl RenderSurface {
    /// Creates an uninitialized surface rendering through `backend`.
    pub fn new(config: RenderConfig, backend: Box<dyn RenderBackend>) -> Self {
        let luts = LutLoader::spawn(config.lut_dir.clone());
        debug!(backend = backend.name(), lut_dir = %config.lut_dir.display(), "render surface created");
        Self {
            config,
            backend,
            state: SurfaceState::Uninitialized,
            texture: None,
            props: ImageProperties::default(),
            dirty: false,
            frame: None,
            luts,
            frames_rendered: 0,
        }
    }

    /// Creates a surface with the backend named in `config`.
    pub fn from_config(config: RenderConfig) -> RenderResult<Self> {
        let backend = create_backend(config.backend)?;
        Ok(Self::new(config, backend))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Attaches a decoded source texture and moves to `Ready`.
    pub fn attach_texture(&mut self, image: Image) -> RenderResult<()> {
        if image.is_empty() {
            return Err(RenderError::TextureLoadFailure(format!(
                "texture has zero area ({}x{})",
                image.width(),
                image.height()
            )));
        }
        info!(width = image.width(), height = image.height(), "texture attached");
        self.texture = Some(image);
        self.frame = None;
        self.state = SurfaceState::Ready;
        self.dirty = true;
        Ok(())
    }

    /// Decodes PNG or JPEG bytes and attaches the result. On failure the
    /// surface keeps its previous state.
    pub fn load_texture(&mut self, bytes: &[u8]) -> RenderResult<()> {
        let image = texture::decode(bytes)?;
        self.attach_texture(image)
    }

    /// The attached texture.
    pub fn texture(&self) -> Option<&Image> {
        self.texture.as_ref()
    }

    /// Output size: the configured size, else the texture's own.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        match self.config.size {
            Some(dims) => Some((dims.width, dims.height)),
            None => self.texture.as_ref().map(Image::dimensions),
        }
    }

    /// Changes the output size; `None` follows the texture.
    pub fn resize(&mut self, size: Option<SurfaceDims>) {
        if self.config.size != size {
            self.config.size = size;
            self.dirty = true;
        }
    }

    /// Changes the fit policy.
    pub fn set_fit(&mut self, fit: FitMode) {
        if self.config.fit != fit {
            self.config.fit = fit;
            self.dirty = true;
        }
    }

    /// Records the latest parameters. A changed LUT selection starts a
    /// background load; the next [`tick`](Self::tick) renders.
    pub fn submit(&mut self, props: ImageProperties) {
        self.luts.request(props.lut.as_deref());
        if props != self.props {
            trace!(modified = props.modified_fields().len(), "properties submitted");
            self.props = props;
            self.dirty = true;
        }
    }

    /// Latest submitted parameters.
    pub fn properties(&self) -> &ImageProperties {
        &self.props
    }

    /// Per-frame callback. Picks up finished LUT loads and renders when
    /// anything changed. Returns `true` if a new frame was produced.
    pub fn tick(&mut self) -> RenderResult<bool> {
        if self.luts.poll() {
            self.dirty = true;
        }
        if self.state == SurfaceState::Uninitialized || !self.dirty {
            return Ok(false);
        }
        self.render_now()?;
        Ok(true)
    }

    /// Renders synchronously with the current parameters and LUT.
    pub fn render_now(&mut self) -> RenderResult<&Image> {
        let Some(source) = self.texture.as_ref() else {
            return Err(RenderError::SurfaceNotReady);
        };
        let (width, height) = match self.config.size {
            Some(dims) => (dims.width, dims.height),
            None => source.dimensions(),
        };
        let pipeline = Pipeline::new(&self.props, &self.config.detail, self.luts.active());
        let job = FrameJob {
            source,
            pipeline: &pipeline,
            width,
            height,
            quad: Quad::fit(source.dimensions(), (width, height), self.config.fit),
        };

        self.state = SurfaceState::Rendering;
        let result = self.backend.render(&job);
        self.state = SurfaceState::Ready;

        let frame = result?;
        self.frames_rendered += 1;
        self.dirty = false;
        trace!(width, height, frame = self.frames_rendered, "frame rendered");
        let frame: &Image = self.frame.insert(frame);
        Ok(frame)
    }

    /// The most recent frame.
    pub fn frame(&self) -> Option<&Image> {
        self.frame.as_ref()
    }

    /// Number of frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Renders the current state and encodes it as PNG.
    ///
    /// An in-flight LUT load is waited for, up to the configured timeout;
    /// past that the frame is captured without the LUT.
    pub fn capture_frame(&mut self) -> RenderResult<Vec<u8>> {
        if self.state == SurfaceState::Uninitialized {
            return Err(RenderError::SurfaceNotReady);
        }
        if self.luts.is_pending() {
            self.luts.wait(self.config.lut_load_timeout());
        }
        self.luts.poll();
        let frame = self.render_now()?;
        encode_png(frame)
    }

    /// Whether a LUT load is in flight.
    pub fn lut_pending(&self) -> bool {
        self.luts.is_pending()
    }

    /// Takes the failure of the selected LUT, if it could not be used.
    pub fn take_lut_error(&mut self) -> Option<RenderError> {
        self.luts.take_error()
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("size", &self.surface_size())
            .field("dirty", &self.dirty)
            .field("lut", &self.luts.selected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn surface() -> RenderSurface {
        let config = RenderConfig {
            lut_dir: std::env::temp_dir().join("gridtone-no-such-dir"),
            ..Default::default()
        };
        RenderSurface::new(config, Box::new(CpuBackend::new()))
    }

    #[test]
    fn starts_uninitialized() {
        let mut s = surface();
        assert_eq!(s.state(), SurfaceState::Uninitialized);
        assert!(!s.tick().unwrap());
        assert!(matches!(s.render_now(), Err(RenderError::SurfaceNotReady)));
    }

    #[test]
    fn bad_bytes_keep_state() {
        let mut s = surface();
        assert!(matches!(
            s.load_texture(b"not an image"),
            Err(RenderError::TextureLoadFailure(_))
        ));
        assert_eq!(s.state(), SurfaceState::Uninitialized);
    }

    #[test]
    fn renders_only_when_dirty() {
        let mut s = surface();
        s.attach_texture(Image::filled(2, 2, [0.5, 0.5, 0.5, 1.0])).unwrap();
        assert!(s.tick().unwrap());
        assert!(!s.tick().unwrap());
        assert_eq!(s.frames_rendered(), 1);

        let mut props = ImageProperties::default();
        props.brightness = 120.0;
        s.submit(props.clone());
        assert!(s.tick().unwrap());
        s.submit(props);
        assert!(!s.tick().unwrap());
        assert_eq!(s.state(), SurfaceState::Ready);
    }

    #[test]
    fn fixed_size_overrides_texture() {
        let mut s = surface();
        s.attach_texture(Image::filled(4, 2, [1.0; 4])).unwrap();
        s.resize(Some(SurfaceDims { width: 8, height: 8 }));
        let frame = s.render_now().unwrap();
        assert_eq!(frame.dimensions(), (8, 8));
    }
}
