//! `wgpu` compute backend.
//!
//! One dispatch per frame: the source texture and LUT are uploaded as
//! storage buffers, the grade kernel writes RGBA `f32` into an output
//! buffer, and a staging buffer brings it back for capture. The source
//! upload is reused while the same texture is rendered repeatedly.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use gridtone_core::Image;
use gridtone_core::image::CHANNELS;
use gridtone_ops::Pipeline;
use tracing::{debug, trace};
use wgpu::util::DeviceExt;

use super::{FrameJob, RenderBackend};
use crate::shaders;
use crate::{RenderError, RenderResult};

const WORKGROUP: u32 = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GradeUniform {
    dims: [u32; 4],
    quad: [f32; 4],
    tone: [f32; 4],
    amounts: [f32; 4],
    sigmas: [f32; 4],
    midtone: [f32; 4],
    hue: [[f32; 4]; 3],
    lut_min: [f32; 4],
    lut_max: [f32; 4],
    bands: [[f32; 4]; 6],
}

impl GradeUniform {
    fn new(job: &FrameJob<'_>) -> Self {
        let pipe: &Pipeline = job.pipeline;
        let g = &pipe.grade;
        let d = &g.detail;
        let (tw, th) = job.source.dimensions();

        let mut hue = [[0.0f32; 4]; 3];
        if let Some(m) = g.hue_rotation() {
            for (i, row) in hue.iter_mut().enumerate() {
                let r = m.row(i);
                *row = [r.x, r.y, r.z, 0.0];
            }
        }

        let mut bands = [[0.0f32; 4]; 6];
        for band in gridtone_core::Band::ALL {
            let adj = g.bands.bands[band.index()];
            bands[band.index()] = [adj.hue, adj.saturation, adj.lightness, band.center_radians()];
        }

        let (lut_size, lut_min, lut_max) = match &pipe.lut {
            Some(lut) => (lut.size as f32, lut.domain_min, lut.domain_max),
            None => (0.0, [0.0; 3], [1.0; 3]),
        };

        Self {
            dims: [job.width, job.height, tw, th],
            quad: [job.quad.origin.x, job.quad.origin.y, job.quad.size.x, job.quad.size.y],
            tone: [
                g.brightness,
                g.contrast,
                g.saturation,
                if g.hue_rotation().is_some() { 1.0 } else { 0.0 },
            ],
            amounts: [g.sharpness, g.structure, pipe.vignette_size, pipe.vignette_sharpness],
            sigmas: [
                d.sharp_sigma_spatial,
                d.sharp_sigma_range,
                d.structure_sigma_spatial,
                d.structure_sigma_range,
            ],
            midtone: [d.midtone_center, d.midtone_width, d.threshold, lut_size],
            hue,
            lut_min: [lut_min[0], lut_min[1], lut_min[2], 0.0],
            lut_max: [lut_max[0], lut_max[1], lut_max[2], 0.0],
            bands,
        }
    }
}

struct SourceUpload {
    image: Image,
    buffer: wgpu::Buffer,
}

/// Evaluates frames with a `wgpu` compute shader.
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::ComputePipeline,
    source: Option<SourceUpload>,
}

impl WgpuBackend {
    /// Returns `true` if a GPU adapter is present.
    pub fn is_available() -> bool {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .is_some()
        })
    }

    /// Acquires a device and compiles the grade kernel.
    pub fn new() -> RenderResult<Self> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::Backend("no GPU adapter".into()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("gridtone_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Backend(format!("device creation failed: {e}")))?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grade"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRADE.into()),
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("grade_pipeline"),
            layout: None,
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        debug!(adapter = %adapter.get_info().name, "wgpu backend ready");
        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            pipeline,
            source: None,
        })
    }

    /// Uploads `image` unless the cached upload already shares its storage.
    fn upload_source(&mut self, image: &Image) {
        let cached = self
            .source
            .as_ref()
            .is_some_and(|s| s.image.data().as_ptr() == image.data().as_ptr());
        if cached {
            return;
        }
        trace!(w = image.width(), h = image.height(), "uploading source");
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("source_buffer"),
            contents: bytemuck::cast_slice(image.data()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        self.source = Some(SourceUpload {
            image: image.clone(),
            buffer,
        });
    }

    fn read_back(&self, output: &wgpu::Buffer, size: u64) -> RenderResult<Vec<f32>> {
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging_buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = self.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(output, 0, &staging, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| RenderError::CaptureFailure("map channel closed".into()))?
            .map_err(|e| RenderError::CaptureFailure(format!("map failed: {e}")))?;

        let data = slice.get_mapped_range();
        let result: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(result)
    }
}

impl RenderBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn render(&mut self, job: &FrameJob<'_>) -> RenderResult<Image> {
        if job.source.is_empty() {
            return Err(RenderError::SurfaceNotReady);
        }
        let uniform = GradeUniform::new(job);
        let out_len = job.width as usize * job.height as usize * CHANNELS;
        let out_size = (out_len * std::mem::size_of::<f32>()) as u64;
        if out_size == 0 {
            return Err(RenderError::CaptureFailure("zero-sized surface".into()));
        }

        let params = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grade_params"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        // Storage bindings must be non-empty, so "no LUT" still binds one entry.
        let lut_data: Vec<f32> = match &job.pipeline.lut {
            Some(lut) => lut.data.iter().flatten().copied().collect(),
            None => vec![0.0; 3],
        };
        let lut = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lut_buffer"),
            contents: bytemuck::cast_slice(&lut_data),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let output = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("output_buffer"),
            size: out_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        self.upload_source(job.source);
        let Some(source) = self.source.as_ref().map(|s| &s.buffer) else {
            return Err(RenderError::Backend("source upload missing".into()));
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grade_bind_group"),
            layout: &self.pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: source.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: output.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: params.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: lut.as_entire_binding() },
            ],
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("grade_encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("grade_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(
                job.width.div_ceil(WORKGROUP),
                job.height.div_ceil(WORKGROUP),
                1,
            );
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);

        let data = self.read_back(&output, out_size)?;
        Image::from_data(job.width, job.height, data)
            .map_err(|e| RenderError::CaptureFailure(e.to_string()))
    }
}
