use anyhow::Result;
use helix::{FrameState, SceneParams};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::Antialiasing;

use super::context::GpuContext;
use super::pipeline::HelixPipeline;
use super::uniforms::HelixUniforms;

/// Aggregates every GPU resource needed to present a frame.
///
/// The layout mirrors the lifetime relationship between objects:
///
/// ```text
///   Surface ─▶ Device ─▶ Queue
///                │
///                ├─▶ RenderPipeline
///                ├─▶ Uniform buffer / bind group
///                └─▶ Optional MSAA target
/// ```
///
/// One `GpuState` exists per mounted instance. Dropping it releases every
/// resource exactly once; nothing is shared or reused across remounts.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: HelixPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// CPU copy of the uniform data mirrored into the buffer each frame.
    uniforms: HelixUniforms,
}

impl GpuState {
    pub fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        scene: &SceneParams,
        antialiasing: Antialiasing,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, antialiasing)?;
        let pipeline = HelixPipeline::new(
            &context.device,
            context.config.format,
            context.sample_count,
            scene.blend_mode,
        )?;

        let uniforms = HelixUniforms::new(scene, context.size.width, context.size.height);
        let uniform_buffer = {
            use wgpu::util::DeviceExt;
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("uniform buffer"),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                })
        };

        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
        })
    }

    /// Current swapchain size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reconfigures the swapchain and the resolution uniform. The change is
    /// visible to the next frame's submission.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
        self.uniforms
            .set_resolution(self.context.size.width as f32, self.context.size.height as f32);
    }

    /// Uploads the frame's smoothed state and submits one draw.
    ///
    /// The uniform write happens-before the submission that reads it; the
    /// queue orders both against the previous frame.
    pub fn render_frame(&mut self, frame_state: &FrameState) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.set_frame(frame_state);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) =
            if let Some(msaa) = self.context.multisample_target.as_ref() {
                (&msaa.view, Some(&view))
            } else {
                (&view, None)
            };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            width = self.context.size.width,
            height = self.context.size.height,
            "presented frame"
        );
        Ok(())
    }
}
