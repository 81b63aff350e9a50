//! Buffer and bind group builders used by the renderables.
//!
//! Built resources are returned by value; the renderable that asked for them
//! owns them.

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer, rewritable from the queue
    Vertex,
    /// Uniform buffer, rewritable from the queue
    Uniform,
}

impl BufferUsage {
    pub(crate) fn to_wgpu(self) -> wgpu::BufferUsages {
        match self {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Builder for creating GPU buffers
pub struct BufferBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<String>,
    size: Option<u64>,
    data: Option<&'a [u8]>,
    usage: BufferUsage,
}

impl<'a> BufferBuilder<'a> {
    pub(crate) fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            label: None,
            size: None,
            data: None,
            usage: BufferUsage::Vertex,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set buffer size (for empty buffers)
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_pod_data<T: bytemuck::Pod>(mut self, data: &'a [T]) -> Self {
        self.data = Some(bytemuck::cast_slice(data));
        self
    }

    pub fn usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn build(self) -> Result<wgpu::Buffer, BufferBuildError> {
        use wgpu::util::DeviceExt;

        match (self.data, self.size) {
            (Some(data), _) if !data.is_empty() => Ok(self.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: self.label.as_deref(),
                    contents: data,
                    usage: self.usage.to_wgpu(),
                },
            )),
            (Some(_), _) | (None, Some(0)) => Err(BufferBuildError::Empty),
            (None, Some(size)) => Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: self.label.as_deref(),
                size,
                usage: self.usage.to_wgpu(),
                mapped_at_creation: false,
            })),
            (None, None) => Err(BufferBuildError::MissingSizeOrData),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BufferBuildError {
    #[error("Buffer must have either size or data")]
    MissingSizeOrData,
    #[error("Buffer must not be empty")]
    Empty,
}

/// Builder for a bind group and its layout.
///
/// Each binding is visible to both the vertex and fragment stages.
pub struct BindGroupBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<String>,
    layout_entries: Vec<wgpu::BindGroupLayoutEntry>,
    resources: Vec<wgpu::BindingResource<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub(crate) fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            label: None,
            layout_entries: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn uniform(self, buffer: &'a wgpu::Buffer) -> Self {
        self.push(
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            buffer.as_entire_binding(),
        )
    }

    pub fn texture(self, view: &'a wgpu::TextureView) -> Self {
        self.push(
            wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            wgpu::BindingResource::TextureView(view),
        )
    }

    pub fn sampler(self, sampler: &'a wgpu::Sampler) -> Self {
        self.push(
            wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            wgpu::BindingResource::Sampler(sampler),
        )
    }

    fn push(mut self, ty: wgpu::BindingType, resource: wgpu::BindingResource<'a>) -> Self {
        self.layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: self.layout_entries.len() as u32,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty,
            count: None,
        });
        self.resources.push(resource);
        self
    }

    /// Build the layout and the bind group, bindings numbered in call order.
    pub fn build(
        self,
    ) -> Result<(wgpu::BindGroupLayout, wgpu::BindGroup), BindGroupBuildError> {
        if self.layout_entries.is_empty() {
            return Err(BindGroupBuildError::NoEntries);
        }

        let layout_label = self.label.as_deref().map(|l| format!("{l} Layout"));
        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: layout_label.as_deref(),
                entries: &self.layout_entries,
            });

        let bind_group = self.build_for(&layout)?;
        Ok((layout, bind_group))
    }

    /// Build only the bind group against an existing compatible layout.
    pub fn build_for(
        self,
        layout: &wgpu::BindGroupLayout,
    ) -> Result<wgpu::BindGroup, BindGroupBuildError> {
        if self.resources.is_empty() {
            return Err(BindGroupBuildError::NoEntries);
        }
        let entries: Vec<wgpu::BindGroupEntry> = self
            .resources
            .into_iter()
            .enumerate()
            .map(|(binding, resource)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource,
            })
            .collect();
        Ok(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: self.label.as_deref(),
            layout,
            entries: &entries,
        }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BindGroupBuildError {
    #[error("No bindings added to bind group")]
    NoEntries,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_renderer;

    #[test]
    fn test_buffer_usage_conversion() {
        let vertex = BufferUsage::Vertex.to_wgpu();
        assert!(vertex.contains(wgpu::BufferUsages::VERTEX));
        assert!(vertex.contains(wgpu::BufferUsages::COPY_DST));
        assert!(BufferUsage::Uniform.to_wgpu().contains(wgpu::BufferUsages::UNIFORM));
        assert!(BufferUsage::Uniform.to_wgpu().contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn test_buffer_builder_with_pod_data() {
        let Some(renderer) = try_renderer() else {
            return;
        };

        let vertices = [[0.0f32, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.5]];
        let buffer = renderer
            .create_buffer()
            .label("test_buffer")
            .with_pod_data(&vertices)
            .build()
            .expect("Failed to build buffer");
        assert_eq!(buffer.size(), 32);
    }

    #[test]
    fn test_buffer_builder_with_size() {
        let Some(renderer) = try_renderer() else {
            return;
        };

        let buffer = renderer
            .create_buffer()
            .size(256)
            .usage(BufferUsage::Uniform)
            .build()
            .expect("Failed to build buffer");
        assert_eq!(buffer.size(), 256);
    }

    #[test]
    fn test_buffer_builder_rejects_missing_or_empty() {
        let Some(renderer) = try_renderer() else {
            return;
        };

        assert!(matches!(
            renderer.create_buffer().build(),
            Err(BufferBuildError::MissingSizeOrData)
        ));
        assert!(matches!(
            renderer.create_buffer().with_data(&[]).build(),
            Err(BufferBuildError::Empty)
        ));
    }

    #[test]
    fn test_bind_group_builder_no_entries() {
        let Some(renderer) = try_renderer() else {
            return;
        };

        assert!(matches!(
            renderer.create_bind_group().build(),
            Err(BindGroupBuildError::NoEntries)
        ));
    }
}
