//! Vertex buffers that are rewritten every frame and only grow.

use crate::builder::{BufferBuilder, BufferUsage};
use tracing::{debug, error, warn};

/// What to do with a buffer of `capacity` bytes when `len` new bytes arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPlan {
    /// Nothing to upload; draw nothing.
    Skip,
    /// Replace the buffer with a new one of exactly `size` bytes.
    Reallocate { size: u64 },
    /// Write into the existing buffer from offset 0.
    Overwrite { len: u64 },
    /// `size` bytes exceed the device limit; the previous contents stay.
    Oversized { size: u64 },
}

/// `limit` is the largest buffer the device can allocate.
pub fn plan_upload(capacity: u64, len: u64, limit: u64) -> UploadPlan {
    if len == 0 {
        UploadPlan::Skip
    } else if len > limit {
        UploadPlan::Oversized { size: len }
    } else if len > capacity {
        UploadPlan::Reallocate { size: len }
    } else {
        UploadPlan::Overwrite { len }
    }
}

/// A vertex buffer with a capacity watermark and a current element count.
///
/// Overwrites go through `Queue::write_buffer`, which stages the data so
/// frames still in flight keep reading the previous contents.
pub struct GrowableBuffer {
    label: &'static str,
    usage: BufferUsage,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    count: u32,
    reallocations: usize,
}

impl GrowableBuffer {
    pub fn new(label: &'static str, usage: BufferUsage) -> Self {
        Self {
            label,
            usage,
            buffer: None,
            capacity: 0,
            count: 0,
            reallocations: 0,
        }
    }

    pub fn upload<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> UploadPlan {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let limit = device.limits().max_buffer_size;
        let plan = plan_upload(self.capacity, bytes.len() as u64, limit);
        match plan {
            UploadPlan::Skip => {}
            UploadPlan::Oversized { size } => {
                warn!(
                    "{}: {size} bytes exceed the {limit} byte buffer limit, keeping previous data",
                    self.label
                );
                return plan;
            }
            UploadPlan::Reallocate { size } => {
                match BufferBuilder::new(device)
                    .label(self.label)
                    .with_data(bytes)
                    .usage(self.usage)
                    .build()
                {
                    Ok(buffer) => {
                        debug!("{}: reallocated {} -> {} bytes", self.label, self.capacity, size);
                        self.buffer = Some(buffer);
                        self.capacity = size;
                        self.reallocations += 1;
                    }
                    Err(err) => {
                        error!("{}: {err}", self.label);
                        self.count = 0;
                        return UploadPlan::Skip;
                    }
                }
            }
            UploadPlan::Overwrite { .. } => {
                if let Some(buffer) = &self.buffer {
                    queue.write_buffer(buffer, 0, bytes);
                }
            }
        }
        self.count = data.len() as u32;
        plan
    }

    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Number of elements written by the last upload.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Bind to `slot` and return the element count to draw, if any.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, slot: u32) -> Option<u32> {
        let buffer = self.buffer.as_ref()?;
        if self.count == 0 {
            return None;
        }
        pass.set_vertex_buffer(slot, buffer.slice(..));
        Some(self.count)
    }
}
