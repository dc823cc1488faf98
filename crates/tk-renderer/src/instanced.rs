//! Instance buffer management
//!
//! Buffers start small and grow to the next power of two on demand. Past
//! their hard limit the data is truncated with a warning.

use std::marker::PhantomData;

use bytemuck::Pod;

/// GPU instance buffer with count and capacity tracking
pub struct InstanceBuffer<T: Pod> {
    label: String,
    buffer: wgpu::Buffer,
    count: u32,
    capacity: u32,
    max_instances: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    /// Allocate room for `capacity` instances, growable up to `max_instances`
    pub fn new(device: &wgpu::Device, label: &str, capacity: u32, max_instances: u32) -> Self {
        let capacity = capacity.clamp(1, max_instances.max(1));
        Self {
            label: label.to_string(),
            buffer: Self::allocate(device, label, capacity),
            count: 0,
            capacity,
            max_instances: max_instances.max(1),
            _marker: PhantomData,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Instance Buffer")),
            size: (capacity as usize * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the buffer contents, growing it first when needed
    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[T]) {
        let wanted = instances.len();
        let capacity = grown_capacity(self.capacity, wanted, self.max_instances);
        if capacity != self.capacity {
            tracing::debug!("Growing {} instances {} -> {}", self.label, self.capacity, capacity);
            self.buffer = Self::allocate(device, &self.label, capacity);
            self.capacity = capacity;
        }

        if wanted > self.capacity as usize {
            tracing::warn!(
                "{} instance count {} exceeds maximum {}, truncating",
                self.label,
                wanted,
                self.capacity
            );
        }

        let count = wanted.min(self.capacity as usize);
        self.count = count as u32;
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&instances[..count]));
        }
    }

    /// Forget the uploaded instances
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Instances drawn by the next render
    pub fn count(&self) -> u32 {
        self.count
    }

    /// True when nothing would be drawn
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current allocation in instances
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Buffer slice for `set_vertex_buffer`
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// Capacity needed to hold `wanted` instances, never shrinking and never
/// exceeding `max`
pub(crate) fn grown_capacity(current: u32, wanted: usize, max: u32) -> u32 {
    if wanted <= current as usize {
        return current;
    }
    let target = wanted.checked_next_power_of_two().unwrap_or(usize::MAX);
    target.min(max as usize).max(current as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_never_shrinks() {
        assert_eq!(grown_capacity(64, 10, 4096), 64);
        assert_eq!(grown_capacity(64, 64, 4096), 64);
    }

    #[test]
    fn test_capacity_grows_to_power_of_two() {
        assert_eq!(grown_capacity(64, 65, 4096), 128);
        assert_eq!(grown_capacity(64, 1000, 4096), 1024);
    }

    #[test]
    fn test_capacity_capped_at_max() {
        assert_eq!(grown_capacity(64, 5000, 4096), 4096);
        assert_eq!(grown_capacity(4096, 10_000, 4096), 4096);
    }
}
