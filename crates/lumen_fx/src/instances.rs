//! Fixed-capacity instance buffers for GPU upload.

use lumen_math::Mat4;

/// Per-instance model matrix, laid out for a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model_matrix: [[f32; 4]; 4],
}

impl InstanceData {
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            model_matrix: matrix.to_cols_array_2d(),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_matrix)
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

/// A preallocated run of instances of which the first `count` are drawn.
///
/// Slots past `count` keep whatever they last held, the same way a GPU
/// instance buffer is reused between frames.
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    instances: Vec<InstanceData>,
    count: usize,
}

impl InstanceBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: vec![InstanceData::default(); capacity],
            count: 0,
        }
    }

    /// Write slot `index`. Returns false if it is out of capacity.
    pub fn set(&mut self, index: usize, matrix: Mat4) -> bool {
        match self.instances.get_mut(index) {
            Some(slot) => {
                *slot = InstanceData::from_matrix(matrix);
                true
            }
            None => false,
        }
    }

    /// Set the drawn count, clamped to capacity.
    pub fn set_count(&mut self, count: usize) {
        if count > self.instances.len() {
            log::warn!(
                "Instance count {} exceeds capacity {}, clamping",
                count,
                self.instances.len()
            );
        }
        self.count = count.min(self.instances.len());
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.instances.len()
    }

    /// The instances that should be drawn this frame.
    pub fn active(&self) -> &[InstanceData] {
        &self.instances[..self.count]
    }

    pub fn get(&self, index: usize) -> Option<Mat4> {
        self.active().get(index).map(InstanceData::matrix)
    }

    /// Raw bytes of the active instances.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.active())
    }
}
