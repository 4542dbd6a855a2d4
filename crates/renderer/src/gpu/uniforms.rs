use bytemuck::{Pod, Zeroable};

use crate::runtime::TimeSample;

/// Mirrors the `FrameParams` uniform block every fragment shader may declare
/// at `set = 0, binding = 0`. Padded to the 16-byte std140 block size.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub current: f32,
    pub _padding: [f32; 3],
}

impl FrameUniforms {
    pub fn from_sample(sample: TimeSample) -> Self {
        Self {
            current: sample.seconds,
            _padding: [0.0; 3],
        }
    }
}
