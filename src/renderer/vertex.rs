//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FUR: [f32; 4] = [0.55, 0.38, 0.22, 1.0];
    pub const FUR_DARK: [f32; 4] = [0.42, 0.28, 0.16, 1.0];
    pub const SNOUT: [f32; 4] = [0.30, 0.20, 0.12, 1.0];
    pub const EYE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const POINTER: [f32; 4] = [0.9, 0.2, 0.2, 0.9];
    pub const GAME_OVER_VEIL: [f32; 4] = [1.0, 1.0, 1.0, 0.85];
}
