//! CPU rasterizer for ASCII frames
//!
//! Each mesh vertex is centered, rotated and projected orthographically onto
//! the character grid. A per-cell depth test keeps the vertex nearest to the
//! viewer, who looks down -z from +z, and its normal is later shaded.

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::mesh::MeshBuffer;
use crate::shading::Shader;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis a mesh spins about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

/// Rotation angles in radians
///
/// The composed rotation is `Rx * Ry * Rz`: a vector is turned about z
/// first, then y, then x. Every frame uses the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerAngles {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A rotation about a single axis, the others held at zero
    pub fn about(axis: Axis, angle: f32) -> Self {
        match axis {
            Axis::X => Self::new(angle, 0.0, 0.0),
            Axis::Y => Self::new(0.0, angle, 0.0),
            Axis::Z => Self::new(0.0, 0.0, angle),
        }
    }

    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.z)
    }
}

/// Nearest depth and its normal for every grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    normals: Vec<Vector3<f32>>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; width * height],
            normals: vec![Vector3::zeros(); width * height],
        }
    }

    /// Clear every cell back to infinite depth and a zero normal
    pub fn reset(&mut self) {
        self.depth.fill(f32::INFINITY);
        self.normals.fill(Vector3::zeros());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    pub fn normal_at(&self, x: usize, y: usize) -> Vector3<f32> {
        self.normals[y * self.width + x]
    }
}

/// Projects a mesh onto a fixed `width` x `height` character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    width: usize,
    height: usize,
    flip_vertical: bool,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::invalid_param("width", width, "must be at least 1"));
        }
        if height == 0 {
            return Err(Error::invalid_param("height", height, "must be at least 1"));
        }
        if width.checked_mul(height).is_none() {
            return Err(Error::invalid_param(
                "grid",
                format!("{}x{}", width, height),
                "too many cells",
            ));
        }
        Ok(Self {
            width,
            height,
            flip_vertical: false,
        })
    }

    /// Put mesh-space +y at the top row instead of the bottom
    pub fn with_flip_vertical(mut self, flip: bool) -> Self {
        self.flip_vertical = flip;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Allocate a depth buffer matching this grid
    pub fn buffer(&self) -> DepthBuffer {
        DepthBuffer::new(self.width, self.height)
    }

    /// Populate `buffer` with the nearest vertex per cell for one set of angles.
    ///
    /// The buffer is not cleared here; call [`DepthBuffer::reset`] between frames.
    pub fn rasterize(
        &self,
        mesh: &MeshBuffer,
        angles: EulerAngles,
        buffer: &mut DepthBuffer,
    ) -> Result<()> {
        if buffer.width != self.width || buffer.height != self.height {
            return Err(Error::BufferMismatch {
                width: self.width,
                height: self.height,
                actual_width: buffer.width,
                actual_height: buffer.height,
            });
        }

        let rotation = angles.rotation();
        let center = mesh.center();
        let size = mesh.size();

        for (position, normal) in mesh.positions().iter().zip(mesh.normals()) {
            let v = rotation * (position - center);
            let Some(index) = self.cell_index(&v, &size) else {
                continue;
            };

            // Strictly nearer only: the first vertex seen at a depth keeps the cell
            let depth = -v.z;
            if depth < buffer.depth[index] {
                buffer.depth[index] = depth;
                buffer.normals[index] = (rotation * *normal)
                    .try_normalize(0.0)
                    .unwrap_or_else(Vector3::zeros);
            }
        }

        Ok(())
    }

    /// Convert a populated buffer into a frame
    pub fn shade(&self, buffer: &DepthBuffer, shader: &Shader) -> Frame {
        let cells = buffer.normals.iter().map(|n| shader.shade(n)).collect();
        Frame::from_cells(buffer.width, buffer.height, cells)
    }

    /// Reset, rasterize and shade one frame
    pub fn render_frame(
        &self,
        mesh: &MeshBuffer,
        angles: EulerAngles,
        shader: &Shader,
        buffer: &mut DepthBuffer,
    ) -> Result<Frame> {
        buffer.reset();
        self.rasterize(mesh, angles, buffer)?;
        Ok(self.shade(buffer, shader))
    }

    fn cell_index(&self, v: &Vector3<f32>, size: &Vector3<f32>) -> Option<usize> {
        let col = grid_coord(v.x / size.x, self.width)?;
        let mut row = grid_coord(v.y / size.y, self.height)?;
        if self.flip_vertical {
            row = self.height - 1 - row;
        }
        Some(row * self.width + col)
    }
}

/// Map a centered, extent-normalized coordinate onto `0..cells`.
///
/// Rounds half up. Anything off the grid (including NaN) is `None`.
fn grid_coord(t: f32, cells: usize) -> Option<usize> {
    let v = ((t + 0.5) * (cells - 1) as f32 + 0.5).floor();
    if v >= 0.0 && v < cells as f32 {
        Some(v as usize)
    } else {
        None
    }
}
