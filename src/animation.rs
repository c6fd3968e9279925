//! Full-turn animation sweep

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::mesh::MeshBuffer;
use crate::renderer::{Axis, EulerAngles, Rasterizer};
use crate::shading::Shader;
use rayon::prelude::*;
use std::f32::consts::TAU;
use tracing::debug;

/// Renders `steps` evenly spaced frames of one full rotation
pub struct Animator {
    rasterizer: Rasterizer,
    shader: Shader,
    axis: Axis,
    steps: usize,
    parallel: bool,
}

impl Animator {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        if config.steps == 0 {
            return Err(Error::invalid_param("steps", config.steps, "must be at least 1"));
        }
        let rasterizer =
            Rasterizer::new(config.width, config.height)?.with_flip_vertical(config.flip_vertical);

        Ok(Self {
            rasterizer,
            shader: Shader::new(&config.ramp)?,
            axis: config.axis,
            steps: config.steps,
            parallel: config.parallel,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Angles for step `i`: `i / steps` of a full turn about the configured axis
    pub fn angles(&self, step: usize) -> EulerAngles {
        EulerAngles::about(self.axis, step as f32 / self.steps as f32 * TAU)
    }

    /// Render every step in order. Any failed frame fails the whole sequence.
    pub fn render(&self, mesh: &MeshBuffer) -> Result<Vec<Frame>> {
        debug!(
            width = self.rasterizer.width(),
            height = self.rasterizer.height(),
            steps = self.steps,
            axis = ?self.axis,
            parallel = self.parallel,
            "Rendering animation"
        );

        if self.parallel {
            // Each task owns its buffer; indexed collect keeps step order
            (0..self.steps)
                .into_par_iter()
                .map(|step| {
                    let mut buffer = self.rasterizer.buffer();
                    self.rasterizer
                        .render_frame(mesh, self.angles(step), &self.shader, &mut buffer)
                })
                .collect()
        } else {
            let mut buffer = self.rasterizer.buffer();
            (0..self.steps)
                .map(|step| {
                    self.rasterizer
                        .render_frame(mesh, self.angles(step), &self.shader, &mut buffer)
                })
                .collect()
        }
    }
}
