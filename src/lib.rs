//! STL to ASCII animation
//!
//! This library loads a triangle mesh from an STL file, spins it through one
//! full turn and rasterizes each step onto a character grid with a depth test
//! and normal shading. The frames can be returned as text or assembled into a
//! looping animated GIF.

pub mod animation;
pub mod config;
pub mod error;
pub mod frame;
pub mod gif;
pub mod mesh;
pub mod renderer;
pub mod shading;
pub mod terminal;

pub use animation::Animator;
pub use config::{AppConfig, GifConfig, RenderConfig};
pub use error::{Error, Result};
pub use frame::Frame;
pub use gif::GifAssembler;
pub use mesh::{Mesh, MeshBuffer};
pub use renderer::{Axis, DepthBuffer, EulerAngles, Rasterizer};
pub use shading::Shader;

use std::path::Path;
use tracing::info;

/// Character ramp from sparsest to densest
pub const ASCII_RAMP: &str = " .,:;i1tfLCG08@";

/// Render a full turn of the mesh at `path` as text frames
pub fn render_ascii_frames<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<Vec<Frame>> {
    let config = RenderConfig {
        width,
        height,
        ..RenderConfig::default()
    };
    render_ascii_frames_with_config(path, &config)
}

/// Like `render_ascii_frames`, with every render setting taken from `config`
pub fn render_ascii_frames_with_config<P: AsRef<Path>>(
    path: P,
    config: &RenderConfig,
) -> Result<Vec<Frame>> {
    let path = path.as_ref();
    let animator = Animator::new(config)?;
    let mesh = MeshBuffer::new(Mesh::load(path)?)?;
    let frames = animator.render(&mesh)?;

    info!(
        path = %path.display(),
        frames = frames.len(),
        "Rendered ASCII frames"
    );
    Ok(frames)
}

/// Render a full turn of the mesh at `path` as an animated GIF
pub fn render_animated_image<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<Vec<u8>> {
    let config = RenderConfig {
        width,
        height,
        ..RenderConfig::default()
    };
    render_animated_image_with_config(path, &config, &GifConfig::default())
}

/// Like `render_animated_image`, with explicit render and GIF settings
pub fn render_animated_image_with_config<P: AsRef<Path>>(
    path: P,
    render: &RenderConfig,
    gif: &GifConfig,
) -> Result<Vec<u8>> {
    let assembler = GifAssembler::new(gif.clone(), &render.ramp)?;
    assembler.check_grid(render.width, render.height)?;
    let frames = render_ascii_frames_with_config(path, render)?;
    let bytes = assembler.encode(&frames)?;

    info!(bytes = bytes.len(), "Assembled animated GIF");
    Ok(bytes)
}
