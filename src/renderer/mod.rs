//! Software rendering module
//!
//! Paints the whole scene procedurally into an RGBA framebuffer which the
//! web front end blits onto the canvas.

pub mod font;
pub mod framebuffer;
pub mod miner;
pub mod palette;
pub mod scene;

pub use framebuffer::{Framebuffer, Rgba};
pub use scene::{RenderOptions, draw_scene};
