// ember-engine - Animated particle background
//
// A field of drifting glow particles with proximity-linked constellation
// lines and click-triggered bursts, simulated and rasterized on the CPU
// into an RGBA buffer, presented through a 2D canvas.
//
// The simulation, rasterizer, and mount lifecycle are host-independent
// and test natively; browser specifics live in web/.

pub mod color;
pub mod config;
pub mod controller;
pub mod host;
pub mod render;
pub mod rng;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::FieldConfig;
pub use controller::{FieldController, RESIZE_DEBOUNCE_MS};
pub use sim::{FrameStats, ParticleField};
