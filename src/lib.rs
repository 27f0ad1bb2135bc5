//! Immediate-mode drawing over a retained-mode graphics API, plus the
//! projection and picking math that goes with it.
//!
//! Callers describe each frame procedurally (`rect`, `image`, `draw_box`,
//! `triangle`) against a [`renderer::Renderer`]; the renderer maps every call
//! onto shared unit geometry and two built-in shader programs, and coalesces
//! redundant state changes before they reach the [`renderer::GraphicsBackend`].

pub mod error;
pub mod math;
pub mod renderer;
pub mod settings;
pub mod time;

pub use error::{BackendError, ColorParseError, MathError, RenderError};
pub use renderer::{GraphicsBackend, RecordingBackend, Renderer};
pub use settings::RenderSettings;

/// Installs `env_logger` honoring `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
