pub mod config; // Engine and parameter defaults
pub mod dsp;
pub mod engine; // Audio-thread pipeline and control handle
pub mod io;
pub mod routing; // Filter-tap morphing and stereo routing
pub mod scope; // Sample history and triggering
pub mod source;

pub use config::{EngineConfig, ParamDefaults};
pub use engine::{ScopeController, ScopeEngine, ScopeParams};

pub const MAX_BLOCK_SIZE: usize = 2048;
