use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use phosphor_dsp::io::{load_wav, AudioDriver, CpalDriver};
use phosphor_dsp::source::TestSignal;
use phosphor_dsp::{EngineConfig, ScopeEngine};

use crate::ui::UiApp;

/// How long quitting waits for the output to fade.
const SHUTDOWN_WAIT: Duration = Duration::from_millis(250);

pub struct Phosphor {
    config: EngineConfig,
    clip_path: Option<PathBuf>,
}

impl Phosphor {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            clip_path: None,
        }
    }

    /// Play a WAV file instead of the built-in test signal.
    pub fn clip(mut self, path: Option<PathBuf>) -> Self {
        self.clip_path = path;
        self
    }

    pub fn run(self) -> EyreResult<()> {
        let mut driver = CpalDriver::open_default()?;
        let config = self.config.with_sample_rate(driver.sample_rate());
        let (engine, mut controller) = ScopeEngine::new(&config);

        let source_label = match &self.clip_path {
            Some(path) => {
                let clip = load_wav(path)
                    .wrap_err_with(|| format!("could not load {}", path.display()))?;
                controller.set_source(clip)?;
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".into())
            }
            None => {
                controller.set_source(TestSignal::new(config.sample_rate))?;
                "test signal".into()
            }
        };

        driver.start(engine)?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(&mut controller, source_label).run(&mut terminal);
        ratatui::restore();

        if !controller.shutdown(SHUTDOWN_WAIT) {
            log::warn!("stopping the stream before the fade finished");
        }
        driver.stop()?;
        result
    }
}

impl Default for Phosphor {
    fn default() -> Self {
        Self::new()
    }
}
