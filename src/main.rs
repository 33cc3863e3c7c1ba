mod app;
mod cmd;

use log::warn;
use simple_logger::SimpleLogger;

use crate::app::{App, AppConfig, AppError};

const CONFIG_PATH: &str = "./config.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let (config, config_err) = match AppConfig::load(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    SimpleLogger::new().with_level(config.log_level).init()?;
    if let Some(err) = config_err {
        warn!("Using default config, could not load {CONFIG_PATH}: {err}");
    }

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal).await;
    ratatui::restore();
    result
}
