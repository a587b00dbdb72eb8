use anyhow::Result;

use wafer_loader::report::generate_report;
use wafer_loader::Settings;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Settings::from_env()?.report;
    match generate_report(&config) {
        Ok(_) => Ok(()),
        Err(e) if e.is_execution_failure() => {
            log::error!("Error executing notebook: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
