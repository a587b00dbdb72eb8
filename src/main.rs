use anyhow::Result;

use wafer_loader::{load_process_data, persist_if_present, Fetcher, Settings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Settings::from_env()?.loader;
    let fetcher = Fetcher::new(config.http_timeout());

    // A failed download is reported and ends the run normally, without a backup.
    let table = load_process_data(&config, &fetcher);
    persist_if_present(table.as_ref(), &config.output_path)?;
    Ok(())
}
