//! flowprep entrypoint: one batch run over the configured daily flow files.
//! Config path comes from FLOWPREP_CONFIG_PATH (default `config.json`).

use flowprep::{config::PipelineConfig, logging::StructuredLogger, pipeline::Pipeline};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("FLOWPREP_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = PipelineConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        config = %config_path.display(),
        table = %config.output.table_path.display(),
        schema = %config.output.schema_path.display(),
        "flowprep starting"
    );

    let pipeline = Pipeline::new(config);
    let report = match pipeline.run() {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "pipeline run failed");
            return Err(e.into());
        }
    };

    StructuredLogger::emit_json(&report, &mut std::io::stdout());
    Ok(())
}
