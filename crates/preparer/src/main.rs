use preparer::{get_config_info, prepare_dataset, setup_logger};
use slog::{error, info};

fn main() -> Result<(), anyhow::Error> {
    let cli = get_config_info();
    let logger = setup_logger(&cli);

    let input = cli.input();
    let output = cli.output();
    info!(logger, "Dataset preparer starting...");
    info!(logger, "  Input: {}", input.display());
    info!(logger, "  Output: {}", output.display());
    info!(logger, "  Batch size: {}", cli.batch_size());

    match prepare_dataset(&logger, &input, &output, cli.batch_size()) {
        Ok(report) => {
            info!(
                logger,
                "Data preparation complete, {} rows ready for the almanac", report.rows_written
            );
            Ok(())
        }
        Err(err) => {
            error!(logger, "FATAL: {}", err);
            Err(err)
        }
    }
}
