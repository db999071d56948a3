use hub_ecr_mirror::Logger;
use hub_ecr_mirror::cli::{Args, Runner};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();
    let logger = Logger::from_env(args.verbose);
    logger.init_subscriber();

    let result = match args.into_config() {
        Ok(config) => Runner::new(config, logger.clone()).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            logger.fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
