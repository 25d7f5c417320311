use clap::{
    CommandFactory,
    Parser,
};
use prompipe::{
    logging::init_logging,
    run,
    Args,
    Error,
    LABELS_ENV_VAR,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    init_logging();

    let env_labels = std::env::var(LABELS_ENV_VAR).unwrap_or_default();
    match run(&args, &env_labels, std::io::stdin().lock()) {
        Ok(metric) => {
            println!(
                "Metric pushed to Pushgateway successfully: {}",
                metric.sample_line()
            );
            ExitCode::SUCCESS
        }
        Err(err @ Error::MissingArgument(_)) => {
            eprintln!("Error: {err}");
            eprintln!("{}", Args::command().render_usage());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
