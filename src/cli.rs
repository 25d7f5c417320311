use crate::{
    push::DEFAULT_GATEWAY_URL,
    Type,
};
use clap::{
    ArgAction,
    Parser,
};

/// The environment variable holding labels added to every pushed metric.
pub const LABELS_ENV_VAR: &str = "PROMPIPE_LABELS";

/// Read a metric value from stdin and push it to a Prometheus Pushgateway.
///
/// `-h` sets the help text of the metric, usage is printed with `--help`.
#[derive(Debug, Clone, Parser, PartialEq)]
#[command(name = "prompipe", version, disable_help_flag = true)]
pub struct Args {
    /// The job name
    #[arg(short = 'j', value_name = "JOB")]
    pub job: Option<String>,

    /// The name of the metric
    #[arg(short = 'n', value_name = "NAME")]
    pub name: Option<String>,

    /// The type of the metric (gauge, counter, etc.)
    #[arg(short = 't', value_name = "TYPE", default_value_t = Type::Gauge)]
    pub kind: Type,

    /// Help text for the metric
    #[arg(short = 'h', value_name = "HELP", default_value = "")]
    pub help_desc: String,

    /// Comma-separated labels in key=value format, added after the ones in PROMPIPE_LABELS
    #[arg(short = 'l', value_name = "LABELS", default_value = "")]
    pub labels: String,

    /// The Pushgateway base URL
    #[arg(long, env = "PROMPIPE_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway: String,

    /// Print help
    // Only registers `--help`, since `-h` is taken by the help text.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}
