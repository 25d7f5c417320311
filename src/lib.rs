#![forbid(unsafe_code)]
//! Push a single metric value, read from stdin, to a Prometheus Pushgateway.
//!
//! The Prometheus exposition format is taken from here:
//! <https://prometheus.io/docs/instrumenting/exposition_formats/>
pub use cli::{
    Args,
    LABELS_ENV_VAR,
};
pub use labels::{
    combine,
    format_label,
    format_labels,
    parse_labels,
    LabelError,
};
pub use push::{
    PushError,
    Pushgateway,
    DEFAULT_GATEWAY_URL,
};
use std::{
    fmt::Display,
    io::BufRead,
};
use tracing::{
    debug,
    info,
};

mod cli;
mod labels;
pub mod logging;
mod push;

/// The possible types of Prometheus metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "snake_case")]
pub enum Type {
    Counter,
    #[default]
    Gauge,
    Untyped,
    Summary,
    Histogram,
}

/// A single metric sample, ready to be pushed.
///
/// Example:
/// ```text
/// # HELP temp Room temp
/// # TYPE temp gauge
/// temp{room="kitchen"} 23.5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Constructor)]
pub struct Metric {
    pub kind: Type,
    /// The HELP line description, no HELP line is written when empty
    pub help_desc: String,
    /// The name of the metric, excluding the labels.
    pub name: String,
    /// Already formatted labels (`key="value",...`), without the braces
    pub labels: String,
    /// The value exactly as it was read
    pub value: String,
}

impl Metric {
    /// The sample line, without the trailing new line.
    ///
    /// Example:
    /// ```text
    /// temp{room="kitchen"} 23.5
    /// ```
    pub fn sample_line(&self) -> String {
        format!("{}{{{}}} {}", self.name, self.labels, self.value)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.help_desc.is_empty() {
            writeln!(f, "# HELP {} {}", self.name, self.help_desc)?;
        }
        writeln!(f, "# TYPE {} {}", self.name, self.kind)?;
        writeln!(f, "{}", self.sample_line())
    }
}

/// The errors that can end a run.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum Error {
    /// A required flag was not given, or was given empty
    #[display(fmt = "{_0} is required")]
    #[from(ignore)]
    MissingArgument(&'static str),
    #[display(fmt = "error parsing labels: {_0}")]
    Label(LabelError),
    #[display(fmt = "error reading metric value from stdin: {_0}")]
    #[from(ignore)]
    InputRead(String),
    #[display(fmt = "{_0}")]
    Push(PushError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Label(err) => Some(err),
            Self::Push(err) => Some(err),
            Self::MissingArgument(_) | Self::InputRead(_) => None,
        }
    }
}

/// Read the metric value: the first line of `input`, without its line ending.
///
/// The value is pushed as text, so a line that is not valid UTF-8 is an `InputRead` error
/// instead of being passed on as raw bytes.
pub fn read_metric_value<R: BufRead>(mut input: R) -> Result<String, Error> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| Error::InputRead(err.to_string()))?;
    if read == 0 {
        return Err(Error::InputRead("no input".into()));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn required<'a>(value: Option<&'a str>, what: &'static str) -> Result<&'a str, Error> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingArgument(what))
}

/// Run a single push: validate the arguments, format the labels, read the value from
/// `input` and push the metric.
///
/// The arguments and labels are checked before `input` is touched.
pub fn run<R: BufRead>(args: &Args, env_labels: &str, input: R) -> Result<Metric, Error> {
    let job = required(args.job.as_deref(), "job name")?;
    let name = required(args.name.as_deref(), "metric name")?;
    let labels = parse_labels(env_labels, &args.labels)?;

    let value = read_metric_value(input)?;
    debug!(%value, "Read metric value");

    let metric = Metric::new(
        args.kind,
        args.help_desc.clone(),
        name.to_owned(),
        labels,
        value,
    );
    Pushgateway::new(&args.gateway)?.push(job, &metric.to_string())?;
    info!(job, metric = %metric.name, "Metric pushed");
    Ok(metric)
}
