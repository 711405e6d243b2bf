use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};
use sum_native::{closed_form_sum, Bound, Method, RangeError, RangeSpec};
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("could not parse {var}={value:?}")]
    InvalidEnv { var: String, value: String },
    #[error("{method} sum {measured} disagrees with closed form {closed_form}")]
    Mismatch {
        method: Method,
        measured: i128,
        closed_form: i128,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Which literal range a binary sums when no bounds are configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// `[0, 50000000)`
    HalfOpen,
    /// `[1, 50000000]`
    Inclusive,
}

impl Variant {
    /// Binary name, also used as the stats label.
    pub fn program(&self) -> &'static str {
        match self {
            Variant::HalfOpen => "sum",
            Variant::Inclusive => "sum-inclusive",
        }
    }

    pub fn default_bounds(&self) -> (i64, i64) {
        match self {
            Variant::HalfOpen => (0, 50_000_000),
            Variant::Inclusive => (1, 50_000_000),
        }
    }

    pub fn spec(&self, start: i64, end: i64) -> Result<RangeSpec, RangeError> {
        match self {
            Variant::HalfOpen => RangeSpec::half_open(start, end),
            Variant::Inclusive => RangeSpec::inclusive(start, end),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub spec: RangeSpec,
    pub method: Method,
    pub stats: bool,
}

impl Config {
    pub fn from_env(variant: Variant) -> Result<Self, ScriptError> {
        Self::from_lookup(variant, |var| {
            std::env::var_os(var).map(|v| v.to_string_lossy().into_owned())
        })
    }

    /// Resolves `SUM_START`, `SUM_END`, `SUM_METHOD` and `SUM_STATS` through
    /// `lookup`, falling back to the variant's literal bounds.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (def_start, def_end) = variant.default_bounds();
        let start = env_or(&lookup, "SUM_START", def_start)?;
        let end = env_or(&lookup, "SUM_END", def_end)?;
        let method = match lookup("SUM_METHOD") {
            Some(s) => s.parse::<Method>()?,
            None => Method::default(),
        };
        let stats = lookup("SUM_STATS").is_some_and(|s| !s.is_empty() && s != "0");

        Ok(Config {
            spec: variant.spec(start, end)?,
            method,
            stats,
        })
    }
}

fn env_or<F, T>(lookup: &F, var: &str, def: T) -> Result<T, ScriptError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(s) => s.trim().parse::<T>().map_err(|_| ScriptError::InvalidEnv {
            var: var.to_string(),
            value: s,
        }),
        None => Ok(def),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingResult {
    pub sum: i128,
    pub elapsed: Duration,
}

impl TimingResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[derive(Serialize)]
pub struct Stats {
    program: &'static str,
    start: i64,
    end: i64,
    inclusive: bool,
    end_exclusive: i128,
    n: u128,
    method: &'static str,
    sum: i128,
    time_secs: f64,
}

impl Stats {
    pub fn new(program: &'static str, config: &Config, result: &TimingResult) -> Self {
        Stats {
            program,
            start: config.spec.start(),
            end: config.spec.end(),
            inclusive: config.spec.bound() == Bound::Inclusive,
            end_exclusive: config.spec.end_exclusive(),
            n: config.spec.len(),
            method: config.method.as_str(),
            sum: result.sum,
            time_secs: result.elapsed_secs(),
        }
    }
}

pub fn format_elapsed(secs: f64) -> String {
    format!("{secs:.4}")
}

/// Times `method` over `spec` and writes the two-line report to `out`.
pub fn run_with<W: Write>(
    spec: RangeSpec,
    method: Method,
    out: &mut W,
) -> Result<TimingResult, ScriptError> {
    let it = Instant::now();
    let sum = method.sum(&spec);
    let elapsed = it.elapsed();
    let result = TimingResult { sum, elapsed };

    writeln!(out, "Sum: {sum}")?;
    writeln!(
        out,
        "Time taken: {} seconds",
        format_elapsed(result.elapsed_secs())
    )?;
    out.flush()?;
    Ok(result)
}

pub fn run_and_report(spec: RangeSpec) -> Result<TimingResult, ScriptError> {
    run_with(spec, Method::default(), &mut io::stdout().lock())
}

/// Checks a measured sum against the arithmetic series for the same range.
/// A closed-form measurement has nothing independent to compare with and
/// always passes.
pub fn verify(
    spec: &RangeSpec,
    method: Method,
    result: &TimingResult,
) -> Result<(), ScriptError> {
    if method == Method::ClosedForm {
        return Ok(());
    }
    let closed_form = closed_form_sum(spec.start(), spec.end_exclusive());
    if result.sum != closed_form {
        return Err(ScriptError::Mismatch {
            method,
            measured: result.sum,
            closed_form,
        });
    }
    Ok(())
}

/// Logs go to stderr; stdout carries only the report.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(variant: Variant) -> Result<(), ScriptError> {
    let config = Config::from_env(variant)?;
    debug!(
        program = variant.program(),
        range = %config.spec,
        method = %config.method,
        empty = config.spec.is_empty(),
        "resolved configuration"
    );

    let result = run_with(config.spec, config.method, &mut io::stdout().lock())?;
    info!(
        sum = %result.sum,
        elapsed_secs = result.elapsed_secs(),
        "{} over {}",
        config.method,
        config.spec
    );

    verify(&config.spec, config.method, &result)?;

    if config.stats {
        let stats = Stats::new(variant.program(), &config, &result);
        let line = serde_json::to_string(&stats).map_err(io::Error::other)?;
        writeln!(io::stderr().lock(), "{line}")?;
    }
    Ok(())
}
