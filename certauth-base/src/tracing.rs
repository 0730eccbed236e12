// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging for the `certauth` tools.

use std::{
    env, fmt,
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use is_terminal::IsTerminal as _;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
    EnvFilter,
};

/// How log lines are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
    Pretty,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log format {0:?}, expected `plain`, `json` or `pretty`")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "plain" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(UnknownLogFormat(format.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Plain => "plain",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

/// Where and how to log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// A directory holding a log file, written in addition to the standard error.
    pub directory: Option<PathBuf>,
}

/// Installs the global subscriber.
///
/// Verbosity is read from `RUST_LOG` and defaults to `info`. The standard error is
/// colored when it is a terminal, unless `NO_COLOR` is set. With a log directory, lines
/// are also appended to `<log_name>.log` in it.
pub fn init(log_name: &str, config: &LogConfig) -> io::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let file_layer = match &config.directory {
        Some(directory) => {
            let file = open_log_file(directory, log_name)?;
            Some(formatted_layer(config.format, Arc::new(file), false))
        }
        None => None,
    };
    let stderr_layer = formatted_layer(config.format, io::stderr, stderr_has_colors());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn stderr_has_colors() -> bool {
    let no_color = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    !no_color && io::stderr().is_terminal()
}

fn open_log_file(directory: &Path, log_name: &str) -> io::Result<File> {
    let path = directory.join(log_name).with_extension("log");
    OpenOptions::new().append(true).create(true).open(path)
}

fn formatted_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Plain => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}
