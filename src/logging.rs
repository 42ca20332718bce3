use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, AppResult};

const DEFAULT_FILTER: &str = "branch_lock=info";
const VERBOSE_FILTER: &str = "branch_lock=debug";

/// Installs the global subscriber: stderr always, plus `log_path` when set.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init(log_path: Option<&Path>, verbose: bool) -> AppResult<Option<WorkerGuard>> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), verbose);

    let (file_layer, guard) = match log_path {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|err| AppError::Configuration(format!("failed to initialize logging: {err}")))?;

    Ok(guard)
}

/// An operator-supplied `RUST_LOG` wins; `verbose` only picks the fallback.
fn build_filter(env_directives: Option<String>, verbose: bool) -> EnvFilter {
    env_directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(if verbose {
                VERBOSE_FILTER
            } else {
                DEFAULT_FILTER
            })
        })
}

fn split_log_path(path: &Path) -> AppResult<(&Path, &std::ffi::OsStr)> {
    let file_name = path.file_name().ok_or_else(|| {
        AppError::Configuration(format!("log path {} has no file name", path.display()))
    })?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((directory, file_name))
}
