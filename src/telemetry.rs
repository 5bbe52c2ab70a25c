// src/telemetry.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::QuizError;

/// Installs the global tracing subscriber: stdout always, plus a daily
/// rolling `quiz.log` when `config.log_dir` is set.
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>, QuizError> {
    let env_filter = EnvFilter::try_new(&config.rust_log)
        .map_err(|e| QuizError::Telemetry(e.to_string()))?;
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "quiz.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| QuizError::Telemetry(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter() {
        let config = Config {
            rust_log: "quiz_runner=loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(init_tracing(&config), Err(QuizError::Telemetry(_))));
    }
}
