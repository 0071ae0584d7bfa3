//! observability — optional structured logging (feature `obs_slog`).
//!
//! The numerical modules never print. When the `obs_slog` feature is on,
//! [`LKJCholesky::with_logger`](crate::distributions::lkj::LKJCholesky::with_logger)
//! accepts any `slog::Logger`; [`term_logger`] builds the usual non-blocking
//! terminal logger for interactive use.
use slog::{Drain, Level, Logger, o};

/// Non-blocking stderr logger at `Debug` level.
pub fn term_logger() -> Logger {
    term_logger_at(Level::Debug)
}

/// Non-blocking stderr logger that drops records below `level`.
pub fn term_logger_at(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().filter_level(level).ignore_res();
    Logger::root(drain, o!("crate" => "lkj_cholesky"))
}
