use std::fmt::Write;

/// Renders an error followed by its `source()` chain, e.g. `outer: middle: inner`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, ": {cause}");
        source = cause.source();
    }
    rendered
}

/// Drops an error after logging it, keeping only the success value.
pub trait LogOnErr<T> {
    /// Logs the full error chain at error level, prefixed with `context`.
    fn log_err(self, context: &str) -> Option<T>;
}

impl<T, E> LogOnErr<T> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn log_err(self, context: &str) -> Option<T> {
        self.map_err(|err| log::error!("{context}: {}", error_chain(&err)))
            .ok()
    }
}
