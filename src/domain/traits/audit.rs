/// Sink for upstream request failures.
///
/// One record per failed fetch: the original message text and the HTTP
/// status the remote API answered with. Implementations must append,
/// never rewrite.
pub trait FailureLog: Send + Sync {
    fn record(&self, message_text: &str, status: u16);
}

/// Log that drops everything, for setups with auditing disabled.
pub struct NullFailureLog;

impl FailureLog for NullFailureLog {
    fn record(&self, _message_text: &str, _status: u16) {}
}
