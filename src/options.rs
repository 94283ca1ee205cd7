/// Configures retry behavior for job launches and result exports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Maximum number of retries after the initial attempt.
    pub retry_limit: usize,
    /// Fixed delay between attempts in milliseconds.
    pub retry_timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            retry_limit: 5,
            retry_timeout_ms: 60_000,
        }
    }
}
