use std::time::Duration;

/// A response held open for manual success/failure marking.
///
/// Starts out successful; the task decides otherwise by calling
/// [`CapturedResponse::failure`].
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    name: String,
    status: u16,
    body: String,
    elapsed: Duration,
    failure: Option<String>,
}

impl CapturedResponse {
    pub fn new(name: impl Into<String>, status: u16, body: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            status,
            body: body.into(),
            elapsed,
            failure: None,
        }
    }

    /// Request name, the path for HTTP requests
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP status, `0` when no response was received
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    pub fn success(&mut self) {
        self.failure = None;
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}
