/// Shown until the first submission completes.
pub const NO_RESULT_TEXT: &str = "No result yet";

/// Shown for every failed request, whatever the cause.
pub const FAILURE_TEXT: &str = "API request failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub result: Option<String>,
    pub awaiting_response: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Text for the result area: the latest outcome or the placeholder.
    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or(NO_RESULT_TEXT)
    }
}
