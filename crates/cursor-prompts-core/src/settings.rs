/// Tunables for the popup controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Title length (in characters) at which suggestions start
    pub suggestion_min_chars: usize,
    /// Maximum number of suggested titles
    pub suggestion_limit: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            suggestion_min_chars: 2,
            suggestion_limit: 5,
        }
    }
}

impl ControllerSettings {
    pub fn with_suggestion_min_chars(mut self, min_chars: usize) -> Self {
        self.suggestion_min_chars = min_chars;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }
}
