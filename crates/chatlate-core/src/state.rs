use crate::types::RecognizedText;

/// Text carried from one iteration to the next
#[derive(Debug, Default)]
pub struct PipelineState {
    previous: RecognizedText,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> &RecognizedText {
        &self.previous
    }

    /// Replace the carried text; call only once an iteration has succeeded
    pub fn advance(&mut self, current: RecognizedText) {
        self.previous = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let state = PipelineState::new();
        assert!(state.previous().is_empty());
        assert_eq!(state.previous().iteration(), 0);
    }

    #[test]
    fn test_advance_replaces_previous() {
        let mut state = PipelineState::new();
        state.advance(RecognizedText::new("gg", 1));
        state.advance(RecognizedText::new("wp", 2));

        assert_eq!(state.previous().text(), "wp");
        assert_eq!(state.previous().iteration(), 2);
    }
}
