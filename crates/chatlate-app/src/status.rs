use std::fmt;
use std::time::SystemTime;

/// Counters kept by the loop controller, logged when it stops
#[derive(Clone, Debug, Default)]
pub struct LoopStatus {
    pub iterations: u64,
    pub translations: u64,
    pub failures: u64,
    pub last_capture_time: Option<SystemTime>,
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} translations, {} failures",
            self.iterations, self.translations, self.failures
        )
    }
}
