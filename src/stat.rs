use serde::Serialize;
use tracing::info;

/// Search instrumentation counters: node expansions, goal tests, and
/// newly generated nodes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub expansions: usize,
    pub goal_tests: usize,
    pub generated: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Expansions {:?} Goal tests {:?} New nodes {:?}",
            self.expansions, self.goal_tests, self.generated
        );
    }
}
