use std::sync::Arc;

use opentelemetry::{KeyValue, global, metrics::Counter};

use daytrade_types::{OperationType, SquareColor};

#[derive(Debug)]
pub struct MetricsRegistry {
    pub journal: Arc<JournalMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            journal: JournalMetrics::new(),
        })
    }
}

#[derive(Debug)]
pub struct JournalMetrics {
    operations_recorded: Counter<u64>,
    cycles_advanced: Counter<u64>,
    journal_resets: Counter<u64>,
}

impl JournalMetrics {
    fn new() -> Arc<Self> {
        let meter = global::meter("daytrade-journal");
        let operations_recorded = meter
            .u64_counter("operations_recorded_total")
            .with_description("Number of daily outcomes recorded")
            .with_unit("count")
            .init();

        let cycles_advanced = meter
            .u64_counter("cycles_advanced_total")
            .with_description("Number of confirmed cycle transitions, including restarts")
            .with_unit("count")
            .init();

        let journal_resets = meter
            .u64_counter("journal_resets_total")
            .with_description("Number of journals wiped by the user")
            .with_unit("count")
            .init();

        Arc::new(Self {
            operations_recorded,
            cycles_advanced,
            journal_resets,
        })
    }

    pub fn record_operation(
        &self,
        operation_type: OperationType,
        color: SquareColor,
        coverage_fallback: bool,
    ) {
        self.operations_recorded.add(
            1,
            &[
                KeyValue::new("operation_type", operation_type.to_string()),
                KeyValue::new("square_color", color.to_string()),
                KeyValue::new("coverage_fallback", coverage_fallback),
            ],
        );
    }

    pub fn record_cycle_advanced(&self, transition: CycleTransition) {
        self.cycles_advanced.add(
            1,
            &[KeyValue::new("transition", transition.as_str().to_string())],
        );
    }

    pub fn record_reset(&self) {
        self.journal_resets.add(1, &[]);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CycleTransition {
    Next,
    Restart,
}

impl CycleTransition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_record_without_an_exporter() {
        let registry = MetricsRegistry::new();
        registry
            .journal
            .record_operation(OperationType::Loss, SquareColor::Red, true);
        registry.journal.record_cycle_advanced(CycleTransition::Next);
        registry.journal.record_cycle_advanced(CycleTransition::Restart);
        registry.journal.record_reset();
        assert_eq!(CycleTransition::Restart.as_str(), "restart");
    }
}
