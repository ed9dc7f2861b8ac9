use tracing::trace;

// Counters are emitted as trace events on the `sanbi.metrics` target so an
// exporter can be attached later without touching call sites.

pub fn inc_searches(mode: &'static str) {
    trace!(target = "sanbi.metrics", mode = mode, "searches_total_inc");
}

pub fn search_outcome(mode: &'static str, degraded: bool) {
    trace!(
        target = "sanbi.metrics",
        mode = mode,
        degraded = degraded,
        "search_outcome"
    );
}

pub fn stage_elapsed(stage: &'static str, elapsed_ms: u128) {
    trace!(
        target = "sanbi.metrics",
        stage = stage,
        elapsed_ms = elapsed_ms as u64,
        "stage_elapsed"
    );
}
