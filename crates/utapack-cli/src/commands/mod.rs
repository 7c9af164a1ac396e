//! CLI command implementations

use utapack_core::{Event, Reporter};

pub mod build;
pub mod json_output;
pub mod validate;

/// Forwards every event to two reporters.
pub(crate) struct Tee<A, B>(pub A, pub B);

impl<A: Reporter, B: Reporter> Reporter for Tee<A, B> {
    fn report(&self, event: &Event) {
        self.0.report(event);
        self.1.report(event);
    }
}
