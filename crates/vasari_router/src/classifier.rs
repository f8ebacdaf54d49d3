//! Fault classification policy.

use vasari_error::{VasariError, VasariErrorKind};
use vasari_interface::FaultClassifier;

/// Default classification: backend errors are classified by their own
/// taxonomy; everything else (config, builder, router-internal) is
/// treated as non-transient so a broken setup fails over immediately
/// instead of burning retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFaultClassifier;

impl FaultClassifier for DefaultFaultClassifier {
    fn is_transient(&self, error: &VasariError) -> bool {
        match error.kind() {
            VasariErrorKind::Backend(backend) => backend.kind.is_transient(),
            _ => false,
        }
    }

    fn is_non_transient(&self, error: &VasariError) -> bool {
        !self.is_transient(error)
    }
}
