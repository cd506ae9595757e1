/// Errors reported when constructing or reconfiguring an [`crate::Engine`].
///
/// Runtime faults never surface as errors: non-positive sizes clamp to
/// [`crate::MIN_ITEM_SIZE`], out-of-range scroll targets are no-ops and
/// degenerate viewports produce empty windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `lanes` must be at least 1; a zero-lane grid has no item mapping.
    #[error("invalid lane count {lanes}, must be >= 1")]
    InvalidLanes { lanes: usize },
}
