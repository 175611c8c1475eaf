//! Execution settings shared by the dataset operations.

/// Chooses between the sequential and rayon-parallel engine paths.
///
/// # Example
///
/// ```rust
/// use ij_ops::EngineConfig;
///
/// let cfg = EngineConfig::default();
/// assert!(cfg.use_parallel(1 << 20) == cfg!(feature = "parallel"));
/// assert!(!EngineConfig::sequential().use_parallel(1 << 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Allow the parallel path when the `parallel` feature is compiled in.
    pub parallel: bool,
    /// Regions with fewer samples always run sequentially.
    pub min_parallel_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_samples: 64 * 1024,
        }
    }
}

impl EngineConfig {
    /// Configuration that never uses the parallel path.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Whether a region of `samples` samples should run in parallel.
    pub fn use_parallel(&self, samples: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && samples >= self.min_parallel_samples
    }
}
