use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Invalid configurations rejected at construction time
///
/// Misuse at runtime (stepping a finished episode, out-of-range actions, malformed
/// observations) is a programming error and panics instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("a {size}x{size} grid cannot hold {entities} distinct entities")]
    GridTooSmall { size: usize, entities: usize },

    #[error("step cap must be at least 1")]
    ZeroStepCap,

    #[error("decay rate must be in the interval [0, 1], got {0}")]
    DecayRate(f32),

    #[error("initial value {vi} must not be below final value {vf}")]
    DecayBounds { vi: f32, vf: f32 },
}
