// Risk scoring core: classification, metric curves, aggregation and the
// composite index

pub mod algorithmic;
pub mod classifier;
pub mod composite;
pub mod errors;
pub mod metrics;
pub mod traits;
pub mod transforms;

pub use algorithmic::*;
pub use classifier::*;
pub use composite::*;
pub use errors::*;
pub use metrics::*;
pub use traits::*;
pub use transforms::*;

// Risk calculation constants
pub const DEFAULT_RISK_SCORE: f64 = 50.0;
