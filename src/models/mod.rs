pub mod algorithmic;
pub mod market_inputs;
pub mod protocol;
pub mod risk_inputs;
pub mod stablecoin;

pub use algorithmic::*;
pub use market_inputs::*;
pub use protocol::*;
pub use risk_inputs::*;
pub use stablecoin::*;
