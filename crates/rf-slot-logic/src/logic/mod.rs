//! Game logic variants
//!
//! Both variants share one [`RoundOrchestrator`]; they differ only in how
//! their fixed configuration is defaulted and checked.

pub mod demo_cascade;
pub mod demo_normal;
pub mod fixed;
pub mod orchestrator;

pub use demo_cascade::CascadeLogic;
pub use demo_normal::NormalLogic;
pub use fixed::{FixedConfig, FixedParams};
pub use orchestrator::RoundOrchestrator;
