//! ECS компоненты агента
//!
//! - actor: Actor (faction + required combat state), Health
//! - sensors: host-written показания (ground, cover candidate, aim target)

pub mod actor;
pub mod sensors;

pub use actor::*;
pub use sensors::*;
