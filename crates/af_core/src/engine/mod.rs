//! Play engine: component world, event bus, tick systems and the
//! [`Simulation`] driver that runs them in a fixed order.

pub mod components;
pub mod events;
pub mod field;
pub mod interrupt;
pub mod loops;
pub mod rng;
pub mod simulation;
pub mod sort_keys;
pub mod state;
pub mod systems;
pub mod telemetry;
pub mod timestep;
pub mod types;
pub mod world;

#[cfg(test)]
pub mod test_fixtures;

pub use components::{ActionCommand, PendingCommand, PlayerAttributes, Role};
pub use events::EventBus;
pub use field::Field;
pub use simulation::Simulation;
pub use state::{BallState, MatchState, PlayKind, PlayPhase, PlayState, WhistleReason};
pub use telemetry::{SimSnapshot, TelemetryEvent, TelemetryRecord};
pub use types::{Direction, EntityId, TeamSide, Vec2};
pub use world::{PlayerSpawn, World};
