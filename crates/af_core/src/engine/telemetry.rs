//! Telemetry & Snapshots
//!
//! Observation-only output for hosts: a closed [`TelemetryEvent`] stream
//! collected at the end of each tick, and a serializable [`SimSnapshot`] of
//! everything a renderer or replay needs.
//!
//! ## Usage
//! ```text
//! sim.step()?;
//! let events = sim.drain_telemetry();
//! let json = sim.snapshot().to_json()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::events::{
    EventBus, FumbleEvent, GameEndedEvent, HalftimeEvent, PassResolvedEvent, PickupEvent, PlayEndedEvent,
    QuarterEndedEvent, TackleEvent,
};
use crate::engine::state::{BallState, MatchState, PlayState};
use crate::engine::types::{EntityId, Vec2};
use crate::engine::world::World;
use crate::error::Result;

// ============================================================================
// Telemetry events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    Tackle(TackleEvent),
    Fumble(FumbleEvent),
    Pickup(PickupEvent),
    PassResolved(PassResolvedEvent),
    PlayEnded(PlayEndedEvent),
    QuarterEnded(QuarterEndedEvent),
    Halftime,
    GameEnded(GameEndedEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub tick: u64,
    pub event: TelemetryEvent,
}

/// Copy this tick's telemetry-visible events into `out`, grouped by kind
/// in tick order.
pub fn capture(bus: &EventBus, tick: u64, out: &mut Vec<TelemetryRecord>) {
    let mut push = |event| out.push(TelemetryRecord { tick, event });
    bus.read::<TackleEvent>().iter().for_each(|e| push(TelemetryEvent::Tackle(*e)));
    bus.read::<FumbleEvent>().iter().for_each(|e| push(TelemetryEvent::Fumble(*e)));
    bus.read::<PickupEvent>().iter().for_each(|e| push(TelemetryEvent::Pickup(*e)));
    bus.read::<PassResolvedEvent>().iter().for_each(|e| push(TelemetryEvent::PassResolved(*e)));
    bus.read::<PlayEndedEvent>().iter().for_each(|e| push(TelemetryEvent::PlayEnded(*e)));
    bus.read::<QuarterEndedEvent>().iter().for_each(|e| push(TelemetryEvent::QuarterEnded(*e)));
    bus.read::<HalftimeEvent>().iter().for_each(|_| push(TelemetryEvent::Halftime));
    bus.read::<GameEndedEvent>().iter().for_each(|e| push(TelemetryEvent::GameEnded(*e)));
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub has_ball: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vec2,
    pub height: f32,
    pub state: BallState,
    pub owner: Option<EntityId>,
}

/// Read-only view of the simulation after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub match_state: MatchState,
    pub play: PlayState,
    pub game_state: String,
    pub phase_state: String,
    /// Players, ascending id
    pub entities: Vec<EntitySnapshot>,
    pub ball: Option<BallSnapshot>,
}

impl SimSnapshot {
    pub fn capture(
        tick: u64,
        world: &World,
        match_state: &MatchState,
        play: &PlayState,
        game_state: &str,
        phase_state: &str,
    ) -> Self {
        let entities = world
            .player_ids()
            .into_iter()
            .map(|id| EntitySnapshot {
                id,
                position: world.positions.get(id).copied().unwrap_or_default(),
                velocity: world.velocities.get(id).copied().unwrap_or_default(),
                has_ball: world.has_ball.get(id).copied().unwrap_or(false),
            })
            .collect();
        let ball = world.ball_id().and_then(|id| {
            let ball = world.ball.get(id)?;
            Some(BallSnapshot {
                position: world.positions.get(id).copied().unwrap_or_default(),
                height: ball.height,
                state: ball.state,
                owner: ball.owner,
            })
        });
        Self {
            tick,
            match_state: match_state.clone(),
            play: play.clone(),
            game_state: game_state.to_string(),
            phase_state: phase_state.to_string(),
            entities,
            ball,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Role;
    use crate::engine::events::TackleOutcome;
    use crate::engine::test_fixtures::Fixture;
    use crate::engine::types::TeamSide;

    #[test]
    fn test_capture_is_closed_and_tagged() {
        let mut bus = EventBus::new();
        bus.publish(HalftimeEvent);
        bus.publish(TackleEvent {
            play_id: 3,
            tackler: EntityId(4),
            carrier: EntityId(9),
            outcome: TackleOutcome::Broken,
            attempt: 1,
            position: Vec2::new(1.0, 2.0),
            bonus_yards: 0.0,
        });
        let mut out = Vec::new();
        capture(&bus, 42, &mut out);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].event, TelemetryEvent::Tackle(_)));
        assert_eq!(out[1], TelemetryRecord { tick: 42, event: TelemetryEvent::Halftime });

        let json = serde_json::to_value(&out[1]).unwrap();
        assert_eq!(json["event"]["type"], "halftime");
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut f = Fixture::live();
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(300.0, 200.0));
        f.give_ball(rb);
        let snap = SimSnapshot::capture(7, &f.world, &f.match_state, &f.play, "first_half", "live_play");
        assert_eq!(snap.entities.len(), 1);
        assert!(snap.entities[0].has_ball);

        let json = snap.to_json().unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
