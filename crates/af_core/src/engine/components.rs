//! Component types stored per entity in the [`World`](crate::engine::world::World).

use serde::{Deserialize, Serialize};

use crate::engine::state::BallState;
use crate::engine::types::{EntityId, TeamSide, Vec2};

// ============================================================================
// Player identity
// ============================================================================

/// Field role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    Cornerback,
    Safety,
    Kicker,
}

impl Role {
    /// Linemen are never pass targets.
    pub fn is_eligible_receiver(self) -> bool {
        !matches!(self, Role::OffensiveLine)
    }
}

/// Team membership plus the in-play offense flag.
///
/// `on_offense` starts each play as `side == possession` and flips when the
/// defense takes the ball mid-play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub side: TeamSide,
    pub on_offense: bool,
}

/// Player ratings (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub hitting_power: u8,
    pub running_speed: u8,
    pub max_speed: u8,
    pub ball_control: u8,
    pub receiving: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self { hitting_power: 50, running_speed: 50, max_speed: 50, ball_control: 50, receiving: 50 }
    }
}

// ============================================================================
// Behavior
// ============================================================================

/// What a player is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Idle,
    Running,
    Scrambling,
    /// Locked in a block
    Engaged,
    /// Wrapping up a carrier
    Tackling,
    /// Carrier being wrapped up
    Grappling,
    Diving,
}

/// Full restorable behavior state; interrupts snapshot this by value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Behavior {
    pub state: BehaviorState,
    pub timer: f32,
    pub target_position: Option<Vec2>,
    pub target_entity: Option<EntityId>,
}

impl Behavior {
    pub fn with_state(state: BehaviorState) -> Self {
        Self { state, ..Default::default() }
    }
}

// ============================================================================
// Movement
// ============================================================================

/// Desired movement written by input/AI. `direction` is normalized on use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementIntent {
    pub direction: Vec2,
}

/// Per-player movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementTuning {
    /// Multiplies the rating-derived top speed
    pub speed_scale: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self { speed_scale: 1.0 }
    }
}

/// Timed speed multiplier (stumble, sprint burst, juke)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedModifier {
    pub multiplier: f32,
    pub remaining: f32,
}

/// Active speed modifiers; the effective multiplier is their product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedModifiers {
    pub active: Vec<SpeedModifier>,
}

impl SpeedModifiers {
    pub fn add(&mut self, multiplier: f32, seconds: f32) {
        if seconds > 0.0 {
            self.active.push(SpeedModifier { multiplier, remaining: seconds });
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.active.iter().map(|m| m.multiplier).product()
    }

    /// Count down and drop expired modifiers.
    pub fn tick(&mut self, dt: f32) {
        for m in &mut self.active {
            m.remaining -= dt;
        }
        self.active.retain(|m| m.remaining > 0.0);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

// ============================================================================
// Action commands
// ============================================================================

/// Discrete action requested by input/AI for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionCommand {
    #[default]
    None,
    Tackle,
    Dive,
    SprintBurst,
    JukeCut,
    Snap,
    Pass,
    Pitch,
    Scramble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingCommand {
    pub command: ActionCommand,
    pub target: Option<EntityId>,
}

impl PendingCommand {
    pub fn new(command: ActionCommand) -> Self {
        Self { command, target: None }
    }

    pub fn targeting(command: ActionCommand, target: EntityId) -> Self {
        Self { command, target: Some(target) }
    }
}

/// Command slot: pending input, last applied command and the action lockout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandSlot {
    pub pending: PendingCommand,
    pub last_applied: PendingCommand,
    /// Seconds before another burst-type action may be applied
    pub action_timer: f32,
}

// ============================================================================
// Ball
// ============================================================================

/// Flight model of the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightKind {
    Lob,
    Bullet,
    Kick,
}

/// Parametric flight descriptor. Rewritten as a whole when a flight starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallFlight {
    pub kind: FlightKind,
    pub start: Vec2,
    pub end: Vec2,
    pub duration: f32,
    pub apex: f32,
    pub elapsed: f32,
    pub complete: bool,
    pub thrower: Option<EntityId>,
    pub intended_target: Option<EntityId>,
    pub fallback_targets: Vec<EntityId>,
}

impl BallFlight {
    /// Normalized progress `s ∈ [0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn position(&self) -> Vec2 {
        self.start.lerp(self.end, self.progress())
    }

    /// Cosmetic arc height `4 × apex × s × (1 − s)`
    pub fn height(&self) -> f32 {
        let s = self.progress();
        4.0 * self.apex * s * (1.0 - s)
    }
}

/// Ball entity data. `state`/`owner` mirror `PlayState` and are written only
/// by the ball sync step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    pub height: f32,
    pub flight: Option<BallFlight>,
    pub state: BallState,
    pub owner: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(duration: f32) -> BallFlight {
        BallFlight {
            kind: FlightKind::Lob,
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(100.0, 0.0),
            duration,
            apex: 10.0,
            elapsed: 0.0,
            complete: false,
            thrower: None,
            intended_target: None,
            fallback_targets: Vec::new(),
        }
    }

    #[test]
    fn test_flight_arc() {
        let mut f = flight(1.0);
        assert_eq!(f.height(), 0.0);
        f.elapsed = 0.5;
        assert_eq!(f.position(), Vec2::new(50.0, 0.0));
        assert!((f.height() - 10.0).abs() < 1e-5);
        f.elapsed = 3.0;
        assert_eq!(f.progress(), 1.0);
        assert_eq!(f.height(), 0.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        assert_eq!(flight(0.0).progress(), 1.0);
    }

    #[test]
    fn test_speed_modifiers_expire() {
        let mut mods = SpeedModifiers::default();
        mods.add(0.65, 0.5);
        mods.add(1.25, 1.0);
        assert!((mods.multiplier() - 0.8125).abs() < 1e-5);
        mods.tick(0.6);
        assert!((mods.multiplier() - 1.25).abs() < 1e-5);
        mods.tick(0.5);
        assert_eq!(mods.multiplier(), 1.0);
        mods.add(2.0, 0.0);
        assert!(mods.active.is_empty());
    }

    #[test]
    fn test_linemen_ineligible() {
        assert!(!Role::OffensiveLine.is_eligible_receiver());
        assert!(Role::TightEnd.is_eligible_receiver());
    }
}
