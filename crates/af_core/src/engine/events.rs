//! Per-tick Event Bus
//!
//! The only channel between systems. Each event type gets its own statically
//! typed FIFO queue; [`EventBus::begin_tick`] clears every queue and is called
//! exactly once at the start of a tick, so nothing published in tick N can be
//! read after tick N+1 begins.
//!
//! - `publish` appends
//! - `read` borrows the current queue (any number of readers)
//! - `drain` / `take` empty it (single consumer)

use serde::{Deserialize, Serialize};

use crate::engine::components::FlightKind;
use crate::engine::state::{PlayKind, PlayResult, WhistleReason};
use crate::engine::types::{EntityId, TeamSide, Vec2};

// ============================================================================
// EventQueue
// ============================================================================

#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventQueue<T> {
    pub fn push(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Maps an event type to its channel on the bus.
pub trait BusEvent: Sized {
    fn queue(bus: &EventBus) -> &EventQueue<Self>;
    fn queue_mut(bus: &mut EventBus) -> &mut EventQueue<Self>;
}

macro_rules! event_bus {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// One queue per event type.
        #[derive(Debug, Default, Clone)]
        pub struct EventBus {
            $($field: EventQueue<$ty>,)*
        }

        impl EventBus {
            /// Clear every channel. Call once per tick before any system.
            pub fn begin_tick(&mut self) {
                $(self.$field.clear();)*
            }

            /// True when no channel holds an event.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_empty())*
            }
        }

        $(
            impl BusEvent for $ty {
                fn queue(bus: &EventBus) -> &EventQueue<Self> {
                    &bus.$field
                }

                fn queue_mut(bus: &mut EventBus) -> &mut EventQueue<Self> {
                    &mut bus.$field
                }
            }
        )*
    };
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish<T: BusEvent>(&mut self, event: T) {
        T::queue_mut(self).push(event);
    }

    /// Current queue for `T`, in publish order.
    pub fn read<T: BusEvent>(&self) -> &[T] {
        T::queue(self).as_slice()
    }

    /// Hand every queued `T` to `handler`, then leave the queue empty.
    pub fn drain<T: BusEvent>(&mut self, mut handler: impl FnMut(T)) {
        for event in T::queue_mut(self).take() {
            handler(event);
        }
    }

    /// Remove and return the queued `T` so the caller can publish while
    /// iterating.
    pub fn take<T: BusEvent>(&mut self) -> Vec<T> {
        T::queue_mut(self).take()
    }
}

// ============================================================================
// Outcome enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TackleOutcome {
    Downed,
    /// Downed, carrier falls forward for bonus yards
    FallForward,
    Stumble,
    Broken,
}

impl TackleOutcome {
    pub fn ends_play(self) -> bool {
        matches!(self, TackleOutcome::Downed | TackleOutcome::FallForward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassOutcome {
    Catch,
    Interception,
    Incomplete,
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapEvent {
    pub play_id: u64,
    /// Ball holder after the snap
    pub holder: Option<EntityId>,
}

/// A defender asked to tackle this tick (widens the tackle radius)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TackleAttemptEvent {
    pub tackler: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRequestedEvent {
    pub passer: EntityId,
    pub target: Option<EntityId>,
    pub fallbacks: Vec<EntityId>,
    pub kind: FlightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassThrownEvent {
    pub passer: EntityId,
    pub target: Option<EntityId>,
    pub kind: FlightKind,
    pub landing: Vec2,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallKickedEvent {
    pub play_id: u64,
    pub kicker: Option<EntityId>,
    pub kicking: TeamSide,
    pub landing: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TackleContactEvent {
    pub tackler: EntityId,
    pub carrier: EntityId,
    /// Midpoint of the pair
    pub position: Vec2,
    pub distance_sq: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockContactEvent {
    /// Offense side of the pair
    pub blocker: EntityId,
    pub defender: EntityId,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TackleEvent {
    pub play_id: u64,
    pub tackler: EntityId,
    pub carrier: EntityId,
    pub outcome: TackleOutcome,
    /// Attempt index of this pair within the play
    pub attempt: u32,
    pub position: Vec2,
    pub bonus_yards: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhistleEvent {
    pub play_id: u64,
    pub reason: WhistleReason,
    /// Absolute yard where the ball is spotted
    pub end_yard: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FumbleEvent {
    pub play_id: u64,
    pub carrier: EntityId,
    pub tackler: EntityId,
    pub attempt: u32,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupEvent {
    pub player: EntityId,
    pub team: TeamSide,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallCaughtEvent {
    pub receiver: EntityId,
    pub team: TeamSide,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassResolvedEvent {
    pub play_id: u64,
    pub passer: Option<EntityId>,
    pub outcome: PassOutcome,
    pub receiver: Option<EntityId>,
    pub defender: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PossessionChangedEvent {
    pub from: TeamSide,
    pub to: TeamSide,
    pub player: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayEndedEvent {
    pub play_id: u64,
    pub kind: PlayKind,
    /// Canonical reason after arbitration
    pub reason: WhistleReason,
    pub result: PlayResult,
    pub end_yard: f32,
    /// Team holding (or last entitled to) the ball at the whistle
    pub ball_team: TeamSide,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickoffScheduledEvent {
    pub kicking: TeamSide,
    pub receiving: TeamSide,
    /// Absolute yard of the kick
    pub spot: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayResetEvent {
    pub play_id: u64,
    pub kind: PlayKind,
    pub line_of_scrimmage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterEndedEvent {
    pub quarter: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalftimeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEndedEvent {
    pub home_score: u16,
    pub away_score: u16,
}

event_bus! {
    snaps: SnapEvent,
    tackle_attempts: TackleAttemptEvent,
    pass_requests: PassRequestedEvent,
    passes_thrown: PassThrownEvent,
    kicks: BallKickedEvent,
    tackle_contacts: TackleContactEvent,
    block_contacts: BlockContactEvent,
    tackles: TackleEvent,
    whistles: WhistleEvent,
    fumbles: FumbleEvent,
    pickups: PickupEvent,
    catches: BallCaughtEvent,
    pass_results: PassResolvedEvent,
    possession_changes: PossessionChangedEvent,
    plays_ended: PlayEndedEvent,
    kickoffs: KickoffScheduledEvent,
    resets: PlayResetEvent,
    quarters_ended: QuarterEndedEvent,
    halftimes: HalftimeEvent,
    games_ended: GameEndedEvent,
}
