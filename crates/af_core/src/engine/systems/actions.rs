//! Action resolution: turns each player's pending command into events and
//! component changes. Commands are consumed whether or not they apply;
//! `last_applied` records only the ones that took effect.

use tracing::debug;

use crate::engine::components::{ActionCommand, BehaviorState, FlightKind, PendingCommand};
use crate::engine::events::{EventBus, PassRequestedEvent, TackleAttemptEvent};
use crate::engine::interrupt::InterruptKind;
use crate::engine::state::{BallState, MatchState, PlayPhase, PlayState};
use crate::engine::systems::{snap, TickContext};
use crate::engine::types::EntityId;
use crate::engine::world::World;
use crate::error::InterruptError;

pub fn run(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    pass_inbox: &mut Vec<PassRequestedEvent>,
    ctx: &TickContext,
) -> Result<(), InterruptError> {
    for (_, slot) in world.commands.iter_mut() {
        slot.action_timer = (slot.action_timer - ctx.dt).max(0.0);
    }

    for id in world.player_ids() {
        let Some(pending) = world.commands.get_mut(id).map(|slot| std::mem::take(&mut slot.pending))
        else {
            continue;
        };
        if pending.command == ActionCommand::None {
            continue;
        }
        if apply(world, bus, play, match_state, id, pending, ctx)? {
            if let Some(slot) = world.commands.get_mut(id) {
                slot.last_applied = pending;
            }
        } else {
            debug!(entity = id.0, command = ?pending.command, "command ignored");
        }
    }

    // Host-queued passes (with fallback lists) enter the bus here.
    for request in pass_inbox.drain(..) {
        if ctx.gates.live {
            bus.publish(request);
        }
    }
    Ok(())
}

fn apply(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    id: EntityId,
    pending: PendingCommand,
    ctx: &TickContext,
) -> Result<bool, InterruptError> {
    let live = ctx.gates.live && play.is_live();
    let actions = &ctx.config.actions;
    let ready = world.commands.get(id).is_some_and(|slot| slot.action_timer <= 0.0);

    let applied = match pending.command {
        ActionCommand::None => false,
        ActionCommand::Snap => {
            ctx.gates.pre_snap
                && play.phase == PlayPhase::PreSnap
                && snap::snap_ball(world, bus, play, match_state, id, ctx)
        }
        ActionCommand::Tackle => {
            if live {
                bus.publish(TackleAttemptEvent { tackler: id });
            }
            live
        }
        ActionCommand::Dive => {
            if live {
                bus.publish(TackleAttemptEvent { tackler: id });
                world.push_interrupt(id, InterruptKind::Tackle, actions.dive_seconds, BehaviorState::Diving)?;
            }
            live
        }
        ActionCommand::SprintBurst => {
            live && ready && boost(world, id, actions.sprint_multiplier, actions.sprint_seconds)
        }
        ActionCommand::JukeCut => {
            live && ready && boost(world, id, actions.juke_multiplier, actions.juke_seconds)
        }
        ActionCommand::Pass | ActionCommand::Pitch => {
            let holds_ball = play.ball_state == BallState::Held && play.ball_owner == Some(id);
            if live && holds_ball {
                let kind = if pending.command == ActionCommand::Pitch {
                    FlightKind::Lob
                } else {
                    FlightKind::Bullet
                };
                bus.publish(PassRequestedEvent {
                    passer: id,
                    target: pending.target,
                    fallbacks: Vec::new(),
                    kind,
                });
            }
            live && holds_ball
        }
        ActionCommand::Scramble => {
            let free = world.interrupts.get(id).is_some_and(|s| s.is_empty());
            match world.behaviors.get_mut(id) {
                Some(behavior) if live && free => {
                    behavior.state = BehaviorState::Scrambling;
                    true
                }
                _ => false,
            }
        }
    };
    Ok(applied)
}

fn boost(world: &mut World, id: EntityId, multiplier: f32, seconds: f32) -> bool {
    let (Some(mods), Some(slot)) = (world.speed_mods.get_mut(id), world.commands.get_mut(id)) else {
        return false;
    };
    mods.add(multiplier, seconds);
    slot.action_timer = seconds;
    true
}
