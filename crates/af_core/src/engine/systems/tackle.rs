//! Tackle Resolution
//!
//! ## Ratings
//! ```text
//! tackler = hp×1.25 + run×0.35 + max×0.25   (≥ 1)
//! carrier = hp×1.15 + run×0.25 + max×0.55   (≥ 1)
//! pDown   = clamp(t/(t+c) + bias, min, max)
//! pStumble = clamp(base + w×(1 − |pDown − 0.5|×2), 0, max)
//! ```
//! The stumble band is capped at `1 − pDown` so the three outcomes always
//! partition `[0, 1)`.
//!
//! ## Draws
//! All draws hash (play id, tackler, carrier, attempt index, salt). The
//! attempt index counts resolutions of the same pair within the play.

use fxhash::FxHashMap;
use tracing::{debug, info};

use crate::config::TackleConfig;
use crate::engine::components::{BehaviorState, PlayerAttributes};
use crate::engine::events::{EventBus, TackleContactEvent, TackleEvent, TackleOutcome, WhistleEvent};
use crate::engine::interrupt::InterruptKind;
use crate::engine::rng::{draw, play_seed, salt};
use crate::engine::state::{BallState, MatchState, PlayState, WhistleReason};
use crate::engine::systems::TickContext;
use crate::engine::types::EntityId;
use crate::engine::world::World;
use crate::error::InterruptError;

// ============================================================================
// Probability model
// ============================================================================

pub fn tackler_score(a: &PlayerAttributes) -> f32 {
    (a.hitting_power as f32 * 1.25 + a.running_speed as f32 * 0.35 + a.max_speed as f32 * 0.25).max(1.0)
}

pub fn carrier_resist(a: &PlayerAttributes) -> f32 {
    (a.hitting_power as f32 * 1.15 + a.running_speed as f32 * 0.25 + a.max_speed as f32 * 0.55).max(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TackleOdds {
    pub p_down: f32,
    pub p_stumble: f32,
}

pub fn tackle_odds(tackler: &PlayerAttributes, carrier: &PlayerAttributes, cfg: &TackleConfig) -> TackleOdds {
    let t = tackler_score(tackler);
    let c = carrier_resist(carrier);
    let p_down = (t / (t + c) + cfg.down_bias).clamp(cfg.p_down_min, cfg.p_down_max);
    let closeness = (p_down - 0.5).abs() * 2.0;
    let p_stumble = (cfg.stumble_base + cfg.stumble_closeness_weight * (1.0 - closeness))
        .clamp(0.0, cfg.stumble_max)
        .min(1.0 - p_down);
    TackleOdds { p_down, p_stumble }
}

pub fn select_tackle_outcome(odds: TackleOdds, u: f32) -> TackleOutcome {
    if u < odds.p_down {
        TackleOutcome::Downed
    } else if u < odds.p_down + odds.p_stumble {
        TackleOutcome::Stumble
    } else {
        TackleOutcome::Broken
    }
}

/// Extra yards on a fall-forward.
pub fn fall_forward_yards(u: f32) -> f32 {
    if u < 0.20 {
        2.0
    } else if u < 0.70 {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// Per-pair bookkeeping
// ============================================================================

/// Cooldowns and attempt counters for the current play. Lookups only;
/// never iterated.
#[derive(Debug, Clone, Default)]
pub struct TackleBook {
    last_resolved: FxHashMap<(EntityId, EntityId), f32>,
    attempts: FxHashMap<(EntityId, EntityId), u32>,
}

impl TackleBook {
    pub fn clear(&mut self) {
        self.last_resolved.clear();
        self.attempts.clear();
    }

    /// Claim a resolution for the pair at play time `now`; returns the
    /// attempt index, or `None` while the pair is cooling down.
    pub fn begin_attempt(&mut self, pair: (EntityId, EntityId), now: f32, cooldown: f32) -> Option<u32> {
        if let Some(last) = self.last_resolved.get(&pair) {
            if now - last < cooldown {
                return None;
            }
        }
        self.last_resolved.insert(pair, now);
        let counter = self.attempts.entry(pair).or_insert(0);
        let index = *counter;
        *counter += 1;
        Some(index)
    }
}

// ============================================================================
// System
// ============================================================================

pub fn run(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    book: &mut TackleBook,
    ctx: &TickContext,
) -> Result<(), InterruptError> {
    let contacts = bus.take::<TackleContactEvent>();
    if !ctx.gates.live {
        return Ok(());
    }
    let cfg = &ctx.config.tackle;

    for contact in contacts {
        if !play.is_live() || play.whistle.is_some() {
            break;
        }
        let (tackler, carrier) = (contact.tackler, contact.carrier);
        if play.ball_state != BallState::Held || play.ball_owner != Some(carrier) {
            continue;
        }
        let (Some(tackler_attrs), Some(carrier_attrs)) =
            (world.attributes.get(tackler).copied(), world.attributes.get(carrier).copied())
        else {
            continue;
        };
        let Some(attempt) =
            book.begin_attempt((tackler, carrier), play.elapsed_seconds, cfg.pair_cooldown_seconds)
        else {
            continue;
        };

        world.push_interrupt(tackler, InterruptKind::Tackle, cfg.interrupt_seconds, BehaviorState::Tackling)?;
        world.push_interrupt(carrier, InterruptKind::Tackle, cfg.interrupt_seconds, BehaviorState::Grappling)?;

        let odds = tackle_odds(&tackler_attrs, &carrier_attrs, cfg);
        let inputs = [play_seed(play.play_id), tackler.seed(), carrier.seed(), attempt];
        let roll = |site: u32| draw(&[inputs[0], inputs[1], inputs[2], inputs[3], site]);

        let mut outcome = select_tackle_outcome(odds, roll(salt::TACKLE_OUTCOME));
        let mut bonus_yards = 0.0;
        if outcome == TackleOutcome::Downed && roll(salt::TACKLE_FALL_FORWARD) < cfg.fall_forward_chance {
            outcome = TackleOutcome::FallForward;
            bonus_yards = fall_forward_yards(roll(salt::TACKLE_FALL_YARDS));
        }

        match outcome {
            TackleOutcome::Stumble => {
                if let Some(mods) = world.speed_mods.get_mut(carrier) {
                    mods.add(cfg.stumble_speed_multiplier, cfg.stumble_seconds);
                }
                for id in [tackler, carrier] {
                    if let Some(stack) = world.interrupts.get_mut(id) {
                        stack.shorten_active(InterruptKind::Tackle, cfg.stumble_interrupt_remaining);
                    }
                }
            }
            TackleOutcome::Broken => {
                world.clear_interrupt(tackler, InterruptKind::Tackle);
                world.clear_interrupt(carrier, InterruptKind::Tackle);
            }
            TackleOutcome::Downed | TackleOutcome::FallForward => {}
        }

        debug!(
            play_id = play.play_id,
            tackler = tackler.0,
            carrier = carrier.0,
            attempt,
            p_down = odds.p_down,
            ?outcome,
            "tackle resolved"
        );
        bus.publish(TackleEvent {
            play_id: play.play_id,
            tackler,
            carrier,
            outcome,
            attempt,
            position: contact.position,
            bonus_yards,
        });

        if outcome.ends_play() {
            let sign = world
                .team_of(carrier)
                .map_or(1.0, |team| match_state.attack_direction_of(team).sign());
            let end_yard = ctx.field.x_to_yard(contact.position.x) + bonus_yards * sign;
            world.velocities.insert(carrier, Default::default());
            if play.blow_whistle(WhistleReason::Tackle, end_yard) {
                info!(play_id = play.play_id, carrier = carrier.0, end_yard, "tackled");
                bus.publish(WhistleEvent { play_id: play.play_id, reason: WhistleReason::Tackle, end_yard });
            }
        }
    }
    Ok(())
}
