//! Contact Detector
//!
//! Discrete proximity test, once per tick, while play is live.
//!
//! 1. Broad phase: every pair within `proximity_radius`, ids ascending.
//! 2. Tackle contacts: pairs with the ball carrier, defender on the other
//!    team and not on offense, within `tackle_radius` (+ bonus on a tackle
//!    attempt this tick).
//! 3. Block contacts: non-carrier offense/defense pairs within
//!    `block_radius`; the offense player is the blocker.

use crate::engine::events::{BlockContactEvent, EventBus, TackleAttemptEvent, TackleContactEvent};
use crate::engine::state::{BallState, PlayState};
use crate::engine::systems::TickContext;
use crate::engine::types::{EntityId, Vec2};
use crate::engine::world::World;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    /// Smaller id
    pub a: EntityId,
    pub b: EntityId,
    pub distance_sq: f32,
    pub midpoint: Vec2,
}

/// All player pairs within `radius`, `a < b`, ordered by (a, b).
pub fn candidate_pairs(world: &World, radius: f32) -> Vec<ContactPair> {
    let players: Vec<(EntityId, Vec2)> = world
        .player_ids()
        .into_iter()
        .filter_map(|id| world.positions.get(id).map(|p| (id, *p)))
        .collect();
    let radius_sq = radius * radius;

    let mut pairs = Vec::new();
    for (i, &(a, pa)) in players.iter().enumerate() {
        for &(b, pb) in &players[i + 1..] {
            let distance_sq = pa.distance_sq(pb);
            if distance_sq <= radius_sq {
                pairs.push(ContactPair { a, b, distance_sq, midpoint: pa.midpoint(pb) });
            }
        }
    }
    pairs
}

pub fn run(world: &World, bus: &mut EventBus, play: &PlayState, ctx: &TickContext) {
    if !ctx.gates.live || !play.is_live() {
        return;
    }
    let cfg = &ctx.config.contact;
    let pairs = candidate_pairs(world, cfg.proximity_radius);
    let carrier = match play.ball_state {
        BallState::Held => play.ball_owner,
        _ => None,
    };
    let attempts: Vec<EntityId> = bus.read::<TackleAttemptEvent>().iter().map(|e| e.tackler).collect();

    if let Some(carrier) = carrier {
        let carrier_team = world.team_of(carrier);
        for pair in &pairs {
            let defender = if pair.a == carrier {
                pair.b
            } else if pair.b == carrier {
                pair.a
            } else {
                continue;
            };
            if world.team_of(defender) == carrier_team || world.on_offense(defender) {
                continue;
            }
            let mut reach = cfg.tackle_radius;
            if attempts.contains(&defender) {
                reach += cfg.tackle_attempt_bonus;
            }
            if pair.distance_sq <= reach * reach {
                bus.publish(TackleContactEvent {
                    tackler: defender,
                    carrier,
                    position: pair.midpoint,
                    distance_sq: pair.distance_sq,
                });
            }
        }
    }

    let block_sq = cfg.block_radius * cfg.block_radius;
    for pair in &pairs {
        if Some(pair.a) == carrier || Some(pair.b) == carrier || pair.distance_sq > block_sq {
            continue;
        }
        if world.team_of(pair.a) == world.team_of(pair.b) {
            continue;
        }
        let (blocker, defender) = match (world.on_offense(pair.a), world.on_offense(pair.b)) {
            (true, false) => (pair.a, pair.b),
            (false, true) => (pair.b, pair.a),
            _ => continue,
        };
        bus.publish(BlockContactEvent { blocker, defender, position: pair.midpoint });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Role;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use crate::engine::types::TeamSide;

    #[test]
    fn test_candidate_pairs_sorted_and_bounded() {
        let mut f = Fixture::live();
        let a = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(100.0, 100.0));
        let b = f.spawn(TeamSide::Away, Role::Linebacker, Vec2::new(110.0, 100.0));
        let _far = f.spawn(TeamSide::Away, Role::Safety, Vec2::new(200.0, 100.0));
        let pairs = candidate_pairs(&f.world, 12.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (a, b));
        assert_eq!(pairs[0].midpoint, Vec2::new(105.0, 100.0));
        assert_eq!(pairs[0].distance_sq, 100.0);
    }

    #[test]
    fn test_tackle_radius_and_attempt_bonus() {
        let mut f = Fixture::live();
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(300.0, 200.0));
        let lb = f.spawn(TeamSide::Away, Role::Linebacker, Vec2::new(309.0, 200.0));
        f.give_ball(rb);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);

        // 9 units: outside the base radius of 8
        run(&f.world, &mut f.bus, &f.play, &ctx);
        assert!(f.bus.read::<TackleContactEvent>().is_empty());

        f.bus.begin_tick();
        f.bus.publish(TackleAttemptEvent { tackler: lb });
        run(&f.world, &mut f.bus, &f.play, &ctx);
        let contact = f.bus.read::<TackleContactEvent>()[0];
        assert_eq!((contact.tackler, contact.carrier), (lb, rb));
        assert_eq!(contact.distance_sq, 81.0);
    }

    #[test]
    fn test_teammates_never_tackle() {
        let mut f = Fixture::live();
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(300.0, 200.0));
        let _te = f.spawn(TeamSide::Home, Role::TightEnd, Vec2::new(303.0, 200.0));
        f.give_ball(rb);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&f.world, &mut f.bus, &f.play, &ctx);
        assert!(f.bus.read::<TackleContactEvent>().is_empty());
        assert!(f.bus.read::<BlockContactEvent>().is_empty());
    }

    #[test]
    fn test_block_contact_orients_blocker() {
        let mut f = Fixture::live();
        let dl = f.spawn(TeamSide::Away, Role::DefensiveLine, Vec2::new(310.0, 200.0));
        let ol = f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(300.0, 200.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&f.world, &mut f.bus, &f.play, &ctx);
        let block = f.bus.read::<BlockContactEvent>()[0];
        assert_eq!((block.blocker, block.defender), (ol, dl));
    }

    #[test]
    fn test_inactive_outside_live_play() {
        let mut f = Fixture::pre_snap();
        f.spawn(TeamSide::Away, Role::DefensiveLine, Vec2::new(310.0, 200.0));
        f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(300.0, 200.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::PRE_SNAP);
        run(&f.world, &mut f.bus, &f.play, &ctx);
        assert!(f.bus.is_empty());
    }
}
