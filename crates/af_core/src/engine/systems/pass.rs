//! Pass Flight
//!
//! ## Start
//! Target = explicit target if eligible, else nearest eligible teammate
//! (squared distance, smaller id on ties). Duration = distance / speed,
//! clamped; the ball is led to where the target will be.
//!
//! ## Completion
//! Candidates within `eligible_radius` of the landing point. The offense
//! side picks its receiver (intended → first eligible fallback → nearest);
//! the defense side picks its best catch score. One draw decides:
//!
//! ```text
//! total = r + d + base
//! u < r/total                → catch
//! u < (r + d)/total          → interception
//! otherwise                  → incomplete
//! ```

use tracing::{debug, info};

use crate::config::PassConfig;
use crate::engine::components::{BallFlight, FlightKind, PlayerAttributes};
use crate::engine::events::{
    BallCaughtEvent, EventBus, PassOutcome, PassRequestedEvent, PassResolvedEvent, PassThrownEvent,
    PossessionChangedEvent, WhistleEvent,
};
use crate::engine::rng::{draw, play_seed, salt};
use crate::engine::sort_keys::{max_by_value, min_by_value};
use crate::engine::state::{BallState, MatchState, PlayKind, PlayState, WhistleReason};
use crate::engine::systems::{kick, TickContext};
use crate::engine::types::{seed_of, EntityId, TeamSide, Vec2};
use crate::engine::world::World;

// ============================================================================
// Probability model
// ============================================================================

/// `max(0, receiving×2 + ball_control) × (0.5 + 0.5 × proximity)`
pub fn catch_score(attributes: &PlayerAttributes, distance: f32, radius: f32) -> f32 {
    let proximity = if radius > 0.0 { (1.0 - distance / radius).clamp(0.0, 1.0) } else { 0.0 };
    let skill = (attributes.receiving as f32 * 2.0 + attributes.ball_control as f32).max(0.0);
    skill * (0.5 + 0.5 * proximity)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOdds {
    pub p_catch: f32,
    pub p_intercept: f32,
}

pub fn pass_odds(receiver_score: f32, defender_score: f32, incomplete_base: f32) -> PassOdds {
    let total = receiver_score + defender_score + incomplete_base;
    if total <= 0.0 {
        return PassOdds { p_catch: 0.0, p_intercept: 0.0 };
    }
    PassOdds { p_catch: receiver_score / total, p_intercept: defender_score / total }
}

pub fn select_pass_outcome(odds: PassOdds, u: f32) -> PassOutcome {
    if u < odds.p_catch {
        PassOutcome::Catch
    } else if u < odds.p_catch + odds.p_intercept {
        PassOutcome::Interception
    } else {
        PassOutcome::Incomplete
    }
}

fn is_eligible(world: &World, passer: Option<EntityId>, team: TeamSide, id: EntityId) -> bool {
    Some(id) != passer
        && world.team_of(id) == Some(team)
        && world.roles.get(id).is_some_and(|r| r.is_eligible_receiver())
}

// ============================================================================
// Start
// ============================================================================

pub fn start_passes(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    ctx: &TickContext,
) {
    for request in bus.take::<PassRequestedEvent>() {
        if !ctx.gates.live || !play.is_live() || play.whistle.is_some() {
            continue;
        }
        if play.ball_state != BallState::Held || play.ball_owner != Some(request.passer) {
            debug!(passer = request.passer.0, "pass request from a player without the ball");
            continue;
        }
        if let Some(thrown) = throw(world, play, match_state, &request, ctx) {
            bus.publish(thrown);
        }
    }
}

fn throw(
    world: &mut World,
    play: &mut PlayState,
    match_state: &MatchState,
    request: &PassRequestedEvent,
    ctx: &TickContext,
) -> Option<PassThrownEvent> {
    let cfg = &ctx.config.pass;
    let field = ctx.field;
    let passer = request.passer;
    let team = world.team_of(passer)?;
    let origin = world.positions.get(passer).copied()?;
    let ball_id = world.ball_id()?;

    let target = request
        .target
        .filter(|t| is_eligible(world, Some(passer), team, *t))
        .or_else(|| {
            min_by_value(world.player_ids().into_iter().filter_map(|id| {
                if !is_eligible(world, Some(passer), team, id) {
                    return None;
                }
                world.positions.get(id).map(|p| (id, p.distance_sq(origin)))
            }))
            .map(|(id, _)| id)
        });

    let (aim, target_velocity) = match target.and_then(|t| world.positions.get(t).copied()) {
        Some(position) => {
            (position, target.and_then(|t| world.velocities.get(t).copied()).unwrap_or_default())
        }
        None => {
            // Throw it away downfield
            let sign = match_state.attack_direction_of(team).sign();
            (Vec2::new(origin.x + sign * field.yard_to_x(10.0), origin.y), Vec2::ZERO)
        }
    };

    let (speed, apex) = match request.kind {
        FlightKind::Lob => (cfg.lob_speed, cfg.lob_apex),
        FlightKind::Bullet | FlightKind::Kick => (cfg.bullet_speed, cfg.bullet_apex),
    };
    let duration = (origin.distance(aim) / speed).clamp(cfg.min_duration, cfg.max_duration);
    let end = field.clamp(aim + target_velocity * duration);

    let ball = world.ball.get_mut(ball_id)?;
    ball.flight = Some(BallFlight {
        kind: request.kind,
        start: origin,
        end,
        duration,
        apex,
        elapsed: 0.0,
        complete: false,
        thrower: Some(passer),
        intended_target: target,
        fallback_targets: request.fallbacks.clone(),
    });
    world.positions.insert(ball_id, origin);
    play.ball_state = BallState::InAir;
    play.ball_owner = None;
    world.set_possession(None);

    debug!(passer = passer.0, target = ?target.map(|t| t.0), duration, "pass thrown");
    Some(PassThrownEvent { passer, target, kind: request.kind, landing: end, duration })
}

// ============================================================================
// Completion
// ============================================================================

/// Resolve a ball whose flight finished this tick.
pub fn resolve_completions(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    ctx: &TickContext,
) {
    if !ctx.gates.live || play.ball_state != BallState::InAir || play.whistle.is_some() {
        return;
    }
    let Some(ball_id) = world.ball_id() else {
        return;
    };
    let Some(flight) = world.ball.get(ball_id).and_then(|b| b.flight.clone()) else {
        return;
    };
    if !flight.complete {
        return;
    }

    match flight.kind {
        FlightKind::Kick => kick::resolve_landing(world, bus, play, match_state, flight.end, ctx),
        FlightKind::Lob | FlightKind::Bullet => {
            if let Some(ball) = world.ball.get_mut(ball_id) {
                ball.flight = None;
                ball.height = 0.0;
            }
            resolve_pass(world, bus, play, match_state, &flight, &ctx.config.pass);
        }
    }
}

fn resolve_pass(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    flight: &BallFlight,
    cfg: &PassConfig,
) {
    let ball_pos = flight.end;
    let passer = flight.thrower;
    let team = passer.and_then(|p| world.team_of(p)).unwrap_or(match_state.possession);
    let radius = cfg.eligible_radius;
    let radius_sq = radius * radius;

    let mut offense = Vec::new();
    let mut defense = Vec::new();
    for id in world.player_ids() {
        let Some(position) = world.positions.get(id) else {
            continue;
        };
        let d2 = position.distance_sq(ball_pos);
        if d2 > radius_sq {
            continue;
        }
        if world.team_of(id) == Some(team) {
            if is_eligible(world, passer, team, id) {
                offense.push((id, d2));
            }
        } else {
            defense.push((id, d2));
        }
    }

    let in_range = |id: &EntityId| offense.iter().any(|(o, _)| o == id);
    let receiver = flight
        .intended_target
        .filter(in_range)
        .or_else(|| flight.fallback_targets.iter().copied().find(in_range))
        .or_else(|| min_by_value(offense.iter().copied()).map(|(id, _)| id));

    let Some(receiver) = receiver else {
        incomplete(bus, play, passer, None, None);
        return;
    };

    let lob = flight.kind == FlightKind::Lob;
    let attributes_of = |id: EntityId| world.attributes.get(id).copied().unwrap_or_default();
    let receiver_d2 = offense.iter().find(|(id, _)| *id == receiver).map_or(0.0, |(_, d2)| *d2);
    let r = catch_score(&attributes_of(receiver), receiver_d2.sqrt(), radius);
    let defender = max_by_value(defense.iter().map(|(id, d2)| {
        let score = catch_score(&attributes_of(*id), d2.sqrt(), radius);
        (*id, if lob { score * cfg.lob_defender_multiplier } else { score })
    }));
    let d = defender.map_or(0.0, |(_, score)| score);
    let base = if lob { cfg.incomplete_base * cfg.lob_incomplete_multiplier } else { cfg.incomplete_base };

    let odds = pass_odds(r, d, base);
    let defender_id = defender.map(|(id, _)| id);
    let u = draw(&[
        play_seed(play.play_id),
        seed_of(passer),
        receiver.seed(),
        seed_of(defender_id),
        salt::PASS_OUTCOME,
    ]);

    match (select_pass_outcome(odds, u), defender_id) {
        (PassOutcome::Catch, _) => {
            take_ball(world, play, receiver);
            bus.publish(BallCaughtEvent { receiver, team, position: ball_pos });
            bus.publish(PassResolvedEvent {
                play_id: play.play_id,
                passer,
                outcome: PassOutcome::Catch,
                receiver: Some(receiver),
                defender: defender_id,
            });
            info!(play_id = play.play_id, receiver = receiver.0, "pass complete");
        }
        (PassOutcome::Interception, Some(defender)) => {
            let defense_team = team.opponent();
            take_ball(world, play, defender);
            world.set_offense(defense_team);
            play.result.turnover = play.kind == PlayKind::Scrimmage && defense_team != match_state.possession;
            bus.publish(BallCaughtEvent { receiver: defender, team: defense_team, position: ball_pos });
            bus.publish(PassResolvedEvent {
                play_id: play.play_id,
                passer,
                outcome: PassOutcome::Interception,
                receiver: Some(receiver),
                defender: Some(defender),
            });
            bus.publish(PossessionChangedEvent { from: team, to: defense_team, player: defender });
            info!(play_id = play.play_id, defender = defender.0, "interception");
        }
        _ => incomplete(bus, play, passer, Some(receiver), defender_id),
    }
}

fn take_ball(world: &mut World, play: &mut PlayState, holder: EntityId) {
    play.ball_state = BallState::Held;
    play.ball_owner = Some(holder);
    world.set_possession(Some(holder));
}

fn incomplete(
    bus: &mut EventBus,
    play: &mut PlayState,
    passer: Option<EntityId>,
    receiver: Option<EntityId>,
    defender: Option<EntityId>,
) {
    play.ball_state = BallState::Dead;
    play.ball_owner = None;
    if play.blow_whistle(WhistleReason::Incomplete, play.start_yard) {
        bus.publish(WhistleEvent {
            play_id: play.play_id,
            reason: WhistleReason::Incomplete,
            end_yard: play.start_yard,
        });
    }
    bus.publish(PassResolvedEvent {
        play_id: play.play_id,
        passer,
        outcome: PassOutcome::Incomplete,
        receiver,
        defender,
    });
    info!(play_id = play.play_id, "pass incomplete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Role;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use proptest::prelude::*;

    #[test]
    fn test_catch_score() {
        let attrs = PlayerAttributes { receiving: 70, ball_control: 60, ..Default::default() };
        // At the ball: full proximity
        assert!((catch_score(&attrs, 0.0, 14.0) - 200.0).abs() < 1e-4);
        // At the edge: half credit
        assert!((catch_score(&attrs, 14.0, 14.0) - 100.0).abs() < 1e-4);
        assert!((catch_score(&attrs, 40.0, 14.0) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_defender_no_interception() {
        let odds = pass_odds(150.0, 0.0, 120.0);
        assert_eq!(odds.p_intercept, 0.0);
        assert!(odds.p_catch < 1.0);
        assert_eq!(select_pass_outcome(odds, 0.99), PassOutcome::Incomplete);
        assert_eq!(select_pass_outcome(odds, 0.0), PassOutcome::Catch);
    }

    proptest! {
        #[test]
        fn prop_catch_plus_intercept_below_one(
            r in 0.0f32..400.0,
            d in 0.0f32..460.0,
            base in 1.0f32..200.0,
        ) {
            let odds = pass_odds(r, d, base);
            prop_assert!(odds.p_catch >= 0.0 && odds.p_intercept >= 0.0);
            prop_assert!(odds.p_catch + odds.p_intercept < 1.0);
        }
    }

    fn passing_fixture() -> (Fixture, EntityId, EntityId) {
        let mut f = Fixture::live();
        let qb = f.spawn(TeamSide::Home, Role::Quarterback, Vec2::new(300.0, 266.0));
        let wr = f.spawn(TeamSide::Home, Role::WideReceiver, Vec2::new(420.0, 266.0));
        f.give_ball(qb);
        (f, qb, wr)
    }

    fn request(passer: EntityId, target: Option<EntityId>, kind: FlightKind) -> PassRequestedEvent {
        PassRequestedEvent { passer, target, fallbacks: Vec::new(), kind }
    }

    #[test]
    fn test_throw_leads_moving_target() {
        let (mut f, qb, wr) = passing_fixture();
        f.world.velocities.insert(wr, Vec2::new(0.0, 50.0));
        f.bus.publish(request(qb, Some(wr), FlightKind::Bullet));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        start_passes(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);

        let thrown = f.bus.read::<PassThrownEvent>()[0];
        // 120 units at 210 u/s
        let duration = 120.0 / 210.0;
        assert!((thrown.duration - duration).abs() < 1e-5);
        assert!((thrown.landing.y - (266.0 + 50.0 * duration)).abs() < 1e-3);
        assert_eq!(f.play.ball_state, BallState::InAir);
        assert_eq!(f.play.ball_owner, None);
        assert_eq!(f.world.has_ball.get(qb), Some(&false));
    }

    #[test]
    fn test_throw_picks_nearest_eligible_when_untargeted() {
        let (mut f, qb, _wr) = passing_fixture();
        let _guard = f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(310.0, 266.0));
        let te = f.spawn(TeamSide::Home, Role::TightEnd, Vec2::new(340.0, 266.0));
        f.bus.publish(request(qb, None, FlightKind::Lob));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        start_passes(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);
        assert_eq!(f.bus.read::<PassThrownEvent>()[0].target, Some(te));
        // 40 units at lob speed
        assert!((f.bus.read::<PassThrownEvent>()[0].duration - 40.0 / 130.0).abs() < 1e-5);
    }

    fn land(f: &mut Fixture, qb: EntityId, target: Option<EntityId>, end: Vec2, kind: FlightKind) {
        let ball_id = f.world.ball_id().unwrap();
        f.world.ball.get_mut(ball_id).unwrap().flight = Some(BallFlight {
            kind,
            start: Vec2::new(300.0, 266.0),
            end,
            duration: 0.5,
            apex: 8.0,
            elapsed: 0.5,
            complete: true,
            thrower: Some(qb),
            intended_target: target,
            fallback_targets: Vec::new(),
        });
        f.play.ball_state = BallState::InAir;
        f.play.ball_owner = None;
    }

    #[test]
    fn test_no_receiver_is_incomplete() {
        let (mut f, qb, _wr) = passing_fixture();
        land(&mut f, qb, None, Vec2::new(700.0, 100.0), FlightKind::Bullet);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        resolve_completions(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);

        assert_eq!(f.play.whistle, Some(WhistleReason::Incomplete));
        assert_eq!(f.play.end_yard, f.play.start_yard);
        assert_eq!(f.bus.read::<PassResolvedEvent>()[0].outcome, PassOutcome::Incomplete);
    }

    #[test]
    fn test_resolution_matches_draw() {
        let (mut f, qb, wr) = passing_fixture();
        let cb = f.spawn(TeamSide::Away, Role::Cornerback, Vec2::new(425.0, 270.0));
        land(&mut f, qb, Some(wr), Vec2::new(420.0, 266.0), FlightKind::Lob);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        resolve_completions(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);

        let cfg = PassConfig::default();
        let r = catch_score(&PlayerAttributes::default(), 0.0, 14.0);
        let d = catch_score(&PlayerAttributes::default(), 41.0f32.sqrt(), 14.0) * cfg.lob_defender_multiplier;
        let odds = pass_odds(r, d, cfg.incomplete_base * cfg.lob_incomplete_multiplier);
        let u = draw(&[play_seed(f.play.play_id), qb.seed(), wr.seed(), cb.seed(), salt::PASS_OUTCOME]);
        let expected = select_pass_outcome(odds, u);

        let resolved = f.bus.read::<PassResolvedEvent>()[0];
        assert_eq!(resolved.outcome, expected);
        assert_eq!(resolved.defender, Some(cb));
        match expected {
            PassOutcome::Catch => assert_eq!(f.play.ball_owner, Some(wr)),
            PassOutcome::Interception => {
                assert_eq!(f.play.ball_owner, Some(cb));
                assert!(f.world.on_offense(cb));
                assert_eq!(f.bus.read::<PossessionChangedEvent>().len(), 1);
            }
            PassOutcome::Incomplete => assert_eq!(f.play.whistle, Some(WhistleReason::Incomplete)),
        }
    }

    #[test]
    fn test_interception_marks_turnover_while_live() {
        let mut f = Fixture::live();
        let qb = f.spawn(TeamSide::Home, Role::Quarterback, Vec2::new(300.0, 266.0));
        let hands_of_stone = PlayerAttributes { receiving: 0, ball_control: 0, ..Default::default() };
        let wr = f.spawn_rated(TeamSide::Home, Role::WideReceiver, Vec2::new(420.0, 266.0), hands_of_stone);
        let cb = f.spawn(TeamSide::Away, Role::Cornerback, Vec2::new(425.0, 270.0));
        f.give_ball(qb);
        f.config.pass.incomplete_base = 0.001;
        land(&mut f, qb, Some(wr), Vec2::new(420.0, 266.0), FlightKind::Bullet);
        assert!(!f.play.result.turnover);

        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        resolve_completions(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);

        assert_eq!(f.bus.read::<PassResolvedEvent>()[0].outcome, PassOutcome::Interception);
        assert_eq!(f.play.ball_owner, Some(cb));
        assert!(f.play.is_live());
        assert_eq!(f.play.whistle, None);
        assert!(f.play.result.turnover);
    }

    #[test]
    fn test_fallback_used_when_intended_out_of_range() {
        let (mut f, qb, wr) = passing_fixture();
        let te = f.spawn(TeamSide::Home, Role::TightEnd, Vec2::new(600.0, 100.0));
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(602.0, 100.0));
        land(&mut f, qb, Some(wr), Vec2::new(600.0, 100.0), FlightKind::Bullet);
        let ball_id = f.world.ball_id().unwrap();
        f.world.ball.get_mut(ball_id).unwrap().flight.as_mut().unwrap().fallback_targets = vec![rb, te];
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        resolve_completions(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);
        let resolved = f.bus.read::<PassResolvedEvent>()[0];
        assert_eq!(resolved.receiver, Some(rb));
    }
}
