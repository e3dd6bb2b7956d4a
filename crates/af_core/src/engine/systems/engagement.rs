//! Block engagement: a block contact locks both players in an Engagement
//! interrupt unless either is already engaged or in a tackle.

use crate::engine::components::BehaviorState;
use crate::engine::events::{BlockContactEvent, EventBus};
use crate::engine::interrupt::InterruptKind;
use crate::engine::systems::TickContext;
use crate::engine::types::EntityId;
use crate::engine::world::World;
use crate::error::InterruptError;

fn is_locked(world: &World, id: EntityId) -> bool {
    world.interrupts.get(id).is_some_and(|stack| {
        stack.has_active(InterruptKind::Engagement) || stack.has_active(InterruptKind::Tackle)
    })
}

pub fn run(world: &mut World, bus: &mut EventBus, ctx: &TickContext) -> Result<(), InterruptError> {
    let contacts = bus.take::<BlockContactEvent>();
    if !ctx.gates.live {
        return Ok(());
    }
    let seconds = ctx.config.actions.engagement_seconds;
    for contact in contacts {
        if is_locked(world, contact.blocker) || is_locked(world, contact.defender) {
            continue;
        }
        world.push_interrupt(contact.blocker, InterruptKind::Engagement, seconds, BehaviorState::Engaged)?;
        world.push_interrupt(contact.defender, InterruptKind::Engagement, seconds, BehaviorState::Engaged)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Role;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use crate::engine::types::{TeamSide, Vec2};

    #[test]
    fn test_block_engages_both() {
        let mut f = Fixture::live();
        let ol = f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(300.0, 200.0));
        let dl = f.spawn(TeamSide::Away, Role::DefensiveLine, Vec2::new(310.0, 200.0));
        let lb = f.spawn(TeamSide::Away, Role::Linebacker, Vec2::new(305.0, 210.0));
        f.bus.publish(BlockContactEvent { blocker: ol, defender: dl, position: Vec2::new(305.0, 200.0) });
        // Same blocker, second defender: blocker already engaged
        f.bus.publish(BlockContactEvent { blocker: ol, defender: lb, position: Vec2::new(302.0, 205.0) });

        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&mut f.world, &mut f.bus, &ctx).unwrap();

        assert_eq!(f.world.behaviors.get(ol).unwrap().state, BehaviorState::Engaged);
        assert_eq!(f.world.behaviors.get(dl).unwrap().state, BehaviorState::Engaged);
        assert!(f.world.interrupts.get(lb).unwrap().is_empty());
    }

    #[test]
    fn test_tackling_player_not_engaged() {
        let mut f = Fixture::live();
        let ol = f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(300.0, 200.0));
        let dl = f.spawn(TeamSide::Away, Role::DefensiveLine, Vec2::new(310.0, 200.0));
        f.world.push_interrupt(dl, InterruptKind::Tackle, 0.35, BehaviorState::Tackling).unwrap();
        f.bus.publish(BlockContactEvent { blocker: ol, defender: dl, position: Vec2::new(305.0, 200.0) });
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&mut f.world, &mut f.bus, &ctx).unwrap();
        assert!(f.world.interrupts.get(ol).unwrap().is_empty());
        assert_eq!(f.world.interrupts.get(dl).unwrap().len(), 1);
    }
}
