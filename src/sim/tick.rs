//! Frame advance with adaptive sub-stepping
//!
//! A frame delta is split into enough sub-steps that the ball never moves
//! further than a fraction of its radius between collision checks.

use super::collision::Resolution;
use super::state::{SimEvent, World};

/// How a frame delta is divided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubstepPlan {
    pub steps: u32,
    pub step_dt: f32,
}

/// What happened during one call to [`advance`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Frame delta after clamping
    pub dt: f32,
    /// Sub-steps run
    pub steps: u32,
    /// Bounces in the order they happened
    pub events: Vec<SimEvent>,
}

impl StepReport {
    #[inline]
    pub fn bounced(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Clamp a frame delta to `[0, max_dt]`
///
/// Long stalls (a backgrounded tab, a debugger break) would otherwise be
/// replayed as one huge step.
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    if dt > max_dt {
        log::debug!("Clamping frame delta {dt:.4}s to {max_dt:.4}s");
        return max_dt;
    }
    dt
}

/// Split `dt` so each sub-step covers at most `max_step_distance`
pub fn plan_substeps(speed: f32, dt: f32, max_step_distance: f32) -> SubstepPlan {
    let travel = speed * dt;
    let steps = ((travel / max_step_distance).ceil() as u32).max(1);
    SubstepPlan {
        steps,
        step_dt: dt / steps as f32,
    }
}

/// Advance the world by one frame
pub fn advance(world: &mut World, dt: f32) -> StepReport {
    let dt = clamp_frame_dt(dt, world.settings().max_frame_dt);
    if dt == 0.0 {
        return StepReport::default();
    }

    let plan = plan_substeps(world.speed(), dt, world.settings().max_step_distance());
    log::trace!(
        "Frame {:.4}s: {} sub-steps of {:.5}s",
        dt,
        plan.steps,
        plan.step_dt
    );

    let mut events = Vec::new();
    for _ in 0..plan.steps {
        if let Resolution::Bounced {
            contact,
            speed_after,
            ..
        } = world.step_ball(plan.step_dt)
        {
            log::debug!(
                "Bounce off edge {}: {} sides, speed {:.1}",
                contact.edge,
                world.sides(),
                speed_after
            );
            events.push(SimEvent::Bounce {
                edge: contact.edge,
                sides: world.sides(),
                speed: speed_after,
            });
        }
    }

    world.ball.record_trail();

    StepReport {
        dt,
        steps: plan.steps,
        events,
    }
}
