//! Fixed timestep simulation tick
//!
//! Core game loop that advances the scene deterministically: apply input,
//! step physics, hand every new contact to the scene.

use super::scene::GameScene;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal drag/touch position in scene coordinates
    pub touch_x: Option<f32>,
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut GameScene, input: &TickInput, dt: f32) {
    // Nothing moves once the ball is gone
    if scene.is_game_over() {
        return;
    }

    if let Some(x) = input.touch_x {
        scene.touch_moved(x);
    }

    let contacts = scene.world_mut().step(dt);
    for contact in contacts {
        scene.did_begin(contact);
    }
}

/// Turns variable frame times into fixed ticks
#[derive(Debug, Clone)]
pub struct Stepper {
    accumulator: f32,
    max_substeps: u32,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(MAX_SUBSTEPS)
    }
}

impl Stepper {
    pub fn new(max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Run as many fixed ticks as `frame_dt` covers. Returns the tick count.
    pub fn advance(&mut self, scene: &mut GameScene, input: &TickInput, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            tick(scene, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
