//! Cosmetic effects: ambient bubbles and explosion bursts
//!
//! None of this feeds back into gameplay, but it lives in the sim so it is
//! advanced by the same tick and stays reproducible under a seed.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{EXPLOSION_LIFESPAN, EXPLOSION_PARTICLES};

/// Bubbles above this height respawn
const BUBBLE_CEILING: f32 = 40.0;
/// Bubbles this far behind the sub respawn ahead of it
const BUBBLE_TRAIL: f32 = 100.0;

/// A rising ambient bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec3,
    pub radius: f32,
    /// Rise per tick
    pub speed: f32,
    /// Sideways sway amplitude
    pub wobble: f32,
}

impl Bubble {
    /// New bubble. `initial` spreads it over the opening span instead of
    /// placing it ahead of the sub.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, player_z: f32, initial: bool) -> Self {
        let radius = rng.random_range(0.1..0.3);
        let mut bubble = Self {
            pos: Vec3::ZERO,
            radius,
            speed: 0.0,
            wobble: 0.0,
        };
        bubble.reset(rng, player_z, initial);
        bubble
    }

    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, player_z: f32, initial: bool) {
        self.pos.x = rng.random::<f32>() * 60.0 - 30.0;
        self.pos.y = rng.random::<f32>() * 30.0;
        self.pos.z = if initial {
            rng.random::<f32>() * 200.0 - 100.0
        } else {
            player_z - BUBBLE_TRAIL
        };
        self.speed = rng.random_range(0.05..0.15);
        self.wobble = rng.random::<f32>() * 0.02;
    }

    /// Rise and sway; recycle once out of view
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, player_z: f32) {
        self.pos.y += self.speed;
        self.pos.x += (self.pos.y * 0.1).sin() * self.wobble;
        if self.pos.y > BUBBLE_CEILING || self.pos.z > player_z + BUBBLE_TRAIL {
            self.reset(rng, player_z, false);
        }
    }
}

/// One fragment of an explosion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Ticks remaining
    pub life: u32,
    pub scale: f32,
}

impl BurstParticle {
    pub fn opacity(&self) -> f32 {
        self.life as f32 / EXPLOSION_LIFESPAN as f32
    }
}

/// A timed burst of debris, spawned when the sub is destroyed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionBurst {
    pub particles: Vec<BurstParticle>,
}

impl ExplosionBurst {
    pub fn new<R: Rng + ?Sized>(origin: Vec3, rng: &mut R) -> Self {
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                let dir = Vec3::new(
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                );
                BurstParticle {
                    pos: origin,
                    vel: dir * 0.5,
                    life: EXPLOSION_LIFESPAN,
                    scale: 1.0,
                }
            })
            .collect();
        Self { particles }
    }

    /// Advance one tick; expired particles are dropped
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
            p.scale *= 0.98;
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Advance every burst and drop the finished ones
pub fn step_bursts(bursts: &mut Vec<ExplosionBurst>) {
    for burst in bursts.iter_mut() {
        burst.step();
    }
    bursts.retain(|b| !b.is_finished());
}
