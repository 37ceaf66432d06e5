//! Time-bounded visual effects: explosion bursts, letter debris and camera feedback
//!
//! Effects never influence gameplay. They keep animating in every phase so an
//! explosion started just before game over still plays out.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::matcher::HitEvent;
use crate::Rgb;
use crate::consts::*;

/// A single burst particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
}

/// A cloud of particles expanding from one point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub origin: Vec3,
    pub base_color: Rgb,
    pub particles: Vec<Particle>,
    /// Seconds left; the burst is retired at or below zero
    pub remaining_lifetime: f32,
}

impl ParticleBurst {
    /// Render hint: fades linearly with remaining lifetime
    pub fn opacity(&self) -> f32 {
        self.remaining_lifetime.clamp(0.0, 1.0)
    }

    fn advance(&mut self, delta_ticks: f32) {
        self.remaining_lifetime -= LIFETIME_PER_TICK * delta_ticks;
        for p in &mut self.particles {
            p.vel.y -= PARTICLE_GRAVITY * delta_ticks;
            p.pos += p.vel * delta_ticks;
        }
    }
}

/// A small copy of a destroyed letter tumbling away
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub character: char,
    pub color: Rgb,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Euler rotation (x, y) in radians
    pub rotation: Vec2,
    pub rotation_vel: Vec2,
    pub remaining_lifetime: f32,
}

impl TextFragment {
    pub fn opacity(&self) -> f32 {
        self.remaining_lifetime.clamp(0.0, 1.0)
    }

    fn advance(&mut self, delta_ticks: f32) {
        self.remaining_lifetime -= LIFETIME_PER_TICK * delta_ticks;
        self.pos += self.vel * delta_ticks;
        self.rotation += self.rotation_vel * delta_ticks;
    }
}

/// Hit explosion waiting for the laser to arrive
#[derive(Debug, Clone, Copy)]
struct PendingHit {
    hit: HitEvent,
    remaining_ms: f64,
}

/// Owns and advances every visual effect
#[derive(Debug, Clone)]
pub struct EffectsScheduler {
    bursts: Vec<ParticleBurst>,
    fragments: Vec<TextFragment>,
    pending: Vec<PendingHit>,
    rng: Pcg32,
}

impl EffectsScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            bursts: Vec::new(),
            fragments: Vec::new(),
            pending: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn pending_hits(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.bursts.is_empty() && self.fragments.is_empty() && self.pending.is_empty()
    }

    /// Drop every effect, including hits still waiting to explode
    pub fn clear(&mut self) {
        self.bursts.clear();
        self.fragments.clear();
        self.pending.clear();
    }

    /// Explode `hit` after `delay_ms`; a zero delay explodes immediately
    pub fn schedule_hit(&mut self, hit: HitEvent, delay_ms: f64) {
        if delay_ms <= 0.0 {
            self.explode(&hit);
        } else {
            self.pending.push(PendingHit {
                hit,
                remaining_ms: delay_ms,
            });
        }
    }

    fn explode(&mut self, hit: &HitEvent) {
        self.spawn_burst(hit.position, hit.color);
        self.spawn_fragments(hit.position, hit.character);
    }

    /// Spawn a particle burst at `origin`
    pub fn spawn_burst(&mut self, origin: Vec3, color: Rgb) {
        let half = BURST_SPEED / 2.0;
        let particles = (0..BURST_PARTICLES)
            .map(|_| Particle {
                pos: origin,
                vel: random_vec3(&mut self.rng, half),
            })
            .collect();
        self.bursts.push(ParticleBurst {
            origin,
            base_color: color,
            particles,
            remaining_lifetime: BURST_LIFETIME,
        });
    }

    /// Spawn the debris batch for a destroyed letter
    pub fn spawn_fragments(&mut self, origin: Vec3, character: char) {
        let half = FRAGMENT_SPEED / 2.0;
        for _ in 0..FRAGMENT_COUNT {
            let vel = random_vec3(&mut self.rng, half);
            let color = Rgb::new(self.rng.random(), self.rng.random(), self.rng.random());
            self.fragments.push(TextFragment {
                character,
                color,
                pos: origin,
                vel,
                rotation: Vec2::ZERO,
                rotation_vel: vel.truncate() * FRAGMENT_SPIN,
                remaining_lifetime: FRAGMENT_LIFETIME,
            });
        }
    }

    /// Step every effect and retire the expired ones
    pub fn advance(&mut self, delta_ticks: f32) {
        if !self.pending.is_empty() {
            let elapsed_ms = f64::from(delta_ticks * TICK_MS);
            let mut ready = Vec::new();
            self.pending.retain_mut(|p| {
                p.remaining_ms -= elapsed_ms;
                if p.remaining_ms <= 0.0 {
                    ready.push(p.hit);
                    false
                } else {
                    true
                }
            });
            for hit in &ready {
                self.explode(hit);
            }
        }

        for burst in &mut self.bursts {
            burst.advance(delta_ticks);
        }
        self.bursts.retain(|b| b.remaining_lifetime > 0.0);

        for fragment in &mut self.fragments {
            fragment.advance(delta_ticks);
        }
        self.fragments.retain(|f| f.remaining_lifetime > 0.0);
    }
}

fn random_vec3(rng: &mut Pcg32, half_extent: f32) -> Vec3 {
    Vec3::new(
        rng.random_range(-half_extent..half_extent),
        rng.random_range(-half_extent..half_extent),
        rng.random_range(-half_extent..half_extent),
    )
}

/// Camera shake and damage flash
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenFeedback {
    pub shake_time: f32,
    pub shake_amplitude: f32,
    pub flash_time: f32,
}

impl ScreenFeedback {
    pub fn shake(&mut self, (duration, amplitude): (f32, f32)) {
        self.shake_time = duration;
        self.shake_amplitude = amplitude;
    }

    pub fn flash(&mut self, duration: f32) {
        self.flash_time = duration;
    }

    pub fn advance(&mut self, delta_ticks: f32) {
        let dt = LIFETIME_PER_TICK * delta_ticks;
        self.shake_time = (self.shake_time - dt).max(0.0);
        if self.shake_time == 0.0 {
            self.shake_amplitude = 0.0;
        }
        self.flash_time = (self.flash_time - dt).max(0.0);
    }

    /// Camera offset to apply this frame (`time_ms` drives the wobble)
    pub fn shake_offset(&self, time_ms: f32) -> Vec2 {
        if self.shake_time <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (time_ms * 0.05).sin() * self.shake_amplitude,
            (time_ms * 0.05).cos() * self.shake_amplitude,
        )
    }

    /// Opacity of the red damage overlay
    pub fn flash_opacity(&self) -> f32 {
        if self.flash_time <= 0.0 {
            return 0.0;
        }
        MISS_FLASH_OPACITY * (self.flash_time / MISS_FLASH).min(1.0)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(position: Vec3) -> HitEvent {
        HitEvent {
            id: 1,
            position,
            color: Rgb::new(0.2, 0.8, 1.0),
            character: 'N',
        }
    }

    #[test]
    fn test_burst_shape() {
        let mut effects = EffectsScheduler::new(1);
        effects.spawn_burst(Vec3::new(1.0, 2.0, 3.0), Rgb::RED);
        let burst = &effects.bursts()[0];
        assert_eq!(burst.particles.len(), BURST_PARTICLES);
        assert_eq!(burst.remaining_lifetime, BURST_LIFETIME);
        assert!(burst.particles.iter().all(|p| p.pos == Vec3::new(1.0, 2.0, 3.0)));
        assert!(burst.particles.iter().all(|p| p.vel.abs().max_element() <= BURST_SPEED / 2.0));
    }

    #[test]
    fn test_gravity_pulls_particles_down() {
        let mut effects = EffectsScheduler::new(2);
        effects.spawn_burst(Vec3::ZERO, Rgb::RED);
        let before: Vec<f32> = effects.bursts()[0].particles.iter().map(|p| p.vel.y).collect();
        effects.advance(1.0);
        for (p, vy) in effects.bursts()[0].particles.iter().zip(before) {
            assert!((p.vel.y - (vy - PARTICLE_GRAVITY)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bursts_and_fragments_expire() {
        let mut effects = EffectsScheduler::new(3);
        effects.schedule_hit(hit_at(Vec3::ZERO), 0.0);
        assert_eq!(effects.bursts().len(), 1);
        assert_eq!(effects.fragments().len(), FRAGMENT_COUNT);
        assert!(effects.fragments().iter().all(|f| f.character == 'N'));

        // Fragments live 1.0s = 62.5 ticks, bursts 1.5s = 93.75 ticks
        for _ in 0..63 {
            effects.advance(1.0);
        }
        assert!(effects.fragments().is_empty());
        assert_eq!(effects.bursts().len(), 1);
        assert!(effects.bursts()[0].opacity() < 0.5);

        for _ in 0..31 {
            effects.advance(1.0);
        }
        assert!(effects.is_idle());
    }

    #[test]
    fn test_delayed_hit_waits_for_laser() {
        let mut effects = EffectsScheduler::new(4);
        effects.schedule_hit(hit_at(Vec3::ONE), 100.0);
        assert!(effects.bursts().is_empty());
        assert_eq!(effects.pending_hits(), 1);

        // 6 ticks = 96ms
        for _ in 0..6 {
            effects.advance(1.0);
        }
        assert!(effects.bursts().is_empty());
        effects.advance(1.0);
        assert_eq!(effects.bursts().len(), 1);
        assert_eq!(effects.pending_hits(), 0);

        effects.clear();
        assert!(effects.is_idle());
    }

    #[test]
    fn test_fragment_spin_follows_velocity() {
        let mut effects = EffectsScheduler::new(5);
        effects.spawn_fragments(Vec3::ZERO, 'Q');
        let fragment = effects.fragments()[0];
        assert_eq!(fragment.rotation_vel, fragment.vel.truncate() * FRAGMENT_SPIN);
        effects.advance(2.0);
        let moved = effects.fragments()[0];
        assert!((moved.pos - fragment.vel * 2.0).length() < 1e-5);
    }

    #[test]
    fn test_screen_feedback_decays() {
        let mut feedback = ScreenFeedback::default();
        assert_eq!(feedback.shake_offset(123.0), Vec2::ZERO);

        feedback.shake(MISS_SHAKE);
        feedback.flash(MISS_FLASH);
        assert!((feedback.flash_opacity() - MISS_FLASH_OPACITY).abs() < 1e-6);
        assert!(feedback.shake_offset(0.0).length() > 0.0);

        for _ in 0..7 {
            feedback.advance(1.0);
        }
        assert_eq!(feedback.flash_opacity(), 0.0);
        assert!(feedback.shake_time > 0.0);

        for _ in 0..30 {
            feedback.advance(1.0);
        }
        assert_eq!(feedback, ScreenFeedback::default());
    }
}
