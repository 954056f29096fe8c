/// Short-lived debris: sparks, blood, dust and explosion fragments.

use rand::Rng;

const PARTICLE_GRAVITY: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Dust,
    Blood,
    Fire,
    Debris,
    Gold,
    Green,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining frames.
    pub life: f32,
    pub tint: Tint,
    pub size: f32,
}

/// `count` particles flung from (`x`, `y`) with a slight upward bias.
pub fn spawn_burst(
    rng: &mut impl Rng,
    x: f32,
    y: f32,
    tint: Tint,
    count: usize,
    speed: f32,
) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            x,
            y,
            vx: (rng.gen::<f32>() - 0.5) * speed,
            vy: (rng.gen::<f32>() - 0.5) * speed - 2.0,
            life: 15.0 + rng.gen::<f32>() * 25.0,
            tint,
            size: 2.0 + rng.gen::<f32>() * 4.0,
        })
        .collect()
}

pub fn update_particles(particles: &[Particle]) -> Vec<Particle> {
    particles
        .iter()
        .filter_map(|p| {
            let life = p.life - 1.0;
            (life > 0.0).then(|| Particle {
                x: p.x + p.vx,
                y: p.y + p.vy,
                vy: p.vy + PARTICLE_GRAVITY,
                life,
                ..p.clone()
            })
        })
        .collect()
}
