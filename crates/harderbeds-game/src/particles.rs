//! Particle effects used to visualise a simulated mob path.

/// Particle effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Burst marking where the path ends.
    Flame,
    /// Trail along the path nodes.
    SoulFireFlame,
}

/// Destination for particle effects. Fire-and-forget.
pub trait ParticleSink {
    fn emit(&mut self, kind: ParticleKind, position: (f32, f32, f32), count: u32, spread: f32);
}

/// Sink that drops every effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParticles;

impl ParticleSink for NoParticles {
    fn emit(&mut self, _kind: ParticleKind, _position: (f32, f32, f32), _count: u32, _spread: f32) {}
}

/// A recorded particle emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBurst {
    pub kind: ParticleKind,
    pub position: (f32, f32, f32),
    pub count: u32,
    pub spread: f32,
}

/// Sink that keeps every emission, for hosts that forward effects in batches.
#[derive(Debug, Default)]
pub struct ParticleLog {
    pub bursts: Vec<ParticleBurst>,
}

impl ParticleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded emissions.
    pub fn drain(&mut self) -> Vec<ParticleBurst> {
        std::mem::take(&mut self.bursts)
    }
}

impl ParticleSink for ParticleLog {
    fn emit(&mut self, kind: ParticleKind, position: (f32, f32, f32), count: u32, spread: f32) {
        self.bursts.push(ParticleBurst {
            kind,
            position,
            count,
            spread,
        });
    }
}
