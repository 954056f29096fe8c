/// Shared platformer engine: geometry, kinematics, combat and screen flow.
///
/// Both platformers are parameterised over this module with their own
/// constants and level tables.

pub mod combat;
pub mod flow;
pub mod geometry;
pub mod particles;
pub mod physics;

pub use combat::{forward_hitbox, EntityId, Facing, Health, IdGen, Swing};
pub use flow::{advance, finished_transition, starts_new_run, FlowEvent, Screen, TRANSITION_FRAMES};
pub use geometry::{distance, Rect};
pub use particles::{spawn_burst, update_particles, Particle, Tint};
pub use physics::{Body, PhysicsParams};
