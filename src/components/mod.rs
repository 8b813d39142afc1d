//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – playback state, conditions and the animation state machine
//! - [`boxcollider`] – axis-aligned box that collides with solid tiles
//! - [`cameratarget`] – marks the entity the camera follows
//! - [`chaser`] – pursue another entity while it is in sight
//! - [`dead`] – marks an entity for removal at the end of the frame
//! - [`inputcontrolled`] – entity steered by the keyboard
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`movement`] – speed, desired and facing direction
//! - [`signals`] – per-entity signal storage for cross-system communication
//! - [`sprite`] – fallback drawing when no animation frame is available
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod animation;
pub mod boxcollider;
pub mod cameratarget;
pub mod chaser;
pub mod dead;
pub mod inputcontrolled;
pub mod mapposition;
pub mod movement;
pub mod signals;
pub mod sprite;
pub mod zindex;
