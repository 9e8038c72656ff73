//! Ray-query capability and vector helpers.
//!
//! The simulation consumes exactly one piece of physics from its host:
//! "cast a ray and return the nearest obstruction". Hosts implement
//! [`RayCaster`] over whatever collision world they own; closures with the
//! matching signature implement it too, which keeps tests small.

use crate::id::EntityId;
use crate::layer::{Layer, LayerMask};
pub use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The nearest obstruction found by a ray query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Unit surface normal at the contact point, facing the incoming ray.
    pub normal: Vec3,
    /// Layer of the collider that was hit.
    pub layer: Layer,
    /// Host entity owning the collider, if the host tracks one.
    pub entity: Option<EntityId>,
}

/// Host-supplied ray query.
///
/// `direction` is a unit vector. Implementations return the nearest hit
/// within `max_distance` whose layer is a member of `mask`, or `None`.
pub trait RayCaster {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

impl<F> RayCaster for F
where
    F: Fn(Vec3, Vec3, f32, LayerMask) -> Option<RayHit>,
{
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self(origin, direction, max_distance, mask)
    }
}

/// Mirror `direction` about the plane with unit normal `normal`:
/// `d' = d - 2 (d . n) n`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}
