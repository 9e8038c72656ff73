//! A small collision world implementing [`RayCaster`].
//!
//! Holds axis-aligned boxes and spheres, each on a layer and optionally
//! tagged with a host entity. Used for headless runs and tests; real hosts
//! hand the simulation their own physics.

use beambounce_core::geometry::{RayCaster, RayHit};
use beambounce_core::id::EntityId;
use beambounce_core::layer::{Layer, LayerMask};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a collider in a [`Scene`].
    pub struct ColliderId;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Box { center: Vec3, half_extents: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Shape {
    /// Whether `point` lies strictly inside the shape.
    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            Shape::Box {
                center,
                half_extents,
            } => {
                let d = (point - center).abs();
                d.x < half_extents.x && d.y < half_extents.y && d.z < half_extents.z
            }
            Shape::Sphere { center, radius } => point.distance_squared(center) < radius * radius,
        }
    }

    /// Distance along `dir` (unit) to the first surface crossing, and the
    /// outward normal there.
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
        match *self {
            Shape::Box {
                center,
                half_extents,
            } => ray_box(origin, dir, center - half_extents, center + half_extents),
            Shape::Sphere { center, radius } => ray_sphere(origin, dir, center, radius),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub layer: Layer,
    pub entity: Option<EntityId>,
}

/// A collision world of boxes and spheres.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    colliders: SlotMap<ColliderId, Collider>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, collider: Collider) -> ColliderId {
        self.colliders.insert(collider)
    }

    pub fn add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        layer: Layer,
        entity: Option<EntityId>,
    ) -> ColliderId {
        self.add(Collider {
            shape: Shape::Box {
                center,
                half_extents,
            },
            layer,
            entity,
        })
    }

    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        layer: Layer,
        entity: Option<EntityId>,
    ) -> ColliderId {
        self.add(Collider {
            shape: Shape::Sphere { center, radius },
            layer,
            entity,
        })
    }

    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(id)
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Shift a collider by `offset`. Returns false if it does not exist.
    pub fn translate(&mut self, id: ColliderId, offset: Vec3) -> bool {
        let Some(collider) = self.colliders.get_mut(id) else {
            return false;
        };
        match &mut collider.shape {
            Shape::Box { center, .. } | Shape::Sphere { center, .. } => *center += offset,
        }
        true
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders.iter()
    }
}

impl RayCaster for Scene {
    /// Nearest hit among colliders whose layer is in `mask`. Colliders that
    /// contain the origin are skipped.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        self.colliders
            .values()
            .filter(|c| mask.contains(c.layer) && !c.shape.contains(origin))
            .filter_map(|c| {
                let (t, normal) = c.shape.intersect(origin, dir)?;
                (t <= max_distance).then_some((t, normal, c))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, normal, c)| RayHit {
                point: origin + dir * t,
                normal,
                layer: c.layer,
                entity: c.entity,
            })
    }
}

// ---------------------------------------------------------------------------
// Intersection
// ---------------------------------------------------------------------------

/// Slab test. The normal is that of the face the ray enters through.
fn ray_box(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let (o, d) = (origin[axis], dir[axis]);
        if d.abs() <= f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let (t0, t1) = {
            let a = (min[axis] - o) / d;
            let b = (max[axis] - o) / d;
            if a <= b { (a, b) } else { (b, a) }
        };
        if t0 > t_near {
            t_near = t0;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    (t_near >= 0.0).then_some((t_near, normal))
}

fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let normal = (origin + dir * t - center) / radius;
    Some((t, normal))
}
