use cobble_input::context::{Entities, EntityId, SELF_ID};
use cobble_shared::physics::{Ray, AABB};
use glam::Vec3;
use rustc_hash::FxHashMap;

const ENTITY_SIZE: Vec3 = Vec3::new(0.6, 1.8, 0.6);

/// Distance along `ray` where it enters `bounds`, if it does.
fn ray_hit_distance(ray: &Ray, bounds: &AABB) -> Option<f32> {
    let inv = ray.direction.recip();
    let t1 = (bounds.min - ray.origin) * inv;
    let t2 = (bounds.max - ray.origin) * inv;
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();

    if t_far < 0.0 || t_near > t_far {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Other players, as told by the server.
#[derive(Default)]
pub struct RemoteEntities {
    positions: FxHashMap<EntityId, Vec3>,
    view: Option<(Ray, f32)>,
}

impl RemoteEntities {
    pub fn update(&mut self, id: EntityId, position: Vec3) {
        if id == SELF_ID {
            return;
        }
        self.positions.insert(id, position);
    }

    pub fn remove(&mut self, id: EntityId) {
        self.positions.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Where the local player is looking from, and how far they can reach.
    pub fn set_view(&mut self, ray: Ray, reach: f32) {
        self.view = Some((ray, reach));
    }
}

impl Entities for RemoteEntities {
    fn bounds(&self, id: EntityId) -> Option<AABB> {
        self.positions
            .get(&id)
            .map(|&position| AABB::from_position_size(position, ENTITY_SIZE))
    }

    /// The nearest entity under the crosshair within reach.
    fn closest_to_player(&self) -> EntityId {
        let Some((ray, reach)) = self.view else {
            return SELF_ID;
        };

        self.positions
            .keys()
            .filter_map(|&id| {
                let bounds = self.bounds(id)?;
                let distance = ray_hit_distance(&ray, &bounds)?;
                (distance <= reach).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(SELF_ID, |(id, _)| id)
    }
}
