use glam::{IVec3, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Box of an entity standing at `position` (feet centre) with the given size.
    pub fn from_position_size(position: Vec3, size: Vec3) -> Self {
        let half = Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        Self {
            min: position - half,
            max: position + Vec3::new(half.x, size.y, half.z),
        }
    }

    /// Box of a block at `cell` using the block's own bounding offsets.
    pub fn block(cell: Vec3, min_bb: Vec3, max_bb: Vec3) -> Self {
        Self {
            min: cell + min_bb,
            max: cell + max_bb,
        }
    }

    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Like [`AABB::intersects`], but boxes sharing a face or edge also count.
    pub fn touches(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub fn normal_ivec3(&self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }
}

/// One voxel visited by a ray, with the face it was entered through.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RaycastHit {
    pub cell: IVec3,
    pub face: Face,
    pub distance: f32,
}

#[derive(Debug, Copy, Clone)]
pub struct RaycastIter {
    current: IVec3,
    step: IVec3,
    t_max: Vec3,
    t_delta: Vec3,
    max_distance: f32,
    started: bool,
    finished: bool,
}

fn axis_step(direction: f32) -> i32 {
    if direction > 0.0 {
        1
    } else if direction < 0.0 {
        -1
    } else {
        0
    }
}

impl RaycastIter {
    fn new(ray: &Ray, max_distance: f32) -> Self {
        let direction = ray.direction;
        let step = IVec3::new(
            axis_step(direction.x),
            axis_step(direction.y),
            axis_step(direction.z),
        );
        let current = ray.origin.floor().as_ivec3();

        let boundary = |cell: i32, step: i32| {
            if step > 0 {
                cell as f32 + 1.0
            } else {
                cell as f32
            }
        };
        let first_crossing = |next: f32, origin: f32, dir: f32| {
            if dir != 0.0 {
                (next - origin) / dir
            } else {
                f32::INFINITY
            }
        };
        let crossing_spacing = |dir: f32| {
            if dir != 0.0 {
                1.0 / dir.abs()
            } else {
                f32::INFINITY
            }
        };

        let t_max = Vec3::new(
            first_crossing(boundary(current.x, step.x), ray.origin.x, direction.x),
            first_crossing(boundary(current.y, step.y), ray.origin.y, direction.y),
            first_crossing(boundary(current.z, step.z), ray.origin.z, direction.z),
        );
        let t_delta = Vec3::new(
            crossing_spacing(direction.x),
            crossing_spacing(direction.y),
            crossing_spacing(direction.z),
        );

        Self {
            current,
            step,
            t_max,
            t_delta,
            max_distance: max_distance.max(0.0),
            started: false,
            finished: false,
        }
    }
}

impl Iterator for RaycastIter {
    type Item = RaycastHit;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(RaycastHit {
                cell: self.current,
                face: Face::NegY,
                distance: 0.0,
            });
        }

        let (axis, distance) = if self.t_max.x <= self.t_max.y && self.t_max.x <= self.t_max.z {
            (0usize, self.t_max.x)
        } else if self.t_max.y <= self.t_max.z {
            (1usize, self.t_max.y)
        } else {
            (2usize, self.t_max.z)
        };

        if !distance.is_finite() || distance > self.max_distance {
            self.finished = true;
            return None;
        }

        let face = match axis {
            0 => {
                self.current.x += self.step.x;
                self.t_max.x += self.t_delta.x;
                if self.step.x > 0 {
                    Face::NegX
                } else {
                    Face::PosX
                }
            }
            1 => {
                self.current.y += self.step.y;
                self.t_max.y += self.t_delta.y;
                if self.step.y > 0 {
                    Face::NegY
                } else {
                    Face::PosY
                }
            }
            _ => {
                self.current.z += self.step.z;
                self.t_max.z += self.t_delta.z;
                if self.step.z > 0 {
                    Face::NegZ
                } else {
                    Face::PosZ
                }
            }
        };

        Some(RaycastHit {
            cell: self.current,
            face,
            distance,
        })
    }
}

pub fn raycast_blocks(ray: &Ray, max_distance: f32) -> impl Iterator<Item = RaycastHit> {
    RaycastIter::new(ray, max_distance)
}

/// The block under the crosshair, recomputed every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SelectedPos {
    pub valid: bool,
    pub block_pos: IVec3,
    /// Cell adjacent to `block_pos` on the side the player is looking from.
    pub translated_pos: IVec3,
    pub closest: Face,
    pub intersect: Vec3,
}

impl SelectedPos {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            block_pos: IVec3::splat(-1),
            translated_pos: IVec3::splat(-1),
            closest: Face::PosY,
            intersect: Vec3::ZERO,
        }
    }

    pub fn new(block_pos: IVec3, closest: Face, intersect: Vec3) -> Self {
        Self {
            valid: true,
            block_pos,
            translated_pos: block_pos + closest.normal_ivec3(),
            closest,
            intersect,
        }
    }
}

impl Default for SelectedPos {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Walks `ray` up to `reach` and selects the first cell `is_target` accepts.
/// The cell the ray starts in is never selected.
pub fn pick_selection(
    ray: &Ray,
    reach: f32,
    mut is_target: impl FnMut(IVec3) -> bool,
) -> SelectedPos {
    raycast_blocks(ray, reach)
        .skip(1)
        .find(|hit| is_target(hit.cell))
        .map(|hit| {
            let intersect = ray.origin + ray.direction * hit.distance;
            SelectedPos::new(hit.cell, hit.face, intersect)
        })
        .unwrap_or_else(SelectedPos::invalid)
}

#[cfg(test)]
mod tests {
    use glam::{IVec3, Vec3};

    use super::{pick_selection, raycast_blocks, Face, Ray, AABB};

    #[test]
    fn aabb_collision_detection() {
        let a = AABB {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        let b = AABB {
            min: Vec3::new(0.5, 0.25, 0.5),
            max: Vec3::new(1.5, 1.25, 1.5),
        };
        let c = AABB {
            min: Vec3::new(1.0, 1.0, 1.0),
            max: Vec3::new(2.0, 2.0, 2.0),
        };

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn touching_boxes_count_as_touching_but_not_intersecting() {
        let a = AABB {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        let flush = AABB {
            min: Vec3::new(1.0, 0.0, 0.0),
            max: Vec3::new(2.0, 1.0, 1.0),
        };
        let apart = AABB {
            min: Vec3::new(1.01, 0.0, 0.0),
            max: Vec3::new(2.0, 1.0, 1.0),
        };

        assert!(!a.intersects(&flush));
        assert!(a.touches(&flush));
        assert!(!a.touches(&apart));
    }

    #[test]
    fn entity_box_is_centred_on_feet() {
        let bb = AABB::from_position_size(Vec3::new(5.0, 10.0, 5.0), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(bb.min, Vec3::new(4.5, 10.0, 4.5));
        assert_eq!(bb.max, Vec3::new(5.5, 12.0, 5.5));
    }

    #[test]
    fn raycast_returns_expected_voxels_and_faces() {
        let ray = Ray {
            origin: Vec3::new(0.5, 0.5, 0.5),
            direction: Vec3::X,
        };

        let visited: Vec<(IVec3, Face)> = raycast_blocks(&ray, 2.1)
            .take(5)
            .map(|hit| (hit.cell, hit.face))
            .collect();
        assert_eq!(
            visited,
            vec![
                (IVec3::new(0, 0, 0), Face::NegY),
                (IVec3::new(1, 0, 0), Face::NegX),
                (IVec3::new(2, 0, 0), Face::NegX),
            ]
        );
    }

    #[test]
    fn selection_reports_placement_cell_toward_viewer() {
        let ray = Ray {
            origin: Vec3::new(0.5, 5.5, 0.5),
            direction: Vec3::NEG_Y,
        };

        let selected = pick_selection(&ray, 8.0, |cell| cell.y <= 2);
        assert!(selected.valid);
        assert_eq!(selected.block_pos, IVec3::new(0, 2, 0));
        assert_eq!(selected.closest, Face::PosY);
        assert_eq!(selected.translated_pos, IVec3::new(0, 3, 0));
        assert!((selected.intersect.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn selection_is_invalid_when_nothing_is_in_reach() {
        let ray = Ray {
            origin: Vec3::new(0.5, 5.5, 0.5),
            direction: Vec3::Y,
        };

        let selected = pick_selection(&ray, 4.0, |_| false);
        assert!(!selected.valid);
    }
}
