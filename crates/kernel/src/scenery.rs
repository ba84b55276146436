//! Decorative props that scroll with the world and get recycled.
//!
//! Scenery never takes part in collision; it exists so a renderer has a
//! moving world to draw.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::rng::SplitMix64;
use crate::settings::GameSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Tree,
    Cloud,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub kind: PropKind,
    pub position: Vec3,
}

/// Ground scroll offset plus the recycled trees and clouds.
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    ground_offset: f32,
    props: Vec<Prop>,
}

impl Scenery {
    /// Scatter trees beside the road and clouds overhead.
    pub fn generate(settings: &GameSettings, rng: &mut SplitMix64) -> Self {
        let sc = &settings.scenery;
        let mut props = Vec::with_capacity(sc.tree_count + sc.cloud_count);
        for _ in 0..sc.cloud_count {
            let position = Vec3::new(
                rng.range_f32(-0.5, 0.5) * sc.world_width,
                rng.range_f32(30.0, 50.0),
                rng.range_f32(-sc.world_depth / 2.0, sc.camera_distance + 50.0),
            );
            props.push(Prop {
                kind: PropKind::Cloud,
                position,
            });
        }
        for _ in 0..sc.tree_count {
            let position = Vec3::new(
                tree_lateral(settings, rng),
                settings.ground_level,
                rng.range_f32(-sc.world_depth / 2.0, sc.camera_distance + 20.0),
            );
            props.push(Prop {
                kind: PropKind::Tree,
                position,
            });
        }
        Self {
            ground_offset: 0.0,
            props,
        }
    }

    /// Offset of the repeating ground and road texture, in `[0, tile)`.
    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Scroll everything by `travel` and recycle props that went behind the
    /// camera. Returns how many props were recycled.
    pub fn advance(&mut self, travel: f32, settings: &GameSettings, rng: &mut SplitMix64) -> usize {
        let sc = &settings.scenery;
        self.ground_offset = (self.ground_offset + travel).rem_euclid(settings.ground_tile_length);

        let mut recycled = 0;
        for prop in &mut self.props {
            match prop.kind {
                PropKind::Tree => {
                    prop.position.z += travel;
                    if prop.position.z > sc.camera_distance + 20.0 {
                        prop.position.z = -sc.world_depth / 2.0;
                        prop.position.x = tree_lateral(settings, rng);
                        recycled += 1;
                    }
                }
                PropKind::Cloud => {
                    prop.position.z += travel * sc.cloud_speed_factor;
                    if prop.position.z > sc.camera_distance + 50.0 {
                        prop.position.z = -sc.world_depth / 2.0;
                        prop.position.x = rng.range_f32(-0.5, 0.5) * sc.world_width;
                        prop.position.y = rng.range_f32(30.0, 50.0);
                        recycled += 1;
                    }
                }
            }
        }
        recycled
    }
}

/// Trees stand on either side of the road, never on it.
fn tree_lateral(settings: &GameSettings, rng: &mut SplitMix64) -> f32 {
    let side = rng.sign();
    side * (settings.scenery.road_width / 2.0 + 5.0 + rng.range_f32(0.0, 20.0))
}
