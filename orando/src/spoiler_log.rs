//! Serializable description of a finished seed: per-world option rolls and
//! check assignments, plus the progression sphere breakdown.

use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::randomize::{ItemToken, RouteInfo};
use crate::spheres::SphereAnalysis;

#[derive(Clone, Serialize, Deserialize)]
pub struct SpoilerCheck {
    /// Slot world, 1-based. Present only for multiworld seeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<usize>,
    pub slot: String,
    pub item: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SpoilerWorld {
    pub game: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasons: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entrances: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub portals: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rings: BTreeMap<String, String>,
    pub checks: Vec<SpoilerCheck>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SpoilerSphere {
    pub sphere: usize,
    pub checks: Vec<SpoilerCheck>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SpoilerLog {
    pub version: String,
    pub seed: String,
    pub worlds: Vec<SpoilerWorld>,
    pub spheres: Vec<SpoilerSphere>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreached: Vec<SpoilerCheck>,
}

// Items are listed under their logical names; the cosmetic ring remap only
// affects the patch plan. Foreign items are tagged with their owner.
fn item_display(slot_world: usize, item: &ItemToken, multi: bool) -> String {
    if multi && item.world != slot_world {
        format!("P{}'s {}", item.world + 1, item.name)
    } else {
        item.name.clone()
    }
}

pub fn get_spoiler_log(routes: &[RouteInfo], analysis: &SphereAnalysis) -> SpoilerLog {
    let multi = routes.len() > 1;
    let world_tag = |w: usize| if multi { Some(w + 1) } else { None };

    let worlds = routes
        .iter()
        .enumerate()
        .map(|(w, route)| {
            let mut checks: Vec<SpoilerCheck> = route
                .used_slots
                .iter()
                .zip(route.used_items.iter())
                .map(|(slot, item)| SpoilerCheck {
                    world: None,
                    slot: slot.clone(),
                    item: item_display(w, item, multi),
                })
                .collect();
            checks.sort_by(|a, b| a.slot.cmp(&b.slot));
            SpoilerWorld {
                game: route.settings.game.title().to_string(),
                flags: route.settings.flag_string(),
                companion: route.companion.clone(),
                seasons: route.seasons.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                entrances: route
                    .entrances
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                portals: route.portals.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                rings: route.ring_map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                checks,
            }
        })
        .collect();

    let spheres = analysis
        .spheres
        .iter()
        .enumerate()
        .map(|(n, sphere)| SpoilerSphere {
            sphere: n,
            checks: sphere
                .iter()
                .map(|c| SpoilerCheck {
                    world: world_tag(c.world),
                    slot: c.slot.clone(),
                    item: item_display(c.world, &c.item, multi),
                })
                .collect(),
        })
        .collect();

    let unreached = analysis
        .extra
        .iter()
        .map(|c| SpoilerCheck {
            world: world_tag(c.world),
            slot: c.slot.clone(),
            item: item_display(c.world, &c.item, multi),
        })
        .collect();

    SpoilerLog {
        version: crate::VERSION.to_string(),
        seed: format!("{:08x}", routes.first().map(|r| r.seed).unwrap_or(0)),
        worlds,
        spheres,
        unreached,
    }
}
