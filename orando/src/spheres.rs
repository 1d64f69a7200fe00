//! Progression sphere analysis: replays the finished placement against fresh
//! graph clones, collecting every newly reachable check in rounds. Sphere 0
//! holds the checks available before any item is collected; sphere N holds
//! the checks unlocked by the contents of spheres 0..N.

use hashbrown::{HashMap, HashSet};
use orando_logic::Graph;

use crate::randomize::{ItemToken, RouteInfo};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub world: usize,
    pub slot: String,
    pub item: ItemToken,
}

pub struct SphereAnalysis {
    pub spheres: Vec<Vec<Check>>,
    /// Checks that never entered any sphere. A verified fill yields none;
    /// reported rather than silently dropped if a table change breaks that.
    pub extra: Vec<Check>,
}

pub fn get_spheres(routes: &[RouteInfo]) -> SphereAnalysis {
    let mut graphs: Vec<Graph> = routes.iter().map(|r| r.pristine.clone()).collect();
    let checks: Vec<HashMap<String, ItemToken>> = routes.iter().map(RouteInfo::checks).collect();
    let mut collected: Vec<HashSet<String>> = vec![HashSet::new(); routes.len()];
    let mut spheres: Vec<Vec<Check>> = Vec::new();
    loop {
        // Slot ids come out name-sorted, so sphere contents are stable for a
        // given placement.
        let mut new_slots: Vec<(usize, String)> = Vec::new();
        for (w, g) in graphs.iter().enumerate() {
            for &s in g.slot_ids() {
                if g.reached(s) && !collected[w].contains(g.name(s)) {
                    new_slots.push((w, g.name(s).to_string()));
                }
            }
        }
        if new_slots.is_empty() {
            break;
        }
        let mut sphere = Vec::new();
        for (w, slot) in new_slots {
            collected[w].insert(slot.clone());
            if let Some(item) = checks[w].get(&slot) {
                // Collection applies to the owning world's graph, which may
                // differ from the slot's world.
                if let Some(node) = graphs[item.world].lookup(&item.name) {
                    graphs[item.world].reach(node);
                }
                sphere.push(Check {
                    world: w,
                    slot,
                    item: item.clone(),
                });
            }
        }
        spheres.push(sphere);
    }

    let mut extra = Vec::new();
    for (w, map) in checks.iter().enumerate() {
        let mut names: Vec<&String> = map.keys().collect();
        names.sort();
        for slot in names {
            if !collected[w].contains(slot.as_str()) {
                extra.push(Check {
                    world: w,
                    slot: slot.clone(),
                    item: map[slot].clone(),
                });
            }
        }
    }
    SphereAnalysis { spheres, extra }
}
