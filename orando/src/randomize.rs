//! Randomized item placement: a forward fill over the logic graph that only
//! places an item once a compatible slot is provably reachable, expanding
//! reachability as progression items land. Dead-ended attempts are discarded
//! wholesale and rerolled, up to a retry limit.

use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use log::{debug, info};
use orando_game::{
    default_season_node, dungeon_item_prefix, GameData, ANIMAL_FLUTE, SEASON_NAMES,
};
use orando_logic::{Graph, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_derive::{Deserialize, Serialize};

use crate::settings::RandomizerSettings;

pub const MAX_ATTEMPTS: usize = 1000;

/// An item together with the world it belongs to. In multiworld, an item may
/// be placed in another world's slot; its logical effect always applies to
/// its own world's graph.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemToken {
    pub world: usize,
    pub name: String,
}

pub struct World<'a> {
    pub data: &'a GameData,
    pub settings: RandomizerSettings,
    pristine: Graph,
}

pub struct Randomizer<'a> {
    pub worlds: Vec<World<'a>>,
}

/// The result of a successful fill for one world.
#[derive(Clone, Debug)]
pub struct RouteInfo {
    pub seed: u32,
    pub settings: RandomizerSettings,
    /// Wired and aux-seeded graph from before any item was placed; the
    /// sphere builder replays collection on clones of this.
    pub pristine: Graph,
    /// The fully filled graph, with every slot and the win condition reached.
    pub graph: Graph,
    /// Slot names in placement order, paired with `used_items`.
    pub used_slots: Vec<String>,
    pub used_items: Vec<ItemToken>,
    pub companion: Option<String>,
    pub seasons: HashMap<String, String>,
    pub entrances: HashMap<String, String>,
    pub portals: HashMap<String, String>,
    /// Cosmetic ring appearance remap; never affects logical identity.
    pub ring_map: HashMap<String, String>,
}

impl RouteInfo {
    /// The patcher-facing slot -> item assignment.
    pub fn checks(&self) -> HashMap<String, ItemToken> {
        self.used_slots
            .iter()
            .cloned()
            .zip(self.used_items.iter().cloned())
            .collect()
    }
}

// Per-attempt mutable state for one world.
struct AuxState {
    graph: Graph,
    pristine: Graph,
    pool: Vec<String>,
    companion: Option<String>,
    seasons: HashMap<String, String>,
    entrances: HashMap<String, String>,
    portals: HashMap<String, String>,
    ring_map: HashMap<String, String>,
}

impl<'a> Randomizer<'a> {
    /// Builds the per-world graphs and runs every static configuration check
    /// before any search: settings consistency, pool/slot cardinality, and
    /// satisfiability with the whole pool held.
    pub fn new(worlds: Vec<(&'a GameData, RandomizerSettings)>) -> Result<Randomizer<'a>> {
        let mut out = Vec::new();
        for (i, (data, settings)) in worlds.into_iter().enumerate() {
            let world_num = i + 1;
            settings
                .validate()
                .with_context(|| format!("world {world_num}"))?;
            if settings.game != data.game {
                bail!(
                    "world {world_num}: settings are for {} but data is for {}",
                    settings.game.title(),
                    data.game.title()
                );
            }
            let pristine = Graph::build(&data.node_defs, &data.item_names, settings.hard_logic)
                .with_context(|| format!("world {world_num}"))?;
            let slot_count = pristine.slot_ids().len();
            if data.item_pool.len() != slot_count {
                bail!(
                    "world {world_num}: item pool has {} items for {} slots",
                    data.item_pool.len(),
                    slot_count
                );
            }
            verify_satisfiable(&pristine, data).with_context(|| format!("world {world_num}"))?;
            out.push(World {
                data,
                settings,
                pristine,
            });
        }
        Ok(Randomizer { worlds: out })
    }

    /// Produces one route per world, deterministically for a given seed and
    /// option set.
    pub fn randomize(&self, seed: u32) -> Result<Vec<RouteInfo>> {
        let mut rng_seed = [0u8; 32];
        rng_seed[..4].copy_from_slice(&seed.to_le_bytes());
        let mut rng = StdRng::from_seed(rng_seed);
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(seed, &mut rng) {
                Ok(routes) => {
                    info!("found route on attempt {attempt}/{MAX_ATTEMPTS}");
                    return Ok(routes);
                }
                Err(e) => debug!("attempt {attempt} failed: {e:#}"),
            }
        }
        bail!("exhausted {MAX_ATTEMPTS} fill attempts");
    }

    fn attempt(&self, seed: u32, rng: &mut StdRng) -> Result<Vec<RouteInfo>> {
        let mut states: Vec<AuxState> = Vec::new();
        for world in &self.worlds {
            states.push(self.roll_world(world, rng)?);
        }

        // Candidate lists are always drawn from a (world, name)-sorted order
        // so results depend only on the seed.
        let mut remaining: Vec<ItemToken> = Vec::new();
        for (i, st) in states.iter().enumerate() {
            for name in &st.pool {
                remaining.push(ItemToken {
                    world: i,
                    name: name.clone(),
                });
            }
        }
        remaining.sort();

        let mut filled: Vec<HashMap<NodeId, ItemToken>> = vec![HashMap::new(); states.len()];
        let mut placements: Vec<(usize, NodeId, ItemToken)> = Vec::new();
        while !remaining.is_empty() {
            let open = open_slots(&states, &filled);
            if open.is_empty() {
                bail!("dead end: {} items left with no open slot", remaining.len());
            }
            let mut order: Vec<usize> = (0..remaining.len()).collect();
            order.shuffle(rng);
            let mut choice: Option<(usize, usize, NodeId)> = None;
            for &ii in &order {
                let item = &remaining[ii];
                let candidates: Vec<(usize, NodeId)> = open
                    .iter()
                    .copied()
                    .filter(|&(w, s)| self.item_fits(item, w, states[w].graph.name(s)))
                    .collect();
                if candidates.is_empty() {
                    continue;
                }
                // Filling the last open slot while items remain is only
                // acceptable if the placed item opens up a new one.
                if open.len() == 1 && remaining.len() > 1 && !expands(&states, &filled, item) {
                    continue;
                }
                if let Some(&(w, slot)) = candidates.choose(rng) {
                    choice = Some((ii, w, slot));
                }
                break;
            }
            let Some((ii, w, slot)) = choice else {
                bail!(
                    "dead end: no remaining item fits an open slot ({} left)",
                    remaining.len()
                );
            };
            let item = remaining.remove(ii);
            filled[w].insert(slot, item.clone());
            placements.push((w, slot, item.clone()));
            // Progression items propagate before the next draw; filler items
            // have no vertex and cost nothing.
            if let Some(node) = states[item.world].graph.lookup(&item.name) {
                states[item.world].graph.reach(node);
            }
        }

        for (i, (world, st)) in self.worlds.iter().zip(states.iter()).enumerate() {
            let win = st.graph.id(&world.data.win_condition)?;
            if !st.graph.reached(win) {
                bail!(
                    "world {}: win condition {:?} unreachable after fill",
                    i + 1,
                    world.data.win_condition
                );
            }
            for &s in st.graph.slot_ids() {
                if !st.graph.reached(s) {
                    bail!(
                        "world {}: slot {:?} unreachable after fill",
                        i + 1,
                        st.graph.name(s)
                    );
                }
            }
        }

        let mut used_slots: Vec<Vec<String>> = vec![Vec::new(); states.len()];
        let mut used_items: Vec<Vec<ItemToken>> = vec![Vec::new(); states.len()];
        for (w, slot, item) in &placements {
            used_slots[*w].push(states[*w].graph.name(*slot).to_string());
            used_items[*w].push(item.clone());
        }

        let routes = states
            .into_iter()
            .enumerate()
            .map(|(i, st)| RouteInfo {
                seed,
                settings: self.worlds[i].settings.clone(),
                pristine: st.pristine,
                graph: st.graph,
                used_slots: std::mem::take(&mut used_slots[i]),
                used_items: std::mem::take(&mut used_items[i]),
                companion: st.companion,
                seasons: st.seasons,
                entrances: st.entrances,
                portals: st.portals,
                ring_map: st.ring_map,
            })
            .collect();
        Ok(routes)
    }

    // Draws every per-attempt randomized choice that is not an item: the
    // companion, per-area default seasons, entrance and portal wiring, and
    // the cosmetic ring remap.
    fn roll_world(&self, world: &World, rng: &mut StdRng) -> Result<AuxState> {
        let data = world.data;
        let mut graph = world.pristine.clone();
        let companion = data.companions.choose(rng).cloned();

        let mut entrances = HashMap::new();
        let mut inner: Vec<&str> = data
            .dungeon_entrances
            .iter()
            .map(|(_, i)| i.as_str())
            .collect();
        if world.settings.shuffle_dungeons {
            inner.shuffle(rng);
        }
        for ((outer, _), inner_name) in data.dungeon_entrances.iter().zip(inner) {
            graph.connect(outer, inner_name)?;
            entrances.insert(outer.clone(), inner_name.to_string());
        }

        let mut portals = HashMap::new();
        let mut subrosia_side: Vec<&str> = data.portals.iter().map(|(_, s)| s.as_str()).collect();
        if world.settings.shuffle_portals {
            subrosia_side.shuffle(rng);
        }
        for ((overworld, _), sub) in data.portals.iter().zip(subrosia_side) {
            graph.connect(overworld, sub)?;
            portals.insert(overworld.clone(), sub.to_string());
        }

        let mut seasons = HashMap::new();
        let mut seeds: Vec<NodeId> = Vec::new();
        for area in &data.seasons_areas {
            let season = SEASON_NAMES[rng.gen_range(0..SEASON_NAMES.len())];
            seeds.push(graph.id(&default_season_node(area, season))?);
            seasons.insert(area.clone(), season.to_string());
        }
        if let Some(c) = &companion {
            seeds.push(graph.id(&c.region_node)?);
        }

        let mut appearance = data.ring_names.clone();
        appearance.shuffle(rng);
        let ring_map: HashMap<String, String> =
            data.ring_names.iter().cloned().zip(appearance).collect();

        let pool: Vec<String> = data
            .item_pool
            .iter()
            .map(|n| {
                if n == ANIMAL_FLUTE {
                    if let Some(c) = &companion {
                        return c.flute.clone();
                    }
                }
                n.clone()
            })
            .collect();

        graph.explore();
        for id in seeds {
            graph.reach(id);
        }
        let pristine = graph.clone();
        Ok(AuxState {
            graph,
            pristine,
            pool,
            companion: companion.map(|c| c.name),
            seasons,
            entrances,
            portals,
            ring_map,
        })
    }

    fn item_fits(&self, item: &ItemToken, slot_world: usize, slot: &str) -> bool {
        if item.world == slot_world {
            return self.worlds[slot_world].data.item_fits_slot(&item.name, slot);
        }
        // tree seeds and dungeon-scoped items never leave their home world
        let slot_data = self.worlds[slot_world].data;
        let item_data = self.worlds[item.world].data;
        !slot_data.seed_tree_slots.iter().any(|x| x == slot)
            && !item_data.seed_tree_items.iter().any(|x| x == &item.name)
            && dungeon_item_prefix(&item.name).is_none()
    }
}

fn open_slots(
    states: &[AuxState],
    filled: &[HashMap<NodeId, ItemToken>],
) -> Vec<(usize, NodeId)> {
    let mut out = Vec::new();
    for (w, st) in states.iter().enumerate() {
        for &s in st.graph.slot_ids() {
            if st.graph.reached(s) && !filled[w].contains_key(&s) {
                out.push((w, s));
            }
        }
    }
    out
}

// Would holding this item make at least one new unfilled slot reachable?
// Item formulas only reference their own world's graph, so the trial is
// local to the item's world.
fn expands(states: &[AuxState], filled: &[HashMap<NodeId, ItemToken>], item: &ItemToken) -> bool {
    let w = item.world;
    let Some(node) = states[w].graph.lookup(&item.name) else {
        return false;
    };
    if states[w].graph.reached(node) {
        return false;
    }
    let mut trial = states[w].graph.clone();
    trial.reach(node);
    trial
        .slot_ids()
        .iter()
        .any(|&s| trial.reached(s) && !states[w].graph.reached(s) && !filled[w].contains_key(&s))
}

// Configuration sanity: with the whole pool held, every companion available,
// every default season active, and identity wiring, the win condition and
// every slot must be reachable. Anything less is a broken table, reported
// before the search starts.
fn verify_satisfiable(pristine: &Graph, data: &GameData) -> Result<()> {
    let mut g = pristine.clone();
    for (outer, inner) in &data.dungeon_entrances {
        g.connect(outer, inner)?;
    }
    for (overworld, sub) in &data.portals {
        g.connect(overworld, sub)?;
    }
    g.explore();
    for name in &data.item_names {
        if let Some(id) = g.lookup(name) {
            g.reach(id);
        }
    }
    for companion in &data.companions {
        let id = g.id(&companion.region_node)?;
        g.reach(id);
    }
    for area in &data.seasons_areas {
        for season in SEASON_NAMES {
            let id = g.id(&default_season_node(area, season))?;
            g.reach(id);
        }
    }
    let win = g.id(&data.win_condition)?;
    if !g.reached(win) {
        bail!(
            "win condition {:?} unreachable even with all items held",
            data.win_condition
        );
    }
    for &s in g.slot_ids() {
        if !g.reached(s) {
            bail!("slot {:?} unreachable even with all items held", g.name(s));
        }
    }
    Ok(())
}
