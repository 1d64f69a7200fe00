pub mod ages;
pub mod seasons;

use hashbrown::HashMap;
use serde_derive::{Deserialize, Serialize};
use std::hash::Hash;

pub const SEASON_NAMES: [&str; 4] = ["spring", "summer", "autumn", "winter"];

/// Pool placeholder replaced by the chosen companion's flute at randomize time.
pub const ANIMAL_FLUTE: &str = "animal flute";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Seasons,
    Ages,
}

impl Game {
    pub fn prefix(self) -> &'static str {
        match self {
            Game::Seasons => "oos",
            Game::Ages => "ooa",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Game::Seasons => "seasons",
            Game::Ages => "ages",
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq + Clone> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        if let Some(&idx) = self.index_by_key.get(&name.to_owned()) {
            idx
        } else {
            let idx = self.keys.len();
            self.index_by_key.insert(name.to_owned(), idx);
            self.keys.push(name.to_owned());
            idx
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    And,
    Or,
    Root,
}

/// One term of a node formula. `Hard` terms only exist under hard logic;
/// under normal logic they are absent entirely rather than false, so an
/// AND parent's arity shrinks and an OR parent loses the option.
#[derive(Clone, Debug)]
pub enum Term {
    Ref(String),
    All(Vec<Term>),
    Any(Vec<Term>),
    Hard(Box<Term>),
}

/// A named vertex definition in a game's logic table. Definitions are pure
/// data; `orando_logic::Graph::build` resolves the references.
#[derive(Clone, Debug)]
pub struct NodeDef {
    pub name: String,
    pub kind: NodeKind,
    pub is_slot: bool,
    pub hard_only: bool,
    pub terms: Vec<Term>,
}

pub fn t(name: &str) -> Term {
    Term::Ref(name.to_string())
}

pub fn all(terms: Vec<Term>) -> Term {
    Term::All(terms)
}

pub fn any(terms: Vec<Term>) -> Term {
    Term::Any(terms)
}

pub fn hard(term: Term) -> Term {
    Term::Hard(Box::new(term))
}

/// A hard term with no requirement at all, e.g. a tricky jump that needs no
/// particular item.
pub fn hard_free() -> Term {
    Term::Hard(Box::new(Term::All(vec![])))
}

fn def(name: &str, kind: NodeKind, is_slot: bool, hard_only: bool, terms: Vec<Term>) -> NodeDef {
    NodeDef {
        name: name.to_string(),
        kind,
        is_slot,
        hard_only,
        terms,
    }
}

pub fn root(name: &str) -> NodeDef {
    def(name, NodeKind::Root, false, false, vec![])
}

pub fn and(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::And, false, false, terms)
}

pub fn or(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::Or, false, false, terms)
}

pub fn and_slot(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::And, true, false, terms)
}

pub fn or_slot(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::Or, true, false, terms)
}

/// An AND node that only counts under hard logic; references to it are
/// treated as absent under normal logic.
pub fn hard_and(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::And, false, true, terms)
}

pub fn hard_or(name: &str, terms: Vec<Term>) -> NodeDef {
    def(name, NodeKind::Or, false, true, terms)
}

#[derive(Clone, Debug)]
pub struct Companion {
    pub name: String,
    /// Leaf node seeded reached when this companion is chosen.
    pub region_node: String,
    /// Item substituted for the "animal flute" pool placeholder.
    pub flute: String,
}

/// Static data for one game, at the interface the core needs: the declarative
/// logic table, the treasure name space, the item pool, and the tables backing
/// the auxiliary shuffles. The shipped tables are abridged; full game data is
/// external.
#[derive(Clone, Debug)]
pub struct GameData {
    pub game: Game,
    pub node_defs: Vec<NodeDef>,
    /// Every treasure name; each becomes a leaf vertex in the graph.
    pub item_names: Vec<String>,
    /// The multiset of items to place. Must match the slot count exactly.
    pub item_pool: Vec<String>,
    pub seed_tree_slots: Vec<String>,
    pub seed_tree_items: Vec<String>,
    /// Areas that get a randomized default season (Seasons only).
    pub seasons_areas: Vec<String>,
    /// (outer entrance, inner entrance) pairs eligible for dungeon shuffle.
    pub dungeon_entrances: Vec<(String, String)>,
    /// (overworld side, Subrosia side) portal pairs (Seasons only).
    pub portals: Vec<(String, String)>,
    pub companions: Vec<Companion>,
    /// Ring names eligible for the cosmetic appearance shuffle.
    pub ring_names: Vec<String>,
    pub win_condition: String,
}

impl GameData {
    pub fn load(game: Game) -> GameData {
        match game {
            Game::Ages => ages::game_data(),
            Game::Seasons => seasons::game_data(),
        }
    }

    /// Per-item slot category constraint: seed trees hold exactly the tree
    /// seed items, and dungeon-scoped items stay in their own dungeon.
    pub fn item_fits_slot(&self, item: &str, slot: &str) -> bool {
        let tree_item = self.seed_tree_items.iter().any(|x| x == item);
        let tree_slot = self.seed_tree_slots.iter().any(|x| x == slot);
        if tree_item || tree_slot {
            return tree_item && tree_slot;
        }
        if let Some(prefix) = dungeon_item_prefix(item) {
            return slot.starts_with(prefix);
        }
        true
    }

    pub fn is_ring(&self, item: &str) -> bool {
        self.ring_names.iter().any(|x| x == item)
    }
}

/// For dungeon-scoped items like "d1 small key", the "d1 " slot-name prefix
/// the item is confined to.
pub fn dungeon_item_prefix(item: &str) -> Option<&str> {
    if item.ends_with(" small key") || item.ends_with(" boss key") {
        item.find(' ').map(|i| &item[..=i])
    } else {
        None
    }
}

/// Name of the leaf seeded when `area` is assigned `season` as its default.
pub fn default_season_node(area: &str, season: &str) -> String {
    format!("{area} default {season}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_vec_deduplicates() {
        let mut isv: IndexedVec<String> = IndexedVec::default();
        assert_eq!(isv.add("sword"), 0);
        assert_eq!(isv.add("shield"), 1);
        assert_eq!(isv.add("sword"), 0);
        assert_eq!(isv.keys, vec!["sword", "shield"]);
    }

    #[test]
    fn dungeon_item_prefixes() {
        assert_eq!(dungeon_item_prefix("d1 small key"), Some("d1 "));
        assert_eq!(dungeon_item_prefix("d8 boss key"), Some("d8 "));
        assert_eq!(dungeon_item_prefix("sword"), None);
        assert_eq!(dungeon_item_prefix("gasha seed"), None);
    }

    #[test]
    fn key_items_stay_in_their_dungeon() {
        let data = GameData::load(Game::Ages);
        assert!(data.item_fits_slot("d1 small key", "d1 east chest"));
        assert!(!data.item_fits_slot("d1 small key", "d2 moblin drop"));
        assert!(!data.item_fits_slot("d1 small key", "maku tree"));
        assert!(data.item_fits_slot("sword", "d1 east chest"));
    }

    #[test]
    fn seed_trees_hold_only_seeds() {
        let data = GameData::load(Game::Seasons);
        assert!(data.item_fits_slot("ember seeds", "horon village tree"));
        assert!(data.item_fits_slot("pegasus seeds", "woods of winter tree"));
        assert!(!data.item_fits_slot("sword", "horon village tree"));
        assert!(!data.item_fits_slot("ember seeds", "maku tree gift"));
    }

    #[test]
    fn season_node_names() {
        assert_eq!(
            default_season_node("spool swamp", "autumn"),
            "spool swamp default autumn"
        );
    }
}
