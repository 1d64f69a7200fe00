//! The logic graph: named boolean reachability predicates over items, events,
//! and locations, with an incremental monotone fixpoint evaluator.
//!
//! Reachability only ever grows within one evaluation, so cyclic dependencies
//! settle correctly: a cycle is reached only if some acyclic path satisfies
//! one of its members first.

use anyhow::{bail, Result};
use hashbrown::HashSet;
use orando_game::{IndexedVec, NodeDef, NodeKind, Term};

pub type NodeId = usize;

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    is_slot: bool,
    children: Vec<NodeId>,
    parents: Vec<NodeId>,
    reached: bool,
}

/// A built graph instance. Attempts mutate a clone of the pristine graph;
/// "resetting" is discarding the clone.
#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    names: IndexedVec<String>,
    slots: Vec<NodeId>,
}

impl Graph {
    /// Resolves a definition table into a graph. `item_leaves` are treasure
    /// names; any not already defined becomes a bare OR leaf, reachable only
    /// when externally marked held. With `hard` off, hard terms and
    /// references to hard-only nodes are absent entirely: an AND parent's
    /// arity shrinks and an OR parent loses the option.
    pub fn build(defs: &[NodeDef], item_leaves: &[String], hard: bool) -> Result<Graph> {
        let mut g = Graph {
            nodes: Vec::new(),
            names: IndexedVec::default(),
            slots: Vec::new(),
        };
        for d in defs {
            if g.names.index_by_key.contains_key(&d.name) {
                bail!("duplicate node definition {:?}", d.name);
            }
            g.push_node(&d.name, d.kind, d.is_slot);
        }
        for leaf in item_leaves {
            if !g.names.index_by_key.contains_key(leaf) {
                g.push_node(leaf, NodeKind::Or, false);
            }
        }
        let hard_names: HashSet<&str> = defs
            .iter()
            .filter(|d| d.hard_only)
            .map(|d| d.name.as_str())
            .collect();
        for d in defs {
            let id = g.names.index_by_key[&d.name];
            for term in &d.terms {
                if let Some(child) = g.resolve_term(term, &d.name, &hard_names, hard)? {
                    g.add_child(id, child);
                }
            }
        }
        let mut slots: Vec<NodeId> = (0..g.nodes.len()).filter(|&i| g.nodes[i].is_slot).collect();
        slots.sort_by(|&a, &b| g.names.keys[a].cmp(&g.names.keys[b]));
        g.slots = slots;
        Ok(g)
    }

    // Every vertex gets a unique name in the index, synthetic sub-expression
    // vertices included, so ids stay aligned with the node vector.
    fn push_node(&mut self, name: &str, kind: NodeKind, is_slot: bool) -> NodeId {
        let id = self.names.add(name);
        debug_assert_eq!(id, self.nodes.len());
        self.nodes.push(Node {
            kind,
            is_slot,
            children: Vec::new(),
            parents: Vec::new(),
            reached: false,
        });
        id
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parents.push(parent);
    }

    fn resolve_term(
        &mut self,
        term: &Term,
        parent: &str,
        hard_names: &HashSet<&str>,
        hard: bool,
    ) -> Result<Option<NodeId>> {
        match term {
            Term::Ref(name) => {
                if !hard && hard_names.contains(name.as_str()) {
                    return Ok(None);
                }
                match self.names.index_by_key.get(name) {
                    Some(&id) => Ok(Some(id)),
                    None => bail!("undefined node reference {:?} in {:?}", name, parent),
                }
            }
            Term::All(terms) => self.resolve_group(terms, NodeKind::And, parent, hard_names, hard),
            Term::Any(terms) => self.resolve_group(terms, NodeKind::Or, parent, hard_names, hard),
            Term::Hard(inner) => {
                if hard {
                    self.resolve_term(inner, parent, hard_names, hard)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn resolve_group(
        &mut self,
        terms: &[Term],
        kind: NodeKind,
        parent: &str,
        hard_names: &HashSet<&str>,
        hard: bool,
    ) -> Result<Option<NodeId>> {
        let anon = self.push_node(&format!("{parent}#{}", self.nodes.len()), kind, false);
        for term in terms {
            if let Some(child) = self.resolve_term(term, parent, hard_names, hard)? {
                self.add_child(anon, child);
            }
        }
        Ok(Some(anon))
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.index_by_key.get(name).copied()
    }

    pub fn id(&self, name: &str) -> Result<NodeId> {
        match self.lookup(name) {
            Some(id) => Ok(id),
            None => bail!("no node named {:?}", name),
        }
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.names.keys[id]
    }

    pub fn is_slot(&self, id: NodeId) -> bool {
        self.nodes[id].is_slot
    }

    pub fn reached(&self, id: NodeId) -> bool {
        self.nodes[id].reached
    }

    /// Slot vertices, sorted by name so iteration order is seed-stable.
    pub fn slot_ids(&self) -> &[NodeId] {
        &self.slots
    }

    pub fn reached_ids(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].reached).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `from` as an alternative of the OR node `to`, keeping parent
    /// back-references symmetric. Used to apply entrance/portal rewiring.
    /// Wiring into an AND node would silently strengthen its requirement, so
    /// only OR targets are accepted.
    pub fn connect(&mut self, from: &str, to: &str) -> Result<()> {
        let from_id = self.id(from)?;
        let to_id = self.id(to)?;
        if self.nodes[to_id].kind != NodeKind::Or {
            bail!("cannot wire {:?} into non-OR node {:?}", from, to);
        }
        self.add_child(to_id, from_id);
        if self.nodes[from_id].reached {
            self.settle(vec![to_id]);
        }
        Ok(())
    }

    fn satisfied(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Root => true,
            NodeKind::And => node.children.iter().all(|&c| self.nodes[c].reached),
            NodeKind::Or => node.children.iter().any(|&c| self.nodes[c].reached),
        }
    }

    /// Full fixpoint pass: every node is considered once, and any transition
    /// re-enqueues the node's parents.
    pub fn explore(&mut self) {
        self.settle((0..self.nodes.len()).collect());
    }

    /// Marks a node reached (an item or event now held) and propagates the
    /// change forward incrementally.
    pub fn reach(&mut self, id: NodeId) {
        if self.nodes[id].reached {
            return;
        }
        self.nodes[id].reached = true;
        let parents = self.nodes[id].parents.clone();
        self.settle(parents);
    }

    // Work-set fixpoint. Each edge is reconsidered at most once per
    // reachability change of its source, and marks never revert.
    fn settle(&mut self, mut work: Vec<NodeId>) {
        while let Some(id) = work.pop() {
            if self.nodes[id].reached || !self.satisfied(id) {
                continue;
            }
            self.nodes[id].reached = true;
            work.extend_from_slice(&self.nodes[id].parents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orando_game::{and, and_slot, any, hard, hard_and, hard_or, or, or_slot, root, t};

    fn leaves(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn root_and_or_semantics() {
        let defs = vec![
            root("start"),
            and("near start", vec![t("start")]),
            or("nowhere", vec![]),
            and("past nowhere", vec![t("nowhere")]),
            and("vacuous", vec![]),
        ];
        let mut g = Graph::build(&defs, &[], false).unwrap();
        g.explore();
        assert!(g.reached(g.id("start").unwrap()));
        assert!(g.reached(g.id("near start").unwrap()));
        assert!(g.reached(g.id("vacuous").unwrap()));
        assert!(!g.reached(g.id("nowhere").unwrap()));
        assert!(!g.reached(g.id("past nowhere").unwrap()));
    }

    #[test]
    fn nested_terms_propagate() {
        let defs = vec![
            root("start"),
            and(
                "gate",
                vec![t("start"), any(vec![t("key"), t("bombs")])],
            ),
        ];
        let mut g = Graph::build(&defs, &leaves(&["key", "bombs"]), false).unwrap();
        g.explore();
        let gate = g.id("gate").unwrap();
        assert!(!g.reached(gate));
        let bombs = g.id("bombs").unwrap();
        g.reach(bombs);
        assert!(g.reached(gate));
    }

    #[test]
    fn two_cycle_stays_unreached() {
        let defs = vec![and("a", vec![t("b")]), and("b", vec![t("a")])];
        let mut g = Graph::build(&defs, &[], false).unwrap();
        g.explore();
        assert!(!g.reached(g.id("a").unwrap()));
        assert!(!g.reached(g.id("b").unwrap()));
    }

    #[test]
    fn cycle_resolved_by_third_path() {
        let defs = vec![
            or("a", vec![t("b"), t("warp")]),
            and("b", vec![t("a")]),
        ];
        let mut g = Graph::build(&defs, &leaves(&["warp"]), false).unwrap();
        g.explore();
        assert!(!g.reached(g.id("a").unwrap()));
        let warp = g.id("warp").unwrap();
        g.reach(warp);
        assert!(g.reached(g.id("a").unwrap()));
        assert!(g.reached(g.id("b").unwrap()));
    }

    #[test]
    fn explore_is_idempotent() {
        let defs = vec![
            root("start"),
            and("a", vec![t("start")]),
            or("b", vec![t("a"), t("missing item")]),
        ];
        let mut g = Graph::build(&defs, &leaves(&["missing item"]), false).unwrap();
        g.explore();
        let first = g.reached_ids();
        g.explore();
        assert_eq!(first, g.reached_ids());
    }

    #[test]
    fn hard_term_adjusts_and_arity() {
        let defs = vec![
            root("start"),
            and("ledge", vec![t("start"), hard(t("feather"))]),
        ];
        let mut normal = Graph::build(&defs, &leaves(&["feather"]), false).unwrap();
        normal.explore();
        // under normal logic the hard term is absent, not false
        assert!(normal.reached(normal.id("ledge").unwrap()));

        let mut hard_g = Graph::build(&defs, &leaves(&["feather"]), true).unwrap();
        hard_g.explore();
        assert!(!hard_g.reached(hard_g.id("ledge").unwrap()));
        let feather = hard_g.id("feather").unwrap();
        hard_g.reach(feather);
        assert!(hard_g.reached(hard_g.id("ledge").unwrap()));
    }

    #[test]
    fn hard_only_node_reference_is_absent() {
        let defs = vec![
            root("start"),
            hard_and("tricky jump", vec![t("start")]),
            or("upper path", vec![t("tricky jump")]),
            and("lower path", vec![t("start"), t("tricky jump")]),
        ];
        let mut normal = Graph::build(&defs, &[], false).unwrap();
        normal.explore();
        assert!(!normal.reached(normal.id("upper path").unwrap()));
        assert!(normal.reached(normal.id("lower path").unwrap()));

        let mut hard_g = Graph::build(&defs, &[], true).unwrap();
        hard_g.explore();
        assert!(hard_g.reached(hard_g.id("upper path").unwrap()));
        assert!(hard_g.reached(hard_g.id("lower path").unwrap()));
    }

    #[test]
    fn enabling_hard_only_grows_reachability() {
        let defs = vec![
            root("start"),
            and("a", vec![t("start"), hard(t("feather"))]),
            or("b", vec![t("a"), hard(t("start"))]),
            and("c", vec![t("b")]),
        ];
        let mut normal = Graph::build(&defs, &leaves(&["feather"]), false).unwrap();
        let mut hard_g = Graph::build(&defs, &leaves(&["feather"]), true).unwrap();
        for g in [&mut normal, &mut hard_g] {
            g.explore();
            let feather = g.id("feather").unwrap();
            g.reach(feather);
        }
        for d in ["start", "a", "b", "c"] {
            let in_normal = normal.reached(normal.id(d).unwrap());
            let in_hard = hard_g.reached(hard_g.id(d).unwrap());
            assert!(!in_normal || in_hard, "{d} reached normally but not hard");
        }
    }

    #[test]
    fn dangling_reference_fails_at_build() {
        let defs = vec![and("a", vec![t("no such node")])];
        let err = Graph::build(&defs, &[], false).unwrap_err();
        assert!(err.to_string().contains("undefined node reference"));
    }

    #[test]
    fn duplicate_definition_fails_at_build() {
        let defs = vec![root("a"), and("a", vec![])];
        let err = Graph::build(&defs, &[], false).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn connect_wires_and_propagates() {
        let defs = vec![
            root("start"),
            and("enter d1", vec![t("start")]),
            or("d1 entrance", vec![]),
            and_slot("d1 chest", vec![t("d1 entrance")]),
        ];
        let mut g = Graph::build(&defs, &[], false).unwrap();
        g.explore();
        assert!(!g.reached(g.id("d1 chest").unwrap()));
        g.connect("enter d1", "d1 entrance").unwrap();
        assert!(g.reached(g.id("d1 chest").unwrap()));
    }

    #[test]
    fn connect_rejects_and_targets() {
        let defs = vec![root("start"), and("gate", vec![t("start")])];
        let mut g = Graph::build(&defs, &[], false).unwrap();
        assert!(g.connect("start", "gate").is_err());
    }

    #[test]
    fn incremental_reach_matches_full_explore() {
        let defs = vec![
            root("start"),
            and("a", vec![t("start"), t("sword")]),
            or("b", vec![t("a"), t("bombs")]),
            and("c", vec![t("a"), t("b")]),
        ];
        let items = leaves(&["sword", "bombs"]);

        let mut incremental = Graph::build(&defs, &items, false).unwrap();
        incremental.explore();
        for item in ["sword", "bombs"] {
            let id = incremental.id(item).unwrap();
            incremental.reach(id);
        }

        let mut batch = Graph::build(&defs, &items, false).unwrap();
        for item in ["sword", "bombs"] {
            let id = batch.id(item).unwrap();
            batch.reach(id);
        }
        batch.explore();

        assert_eq!(incremental.reached_ids(), batch.reached_ids());
    }

    #[test]
    fn repeated_item_leaves_share_one_vertex() {
        let defs = vec![root("start")];
        let g = Graph::build(&defs, &leaves(&["sword", "sword"]), false).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.name(g.id("sword").unwrap()), "sword");
        assert_eq!(g.lookup("sword"), Some(1));
    }

    #[test]
    fn or_slots_and_hard_or_nodes_resolve() {
        let defs = vec![
            root("start"),
            or_slot("ledge chest", vec![t("start"), t("feather")]),
            hard_or("pit crossing", vec![t("feather")]),
            and("far side", vec![t("start"), t("pit crossing")]),
        ];
        let mut normal = Graph::build(&defs, &leaves(&["feather"]), false).unwrap();
        normal.explore();
        let chest = normal.id("ledge chest").unwrap();
        assert!(normal.is_slot(chest));
        assert!(normal.reached(chest));
        // the hard-only reference is absent, so far side needs only start
        assert!(normal.reached(normal.id("far side").unwrap()));

        let mut hard_g = Graph::build(&defs, &leaves(&["feather"]), true).unwrap();
        hard_g.explore();
        assert!(!hard_g.reached(hard_g.id("far side").unwrap()));
        let feather = hard_g.id("feather").unwrap();
        hard_g.reach(feather);
        assert!(hard_g.reached(hard_g.id("far side").unwrap()));
    }

    #[test]
    fn slot_ids_are_name_sorted() {
        let defs = vec![
            root("start"),
            and_slot("zeta chest", vec![t("start")]),
            and_slot("alpha chest", vec![t("start")]),
        ];
        let g = Graph::build(&defs, &[], false).unwrap();
        let names: Vec<&str> = g.slot_ids().iter().map(|&i| g.name(i)).collect();
        assert_eq!(names, vec!["alpha chest", "zeta chest"]);
    }
}
