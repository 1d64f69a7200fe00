//! Abridged logic table and pools for Oracle of Ages (Labrynna).
//!
//! This assumes the vanilla starting state in the forest of time. It covers
//! the overworld up to the first two dungeons; the rest of the game's data is
//! external.

use crate::{
    and, and_slot, any, hard, or, root, t, Companion, Game, GameData, NodeDef, ANIMAL_FLUTE,
};

fn nodes() -> Vec<NodeDef> {
    vec![
        root("start"),
        and("echoes", vec![t("harp")]),
        or("break bush", vec![t("sword"), t("bracelet"), t("ember seeds")]),
        or("seed item", vec![t("satchel"), t("seed shooter")]),
        or(
            "flute",
            vec![t("ricky's flute"), t("dimitri's flute"), t("moosh's flute")],
        ),
        // lynna
        or("lynna city", vec![t("break bush"), t("echoes")]),
        or("lynna village", vec![t("lynna city"), t("echoes")]),
        and_slot("starting chest", vec![t("start")]),
        and_slot("nayru's house", vec![t("start")]),
        and_slot("maku tree", vec![t("lynna village")]),
        and_slot("black tower worker", vec![t("lynna village")]),
        and_slot(
            "south lynna tree",
            vec![t("lynna city"), t("sword"), t("seed item")],
        ),
        and_slot(
            "fairies' woods chest",
            vec![t("lynna city"), any(vec![t("bracelet"), t("feather")])],
        ),
        and_slot("south shore dirt", vec![t("lynna city"), t("shovel")]),
        // nuun
        and("nuun", vec![t("lynna city"), t("flute")]),
        and_slot(
            "nuun highlands cave",
            vec![
                t("nuun"),
                any(vec![t("ricky nuun"), t("dimitri nuun"), t("moosh nuun")]),
            ],
        ),
        or("ricky nuun", vec![]),
        or("dimitri nuun", vec![]),
        or("moosh nuun", vec![]),
        // yoll graveyard
        and("yoll graveyard", vec![t("ember seeds")]),
        and_slot("grave under tree", vec![t("yoll graveyard")]),
        and_slot(
            "cheval's test",
            vec![
                t("yoll graveyard"),
                t("bracelet"),
                any(vec![t("feather"), t("flippers")]),
            ],
        ),
        and_slot("cheval's invention", vec![t("yoll graveyard"), t("flippers")]),
        // d1
        and("enter d1", vec![t("yoll graveyard"), t("graveyard key")]),
        or("d1 entrance", vec![]),
        and_slot("d1 east chest", vec![t("d1 entrance")]),
        and_slot("d1 locked room", vec![t("d1 entrance"), t("d1 small key")]),
        and(
            "d1 boss",
            vec![t("d1 entrance"), t("d1 small key"), t("sword")],
        ),
        and_slot("d1 boss chest", vec![t("d1 boss")]),
        // d2
        and("deku forest", vec![t("lynna city"), t("bracelet")]),
        and("enter d2", vec![t("deku forest"), t("bombs")]),
        or("d2 entrance", vec![]),
        and_slot("d2 moblin drop", vec![t("d2 entrance")]),
        and_slot(
            "d2 statue puzzle",
            vec![t("d2 entrance"), any(vec![t("bracelet"), hard(t("feather"))])],
        ),
        and_slot("d2 locked room", vec![t("d2 entrance"), t("d2 small key")]),
        and(
            "d2 boss",
            vec![t("d2 entrance"), t("d2 small key"), t("sword")],
        ),
        and_slot("d2 boss chest", vec![t("d2 boss")]),
        // endgame
        and("maku seed", vec![t("d1 essence"), t("d2 essence")]),
        and(
            "black tower",
            vec![t("lynna village"), t("maku seed"), t("bombs")],
        ),
        and("done", vec![t("black tower"), t("sword")]),
    ]
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn game_data() -> GameData {
    GameData {
        game: Game::Ages,
        node_defs: nodes(),
        item_names: names(&[
            "sword",
            "harp",
            "bracelet",
            "feather",
            "flippers",
            "shovel",
            "satchel",
            "seed shooter",
            "bombs",
            "ember seeds",
            "graveyard key",
            "ricky's flute",
            "dimitri's flute",
            "moosh's flute",
            "d1 small key",
            "d2 small key",
            "d1 essence",
            "d2 essence",
            "rupees, 20",
            "gasha seed",
            "friendship ring",
        ]),
        item_pool: names(&[
            "sword",
            "harp",
            "bracelet",
            "feather",
            "flippers",
            "shovel",
            "satchel",
            "bombs",
            "ember seeds",
            "graveyard key",
            ANIMAL_FLUTE,
            "d1 small key",
            "d2 small key",
            "d1 essence",
            "d2 essence",
            "rupees, 20",
            "gasha seed",
            "friendship ring",
        ]),
        seed_tree_slots: names(&["south lynna tree"]),
        seed_tree_items: names(&["ember seeds"]),
        seasons_areas: vec![],
        dungeon_entrances: vec![
            ("enter d1".to_string(), "d1 entrance".to_string()),
            ("enter d2".to_string(), "d2 entrance".to_string()),
        ],
        portals: vec![],
        companions: vec![
            Companion {
                name: "Ricky".to_string(),
                region_node: "ricky nuun".to_string(),
                flute: "ricky's flute".to_string(),
            },
            Companion {
                name: "Dimitri".to_string(),
                region_node: "dimitri nuun".to_string(),
                flute: "dimitri's flute".to_string(),
            },
            Companion {
                name: "Moosh".to_string(),
                region_node: "moosh nuun".to_string(),
                flute: "moosh's flute".to_string(),
            },
        ],
        ring_names: names(&[
            "friendship ring",
            "discovery ring",
            "moblin ring",
            "steadfast ring",
            "rang ring L-1",
        ]),
        win_condition: "done".to_string(),
    }
}
