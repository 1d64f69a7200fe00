//! Abridged logic table and pools for Oracle of Seasons (Holodrum).
//!
//! Season-gated checks always have a season-spirit item fallback, so every
//! per-area default season assignment is solvable. Subrosia is only modeled
//! as far as the two portals need.

use crate::{
    all, and, and_slot, any, hard_free, or, root, t, Companion, Game, GameData, NodeDef,
    ANIMAL_FLUTE, SEASON_NAMES,
};

const AREAS: [&str; 4] = [
    "north horon",
    "eastern suburbs",
    "woods of winter",
    "spool swamp",
];

fn nodes() -> Vec<NodeDef> {
    let mut nodes = vec![
        root("start"),
        or("break bush", vec![t("sword"), t("bracelet")]),
        or("seed item", vec![t("satchel"), t("slingshot")]),
        or(
            "flute",
            vec![t("ricky's flute"), t("dimitri's flute"), t("moosh's flute")],
        ),
        // horon village
        and("horon village", vec![t("start")]),
        and_slot("maku tree gift", vec![t("horon village")]),
        and_slot(
            "horon village SW chest",
            vec![t("horon village"), any(vec![t("bombs"), t("ember seeds")])],
        ),
        and_slot(
            "horon village tree",
            vec![t("horon village"), t("sword"), t("seed item")],
        ),
        // north horon
        and("north horon", vec![t("horon village"), t("break bush")]),
        and_slot(
            "shovel gift",
            vec![
                t("north horon"),
                any(vec![t("north horon default winter"), t("winter")]),
            ],
        ),
        // eastern suburbs
        and(
            "eastern suburbs",
            vec![
                t("horon village"),
                any(vec![t("flippers"), all(vec![t("break bush"), t("feather")])]),
            ],
        ),
        and_slot(
            "suburbs heart piece",
            vec![
                t("eastern suburbs"),
                any(vec![t("eastern suburbs default winter"), t("winter")]),
            ],
        ),
        and("woods of winter", vec![t("eastern suburbs")]),
        and_slot(
            "woods of winter tree",
            vec![t("woods of winter"), t("sword"), t("seed item")],
        ),
        and_slot(
            "woods of winter chest",
            vec![
                t("woods of winter"),
                any(vec![
                    t("shovel"),
                    t("woods of winter default summer"),
                    t("summer"),
                ]),
            ],
        ),
        // holodrum plain / spool swamp
        and(
            "holodrum plain",
            vec![t("north horon"), any(vec![t("flute"), t("flippers")])],
        ),
        and_slot("blaino prize", vec![t("holodrum plain")]),
        and_slot("old man in treehouse", vec![t("holodrum plain"), t("flippers")]),
        and("spool swamp", vec![t("holodrum plain")]),
        and_slot("floodgate keeper's house", vec![t("spool swamp")]),
        and_slot(
            "spool swamp cave",
            vec![
                t("spool swamp"),
                t("bracelet"),
                any(vec![t("spool swamp default autumn"), t("autumn")]),
            ],
        ),
        // natzu
        and("natzu region", vec![t("north horon"), t("flute")]),
        and_slot(
            "natzu region, across water",
            vec![
                t("natzu region"),
                any(vec![
                    all(vec![t("natzu prairie"), t("feather")]),
                    all(vec![t("natzu river"), t("flippers")]),
                    all(vec![t("natzu wasteland"), t("bracelet")]),
                ]),
            ],
        ),
        or("natzu prairie", vec![]),
        or("natzu river", vec![]),
        or("natzu wasteland", vec![]),
        // d1
        and("enter d1", vec![t("north horon"), t("gnarled key")]),
        or("d1 entrance", vec![]),
        and_slot("d1 stalfos drop", vec![t("d1 entrance")]),
        and_slot(
            "d1 basement",
            vec![t("d1 entrance"), t("d1 small key"), t("ember seeds")],
        ),
        and(
            "d1 boss",
            vec![t("d1 entrance"), t("d1 small key"), t("sword")],
        ),
        and_slot("d1 boss chest", vec![t("d1 boss")]),
        // d2
        and("enter d2", vec![t("eastern suburbs"), t("bracelet")]),
        or("d2 entrance", vec![]),
        and_slot("d2 rope drop", vec![t("d2 entrance")]),
        and_slot(
            "d2 blade trap chest",
            vec![
                t("d2 entrance"),
                any(vec![t("feather"), t("bombs"), hard_free()]),
            ],
        ),
        and_slot("d2 locked chest", vec![t("d2 entrance"), t("d2 small key")]),
        and(
            "d2 boss",
            vec![t("d2 entrance"), t("d2 small key"), t("sword"), t("bombs")],
        ),
        and_slot("d2 boss chest", vec![t("d2 boss")]),
        // subrosia
        and("suburbs portal", vec![t("eastern suburbs")]),
        and("swamp portal", vec![t("spool swamp"), t("bracelet")]),
        or("temple portal", vec![]),
        or("beach portal", vec![]),
        or("subrosia", vec![t("temple portal"), t("beach portal")]),
        and_slot("subrosian dance hall", vec![t("subrosia")]),
        and_slot("subrosia seaside", vec![t("subrosia"), t("shovel")]),
        // endgame
        and("maku seed", vec![t("d1 essence"), t("d2 essence")]),
        and(
            "done",
            vec![t("horon village"), t("maku seed"), t("sword")],
        ),
    ];

    // one leaf per (area, season); the assigned one is seeded at randomize time
    for area in AREAS {
        for season in SEASON_NAMES {
            nodes.push(or(&crate::default_season_node(area, season), vec![]));
        }
    }

    nodes
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn game_data() -> GameData {
    GameData {
        game: Game::Seasons,
        node_defs: nodes(),
        item_names: names(&[
            "sword",
            "shovel",
            "bracelet",
            "feather",
            "flippers",
            "satchel",
            "slingshot",
            "bombs",
            "gnarled key",
            "spring",
            "summer",
            "autumn",
            "winter",
            "ember seeds",
            "pegasus seeds",
            "ricky's flute",
            "dimitri's flute",
            "moosh's flute",
            "d1 small key",
            "d2 small key",
            "d1 essence",
            "d2 essence",
            "rupees, 30",
            "gasha seed",
            "discovery ring",
        ]),
        item_pool: names(&[
            "sword",
            "shovel",
            "bracelet",
            "feather",
            "flippers",
            "satchel",
            "bombs",
            "gnarled key",
            "winter",
            "summer",
            "autumn",
            "ember seeds",
            "pegasus seeds",
            ANIMAL_FLUTE,
            "d1 small key",
            "d2 small key",
            "d1 essence",
            "d2 essence",
            "rupees, 30",
            "gasha seed",
            "discovery ring",
        ]),
        seed_tree_slots: names(&["horon village tree", "woods of winter tree"]),
        seed_tree_items: names(&["ember seeds", "pegasus seeds"]),
        seasons_areas: AREAS.iter().map(|s| s.to_string()).collect(),
        dungeon_entrances: vec![
            ("enter d1".to_string(), "d1 entrance".to_string()),
            ("enter d2".to_string(), "d2 entrance".to_string()),
        ],
        portals: vec![
            ("suburbs portal".to_string(), "temple portal".to_string()),
            ("swamp portal".to_string(), "beach portal".to_string()),
        ],
        companions: vec![
            Companion {
                name: "Ricky".to_string(),
                region_node: "natzu prairie".to_string(),
                flute: "ricky's flute".to_string(),
            },
            Companion {
                name: "Dimitri".to_string(),
                region_node: "natzu river".to_string(),
                flute: "dimitri's flute".to_string(),
            },
            Companion {
                name: "Moosh".to_string(),
                region_node: "natzu wasteland".to_string(),
                flute: "moosh's flute".to_string(),
            },
        ],
        ring_names: names(&[
            "discovery ring",
            "friendship ring",
            "subrosian ring",
            "expert's ring",
            "rang ring L-1",
        ]),
        win_condition: "done".to_string(),
    }
}
