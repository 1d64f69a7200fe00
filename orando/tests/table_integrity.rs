use orando::randomize::Randomizer;
use orando::settings::RandomizerSettings;
use orando_game::{Game, GameData, ANIMAL_FLUTE};
use orando_logic::Graph;

// Randomizer::new runs the static configuration checks, so constructing one
// per game proves the shipped tables: pool size matches slot count and the
// win condition is reachable with the whole pool held.
#[test]
fn shipped_tables_pass_static_checks() {
    for game in [Game::Seasons, Game::Ages] {
        let data = GameData::load(game);
        Randomizer::new(vec![(&data, RandomizerSettings::new(game))]).unwrap();
    }
}

#[test]
fn tables_build_under_both_logic_levels() {
    for game in [Game::Seasons, Game::Ages] {
        let data = GameData::load(game);
        let normal = Graph::build(&data.node_defs, &data.item_names, false).unwrap();
        let hard = Graph::build(&data.node_defs, &data.item_names, true).unwrap();
        assert_eq!(normal.slot_ids().len(), hard.slot_ids().len());
        assert_eq!(normal.slot_ids().len(), data.item_pool.len());
    }
}

#[test]
fn pools_draw_from_the_item_namespace() {
    for game in [Game::Seasons, Game::Ages] {
        let data = GameData::load(game);
        for item in &data.item_pool {
            assert!(
                item == ANIMAL_FLUTE || data.item_names.contains(item),
                "{game:?}: pool item {item:?} missing from item names"
            );
        }
        for tree_item in &data.seed_tree_items {
            assert!(data.item_pool.contains(tree_item));
        }
        assert_eq!(data.seed_tree_slots.len(), data.seed_tree_items.len());
    }
}

#[test]
fn aux_tables_are_internally_consistent() {
    let seasons = GameData::load(Game::Seasons);
    assert!(!seasons.seasons_areas.is_empty());
    assert!(!seasons.portals.is_empty());
    assert!(!seasons.companions.is_empty());
    for c in &seasons.companions {
        assert!(seasons.item_names.contains(&c.flute), "{}", c.name);
    }

    let ages = GameData::load(Game::Ages);
    assert!(ages.seasons_areas.is_empty());
    assert!(ages.portals.is_empty());
    for c in &ages.companions {
        assert!(ages.item_names.contains(&c.flute), "{}", c.name);
    }
}
