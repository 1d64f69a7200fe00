use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use orando::randomize::{ItemToken, Randomizer, RouteInfo};
use orando::settings::{self, RandomizerSettings};
use orando::spheres::get_spheres;
use orando::spoiler_log::get_spoiler_log;
use orando_game::GameData;
use serde_derive::Serialize;

#[derive(Parser)]
struct Args {
    /// Comma-separated per-world options, e.g. "seasons+hd" or "ages,seasons+d"
    #[arg(long)]
    game: String,

    /// Hex seed; drawn from the clock when absent
    #[arg(long)]
    seed: Option<String>,

    /// Apply hard logic to every world
    #[arg(long)]
    hard: bool,

    /// Shuffle dungeon entrances in every world
    #[arg(long)]
    dungeons: bool,

    /// Shuffle Subrosia portals in every world (seasons only)
    #[arg(long)]
    portals: bool,

    #[arg(long)]
    output_plan: Option<PathBuf>,

    #[arg(long)]
    output_spoiler_log: Option<PathBuf>,
}

/// What a patcher needs to apply one world's seed to a ROM.
#[derive(Serialize)]
struct PatchPlan {
    game: String,
    seed: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    flags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    companion: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    seasons: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    entrances: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    portals: BTreeMap<String, String>,
    checks: BTreeMap<String, String>,
}

fn parse_seed(args: &Args) -> Result<u32> {
    match &args.seed {
        Some(s) => u32::from_str_radix(s.trim_start_matches("0x"), 16)
            .with_context(|| format!("invalid hex seed {s:?}")),
        None => {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock before epoch")?;
            Ok(now.subsec_nanos() ^ (now.as_secs() as u32))
        }
    }
}

// The displayed item name: run through the slot world's cosmetic ring remap,
// and tagged with the owner for foreign items.
fn patch_item_name(slot_world: usize, route: &RouteInfo, world_count: usize, item: &ItemToken) -> String {
    let shown = route
        .ring_map
        .get(&item.name)
        .cloned()
        .unwrap_or_else(|| item.name.clone());
    if world_count > 1 && item.world != slot_world {
        format!("P{}'s {}", item.world + 1, shown)
    } else {
        shown
    }
}

fn plan_for_world(world: usize, routes: &[RouteInfo]) -> PatchPlan {
    let route = &routes[world];
    let mut checks = BTreeMap::new();
    for (slot, item) in route.used_slots.iter().zip(route.used_items.iter()) {
        checks.insert(slot.clone(), patch_item_name(world, route, routes.len(), item));
    }
    PatchPlan {
        game: route.settings.game.title().to_string(),
        seed: format!("{:08x}", route.seed),
        flags: route.settings.flag_string(),
        companion: route.companion.clone(),
        seasons: route.seasons.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        entrances: route
            .entrances
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        portals: route.portals.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        checks,
    }
}

fn default_basename(route: &RouteInfo) -> String {
    let flags = route.settings.flag_string();
    let opt = if flags.is_empty() {
        String::new()
    } else {
        format!("+{flags}")
    };
    format!(
        "{}rando_{}_{:08x}{opt}",
        route.settings.game.prefix(),
        orando::VERSION,
        route.seed
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    let mut all_settings = settings::parse_multi(&args.game)?;
    for s in &mut all_settings {
        s.hard_logic |= args.hard;
        s.shuffle_dungeons |= args.dungeons;
        s.shuffle_portals |= args.portals;
        s.validate()?;
    }

    let data: Vec<GameData> = all_settings.iter().map(|s| GameData::load(s.game)).collect();
    let worlds: Vec<(&GameData, RandomizerSettings)> = data
        .iter()
        .zip(all_settings.iter().cloned())
        .map(|(d, s)| (d, s))
        .collect();
    let randomizer = Randomizer::new(worlds)?;

    let seed = parse_seed(&args)?;
    info!("seed {seed:08x}, {} world(s)", randomizer.worlds.len());
    let routes = randomizer.randomize(seed)?;

    let multi = routes.len() > 1;
    for (w, route) in routes.iter().enumerate() {
        let path = match &args.output_plan {
            Some(p) if !multi => p.clone(),
            Some(p) => p.with_file_name(format!(
                "{}_p{}.json",
                p.file_stem().and_then(|s| s.to_str()).unwrap_or("plan"),
                w + 1
            )),
            None if !multi => PathBuf::from(format!("{}.json", default_basename(route))),
            None => PathBuf::from(format!("{}_p{}.json", default_basename(route), w + 1)),
        };
        let plan = plan_for_world(w, &routes);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &plan)?;
        info!("wrote patch plan {}", path.display());
    }

    let analysis = get_spheres(&routes);
    let log = get_spoiler_log(&routes, &analysis);
    let spoiler_path = match &args.output_spoiler_log {
        Some(p) => p.clone(),
        None => PathBuf::from(format!("{}_spoiler.json", default_basename(&routes[0]))),
    };
    let file = File::create(&spoiler_path)
        .with_context(|| format!("creating {}", spoiler_path.display()))?;
    serde_json::to_writer_pretty(file, &log)?;
    info!("wrote spoiler log {}", spoiler_path.display());
    Ok(())
}
