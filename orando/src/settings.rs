use anyhow::{bail, Result};
use orando_game::Game;
use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizerSettings {
    pub game: Game,
    pub hard_logic: bool,
    pub shuffle_dungeons: bool,
    pub shuffle_portals: bool,
}

impl RandomizerSettings {
    pub fn new(game: Game) -> Self {
        RandomizerSettings {
            game,
            hard_logic: false,
            shuffle_dungeons: false,
            shuffle_portals: false,
        }
    }

    /// Parses the compact per-world syntax used for multiworld, e.g. "s+hd"
    /// or "ages+h".
    pub fn parse_short(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('+').collect();
        if parts.is_empty() || parts.len() > 2 {
            bail!("bad option string: {s:?}");
        }
        let game = match parts[0] {
            "s" | "seasons" => Game::Seasons,
            "a" | "ages" => Game::Ages,
            other => bail!("unknown game: {other:?}"),
        };
        let mut settings = RandomizerSettings::new(game);
        if parts.len() == 2 {
            for c in parts[1].chars() {
                match c {
                    'h' => settings.hard_logic = true,
                    'd' => settings.shuffle_dungeons = true,
                    'p' => settings.shuffle_portals = true,
                    other => bail!("unknown flag: {other:?}"),
                }
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shuffle_portals && self.game != Game::Seasons {
            bail!("portal shuffle is a seasons-only option");
        }
        Ok(())
    }

    /// Compact flag suffix for filenames and log headers, e.g. "hd".
    pub fn flag_string(&self) -> String {
        let mut s = String::new();
        if self.hard_logic {
            s.push('h');
        }
        if self.shuffle_dungeons {
            s.push('d');
        }
        if self.shuffle_portals {
            s.push('p');
        }
        s
    }
}

/// Parses a comma-separated list of per-world option strings.
pub fn parse_multi(s: &str) -> Result<Vec<RandomizerSettings>> {
    s.split(',').map(RandomizerSettings::parse_short).collect()
}
