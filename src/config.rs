use std::env;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

const DEFAULT_STATS_PATH: &str = "data/messi-stats.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    pub base_ms: u64,
    pub jitter_ms: u64,
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self {
            base_ms: 600,
            jitter_ms: 400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub stats_path: PathBuf,
    pub typing: TypingDelay,
    pub seed: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from(DEFAULT_STATS_PATH),
            typing: TypingDelay::default(),
            seed: None,
        }
    }
}

impl ChatConfig {
    /// Reads `STATS_PATH`, `TYPING_DELAY_MS`, `TYPING_JITTER_MS` and `CHAT_SEED`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let stats_path = env::var("STATS_PATH")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.stats_path);
        let base_ms = env::var("TYPING_DELAY_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.typing.base_ms)
            .clamp(0, 5_000);
        let jitter_ms = env::var("TYPING_JITTER_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.typing.jitter_ms)
            .clamp(0, 5_000);
        let seed = env::var("CHAT_SEED")
            .ok()
            .and_then(|val| val.parse::<u64>().ok());
        Self {
            stats_path,
            typing: TypingDelay { base_ms, jitter_ms },
            seed,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
