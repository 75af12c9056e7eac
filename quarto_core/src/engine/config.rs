use crate::engine::search::SearchPolicy;
use crate::engine::{Score, WIN_SCORE};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Search Parameters
    pub depth: u8,
    pub policy: SearchPolicy,
    pub alpha_beta: bool,
    pub opening_shortcut: bool,
    pub win_score: Score,

    // Placement Phase Weights
    pub w_immediate_win: Score,
    pub w_mobility: Score,
    pub w_block: Score,
    pub w_fork: Score,
    pub w_coherence: Score,

    // Selection Phase Weights
    pub w_safe_max: Score,
    pub w_safe_avg: Score,
    pub w_diversity: Score,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            policy: SearchPolicy::Complete,
            alpha_beta: true,
            opening_shortcut: true,
            win_score: WIN_SCORE,

            w_immediate_win: 80.0,
            w_mobility: 1.0,
            w_block: 50.0,
            w_fork: 0.0,
            w_coherence: 0.0,

            w_safe_max: 70.0,
            w_safe_avg: 15.0,
            w_diversity: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDepth,
    NegativeWeight(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDepth => f.write_str("search depth must be at least 1"),
            Self::NegativeWeight(name) => {
                write!(f, "weight `{name}` must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Deserialize)]
struct EngineConfigJson {
    depth: Option<u8>,
    policy: Option<SearchPolicy>,
    alpha_beta: Option<bool>,
    opening_shortcut: Option<bool>,
    win_score: Option<f64>,

    w_immediate_win: Option<f64>,
    w_mobility: Option<f64>,
    w_block: Option<f64>,
    w_fork: Option<f64>,
    w_coherence: Option<f64>,

    w_safe_max: Option<f64>,
    w_safe_avg: Option<f64>,
    w_diversity: Option<f64>,
}

impl EngineConfig {
    /// Variant that also rewards forks and partial lines, at the expense of
    /// pure blocking.
    pub fn fork_aware() -> Self {
        Self {
            w_block: 10.0,
            w_fork: 25.0,
            w_coherence: 12.0,
            ..Self::default()
        }
    }

    /// Default weights with the depth each policy can afford.
    pub fn for_policy(policy: SearchPolicy) -> Self {
        let depth = match policy {
            SearchPolicy::Complete => 3,
            SearchPolicy::PlacementSpecialized | SearchPolicy::SelectionSpecialized => 4,
        };
        Self {
            depth,
            policy,
            ..Self::default()
        }
    }

    /// Reads a tuning file. Weights are multipliers on the defaults, the
    /// search switches and the depth are taken as given.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            depth: json_config.depth.unwrap_or(default.depth),
            policy: json_config.policy.unwrap_or(default.policy),
            alpha_beta: json_config.alpha_beta.unwrap_or(default.alpha_beta),
            opening_shortcut: json_config
                .opening_shortcut
                .unwrap_or(default.opening_shortcut),
            win_score: apply_scale(default.win_score, json_config.win_score),

            w_immediate_win: apply_scale(default.w_immediate_win, json_config.w_immediate_win),
            w_mobility: apply_scale(default.w_mobility, json_config.w_mobility),
            w_block: apply_scale(default.w_block, json_config.w_block),
            w_fork: apply_scale(default.w_fork, json_config.w_fork),
            w_coherence: apply_scale(default.w_coherence, json_config.w_coherence),

            w_safe_max: apply_scale(default.w_safe_max, json_config.w_safe_max),
            w_safe_avg: apply_scale(default.w_safe_avg, json_config.w_safe_avg),
            w_diversity: apply_scale(default.w_diversity, json_config.w_diversity),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let weights = [
            ("win_score", self.win_score),
            ("w_immediate_win", self.w_immediate_win),
            ("w_mobility", self.w_mobility),
            ("w_block", self.w_block),
            ("w_fork", self.w_fork),
            ("w_coherence", self.w_coherence),
            ("w_safe_max", self.w_safe_max),
            ("w_safe_avg", self.w_safe_avg),
            ("w_diversity", self.w_diversity),
        ];
        match weights.iter().find(|(_, w)| !(*w >= 0.0 && w.is_finite())) {
            Some(&(name, _)) => Err(ConfigError::NegativeWeight(name)),
            None => Ok(()),
        }
    }
}

fn apply_scale(default_val: Score, scale: Option<f64>) -> Score {
    scale.map_or(default_val, |s| default_val * s)
}
