// src/config/engine_config.rs
//! ホストから渡される実行時設定。JSON から読めて、書かなかった項目はデフォルト値になるよ。

use serde::{Deserialize, Serialize};

use crate::config::layout;
use crate::error::SimError;

/// エンジンとテレメトリの設定 ⚙️
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// テレメトリ送信を行うか (false ならぜんぶ捨てる)
    pub telemetry_enabled: bool,
    pub start_endpoint: String,
    pub complete_endpoint: String,
    pub play_endpoint: String,
    /// カウントダウン更新の間隔
    pub tick_interval_ms: i32,
    /// ターゲットを広げる余白
    pub tolerance_margin: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            telemetry_enabled: true,
            start_endpoint: "/api/sim/start".to_string(),
            complete_endpoint: "/api/sim/complete".to_string(),
            play_endpoint: "/api/simulation/play".to_string(),
            tick_interval_ms: layout::TICK_INTERVAL_MS,
            tolerance_margin: layout::TOLERANCE_MARGIN,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(SimError::Config)
    }
}
