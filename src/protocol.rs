// src/protocol.rs

// このファイルは、ブラウザから完了記録サーバー (HTTP) に送るメッセージの
// 形式 (プロトコル) を定義するよ！💌
// ぜんぶ JSON で、フィールド名は camelCase。`serde` で変換する。
use serde::{Deserialize, Serialize};

use crate::engine::events::ScenarioResult;
use crate::scenario::TelemetryDetail;

// --- ブラウザ → サーバー ---

/// シナリオが始まったことの通知 (POST /api/sim/start)。返事は見ない。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartNotice {
    pub scene_id: String,
}

/// 完了報告 (POST /api/sim/complete)。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub scene_id: String,
    pub success: bool,
    pub attempts: u32,
    pub seconds: u32,
}

impl CompletionReport {
    /// 結果から報告を作る。Simplified のシナリオは試行 1 回・0 秒の固定値で送る。
    pub fn from_result(result: &ScenarioResult, detail: TelemetryDetail) -> Self {
        match detail {
            TelemetryDetail::Simplified => Self {
                scene_id: result.scene_id.clone(),
                success: result.success,
                attempts: 1,
                seconds: 0,
            },
            TelemetryDetail::Full => Self {
                scene_id: result.scene_id.clone(),
                success: result.success,
                attempts: result.attempts,
                seconds: result.seconds,
            },
        }
    }
}

/// 種別ごとのプレイ記録 (POST /api/simulation/play)。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayRecord {
    #[serde(rename = "type")]
    pub play_type: String,
}

// --- サーバー → ブラウザ ---

/// 完了報告への返事。成功なら参照 ID が入っていることがある。
/// 失敗時は `{ "error": "..." }` だけが返ってくる。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompletionAck {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ScenarioResult {
        ScenarioResult { scene_id: "bike_no_helmet_prototype".into(), success: true, attempts: 2, seconds: 7 }
    }

    #[test]
    fn simplified_report_uses_fixed_values() {
        let report = CompletionReport::from_result(&result(), TelemetryDetail::Simplified);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"sceneId":"bike_no_helmet_prototype","success":true,"attempts":1,"seconds":0}"#);
    }

    #[test]
    fn full_report_keeps_real_values() {
        let report = CompletionReport::from_result(&result(), TelemetryDetail::Full);
        assert_eq!(report.attempts, 2);
        assert_eq!(report.seconds, 7);
    }

    #[test]
    fn ack_parses_success_and_error_bodies() {
        let ack: CompletionAck = serde_json::from_str(r#"{"ok":true,"referenceId":"RSM-SIM-BIKE-20250101-AB12CD34"}"#).unwrap();
        assert!(ack.ok);
        assert_eq!(ack.reference_id.as_deref(), Some("RSM-SIM-BIKE-20250101-AB12CD34"));

        let ack: CompletionAck = serde_json::from_str(r#"{"error":"Invalid data"}"#).unwrap();
        assert!(!ack.ok);
        assert_eq!(ack.reference_id, None);
        assert_eq!(ack.error.as_deref(), Some("Invalid data"));
    }

    #[test]
    fn play_record_uses_type_key() {
        let json = serde_json::to_string(&PlayRecord { play_type: "bike".into() }).unwrap();
        assert_eq!(json, r#"{"type":"bike"}"#);
    }
}
