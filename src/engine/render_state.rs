// src/engine/render_state.rs
//! 描画に必要な情報をひとまとめにしたスナップショット。
//! Canvas 描画も、JS 側での DOM 描画も、これだけ見れば描けるようにしてあるよ 🎨
//! 矩形はぜんぶキャンバスのピクセル座標 (ビューポートの倍率をかけた後)。

use serde::Serialize;

use crate::components::Rect;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    /// 全シナリオが終わった (もう何も描かない)
    pub finished: bool,
    pub scenario: Option<ScenarioView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioView {
    pub index: usize,
    pub count: usize,
    pub scene_id: String,
    pub title: String,
    pub prompt: String,
    /// 成功して画像差し替えがあるシナリオなら差し替え後の画像
    pub background: String,
    pub overlays: Vec<String>,
    /// 成功して動画差し替えがあるシナリオならその動画
    pub video: Option<String>,
    pub targets: Vec<TargetView>,
    /// 描く順番 (ドラッグ中のアイテムが最後 = 一番上)
    pub items: Vec<ItemView>,
    pub remaining_secs: f64,
    pub attempts: u32,
    pub max_attempts: u32,
    pub hint_shown: bool,
    pub success_shown: bool,
    pub wrong_shown: bool,
    pub success_text: Option<String>,
    pub wrong_tip: Option<String>,
    pub reference_id: Option<String>,
    pub progress_text: String,
    pub attempts_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetView {
    pub id: String,
    pub rect: Rect,
    pub label: Option<String>,
    /// ヒント表示中で、しかもヒント対象のターゲット
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: String,
    pub sprite: String,
    pub rect: Rect,
    pub label: Option<String>,
    pub dragging: bool,
}

impl RenderState {
    pub fn finished() -> Self {
        Self { finished: true, scenario: None }
    }

    pub fn idle() -> Self {
        Self { finished: false, scenario: None }
    }
}
