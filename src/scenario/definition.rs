// src/scenario/definition.rs
//! シナリオ定義 (ホストから渡される、変更されないデータ) の型たち。
//!
//! ヘルメット・三人乗り・飲酒運転… ぜんぶ同じエンジンで動かすために、
//! 違いはすべてこのデータに押し込めてあるよ。

use serde::{Deserialize, Serialize};

use crate::components::{Position, Rect, Size};
use crate::config::layout;

/// シナリオの分類。シーン ID の接頭辞からも推測できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimCategory {
    Bike,
    Car,
    Pedestrian,
    #[default]
    Other,
}

impl SimCategory {
    /// `bike_` / `car_` / `ped_` で始まる ID をそれぞれの分類に、それ以外は Other に。
    pub fn from_scene_id(scene_id: &str) -> Self {
        if scene_id.starts_with("bike_") {
            SimCategory::Bike
        } else if scene_id.starts_with("car_") {
            SimCategory::Car
        } else if scene_id.starts_with("ped_") {
            SimCategory::Pedestrian
        } else {
            SimCategory::Other
        }
    }

    /// 完了記録側が参照 ID の生成に使う文脈文字列。
    pub fn reference_context(self) -> &'static str {
        match self {
            SimCategory::Bike => "SIM-BIKE",
            SimCategory::Car => "SIM-CAR",
            SimCategory::Pedestrian => "SIM-PED",
            SimCategory::Other => "SIM",
        }
    }

    /// プレイ記録で送る種別。Other は記録対象外なので None。
    pub fn play_type(self) -> Option<&'static str> {
        match self {
            SimCategory::Bike => Some("bike"),
            SimCategory::Car => Some("car"),
            SimCategory::Pedestrian => Some("pedestrian"),
            SimCategory::Other => None,
        }
    }
}

/// ドラッグできるアイテム (ヘルメットとか) ⛑️
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableItem {
    /// シナリオ内でユニークな ID
    pub id: String,
    pub sprite: String,
    /// シナリオ開始時の左上位置 (デザイン空間)
    #[serde(alias = "startXY")]
    pub start: Position,
    /// アイテム自身の位置からの相対オフセット + 幅・高さ
    pub hitbox: Rect,
    /// 見た目のサイズ。省略したらヒットボックスの右下までを使う
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub label: Option<String>,
}

impl DraggableItem {
    pub fn visual_size(&self) -> Size {
        self.size
            .unwrap_or_else(|| Size::new(self.hitbox.right(), self.hitbox.bottom()))
    }

    /// `position` に置かれたときのヒットボックス (絶対座標)。
    pub fn hitbox_at(&self, position: Position) -> Rect {
        Rect::new(
            position.x + self.hitbox.x,
            position.y + self.hitbox.y,
            self.hitbox.width,
            self.hitbox.height,
        )
    }

    /// `position` に置かれたときの見た目の矩形。
    pub fn visual_rect_at(&self, position: Position) -> Rect {
        let size = self.visual_size();
        Rect::new(position.x, position.y, size.width, size.height)
    }
}

/// アイテムを置くべき場所 🎯
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetZone {
    pub id: String,
    pub rect: Rect,
    /// 受け付けるアイテム ID
    pub accepts: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl TargetZone {
    pub fn accepts(&self, item_id: &str) -> bool {
        self.accepts.iter().any(|id| id == item_id)
    }
}

/// 成功したあとに画面をどう変えるか。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PostSuccessMedia {
    #[default]
    None,
    /// 背景画像を差し替える (ヘルメットをかぶったライダーの絵とか)
    ImageSwap { src: String },
    /// 正しい行動の動画に切り替える
    VideoSwap { src: String },
}

/// 完了テレメトリにどこまで詳しい値を載せるか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TelemetryDetail {
    /// 常に `attempts: 1, seconds: 0` を送る (プロトタイプと同じ形)
    Simplified,
    /// 実際の試行回数と経過秒数を送る
    #[default]
    Full,
}

fn default_design_space() -> Size {
    layout::WIDE_DESIGN_SPACE
}

/// 1つの「違反を直そう」シナリオ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub id: String,
    /// 省略したら ID の接頭辞から推測する
    #[serde(default)]
    pub category: Option<SimCategory>,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    pub background: String,
    #[serde(default)]
    pub overlays: Vec<String>,
    pub draggables: Vec<DraggableItem>,
    pub targets: Vec<TargetZone>,
    #[serde(alias = "timeoutHintSeconds")]
    pub hint_delay_secs: Option<f64>,
    #[serde(alias = "timeLimitSeconds")]
    pub time_limit_secs: Option<f64>,
    pub max_attempts: Option<u32>,
    pub success_text: String,
    #[serde(default)]
    pub wrong_tips: Vec<String>,
    #[serde(default)]
    pub hint_target_id: Option<String>,
    #[serde(default = "default_design_space")]
    pub design_space: Size,
    /// ドラッグ中にアイテムをキャンバス内に閉じ込めるか
    #[serde(default)]
    pub clamp_to_canvas: bool,
    #[serde(default)]
    pub post_success: PostSuccessMedia,
    #[serde(default)]
    pub telemetry: TelemetryDetail,
}

impl ScenarioDefinition {
    pub fn category(&self) -> SimCategory {
        self.category
            .unwrap_or_else(|| SimCategory::from_scene_id(&self.id))
    }

    pub fn hint_delay_ms(&self) -> f64 {
        self.hint_delay_secs.unwrap_or(layout::DEFAULT_HINT_DELAY_SECS) * 1000.0
    }

    pub fn time_limit_secs(&self) -> f64 {
        self.time_limit_secs.unwrap_or(layout::DEFAULT_TIME_LIMIT_SECS)
    }

    pub fn time_limit_ms(&self) -> f64 {
        self.time_limit_secs() * 1000.0
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(layout::DEFAULT_MAX_ATTEMPTS)
    }

    pub fn draggable(&self, item_id: &str) -> Option<&DraggableItem> {
        self.draggables.iter().find(|d| d.id == item_id)
    }

    pub fn hint_target(&self) -> Option<&TargetZone> {
        let hint_id = self.hint_target_id.as_deref()?;
        self.targets.iter().find(|t| t.id == hint_id)
    }

    pub fn first_wrong_tip(&self) -> Option<&str> {
        self.wrong_tips.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_comes_from_scene_id_prefix() {
        assert_eq!(SimCategory::from_scene_id("bike_no_helmet"), SimCategory::Bike);
        assert_eq!(SimCategory::from_scene_id("car_drunk_drive"), SimCategory::Car);
        assert_eq!(SimCategory::from_scene_id("ped_jaywalking"), SimCategory::Pedestrian);
        assert_eq!(SimCategory::from_scene_id("auto_wrong_side"), SimCategory::Other);
        assert_eq!(SimCategory::Pedestrian.reference_context(), "SIM-PED");
        assert_eq!(SimCategory::Other.play_type(), None);
    }

    #[test]
    fn scenario_json_uses_defaults() {
        let json = r#"{
            "id": "bike_wrong_side",
            "title": "Wrong-side riding",
            "background": "/bg.png",
            "draggables": [
                { "id": "arrow", "sprite": "/arrow.png", "startXY": [10, 20], "hitbox": [0, 0, 50, 40] }
            ],
            "targets": [
                { "id": "lane", "rect": [300, 200, 100, 80], "accepts": ["arrow"] }
            ],
            "timeoutHintSeconds": 5,
            "successText": "Keep left!"
        }"#;
        let scenario: ScenarioDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(scenario.category(), SimCategory::Bike);
        assert_eq!(scenario.hint_delay_ms(), 5_000.0);
        assert_eq!(scenario.time_limit_secs(), 45.0);
        assert_eq!(scenario.max_attempts(), 3);
        assert_eq!(scenario.design_space, Size::new(640.0, 500.0));
        assert!(!scenario.clamp_to_canvas);
        assert_eq!(scenario.post_success, PostSuccessMedia::None);
        assert_eq!(scenario.telemetry, TelemetryDetail::Full);
        assert_eq!(scenario.draggables[0].start, Position::new(10.0, 20.0));
        assert_eq!(scenario.draggables[0].visual_size(), Size::new(50.0, 40.0));
        assert!(scenario.targets[0].accepts("arrow"));
        assert!(scenario.hint_target().is_none());
    }

    #[test]
    fn hitbox_is_relative_to_item_position() {
        let item = DraggableItem {
            id: "helmet".into(),
            sprite: "/helmet.png".into(),
            start: Position::new(0.0, 0.0),
            hitbox: Rect::new(10.0, 5.0, 80.0, 60.0),
            size: Some(Size::new(100.0, 80.0)),
            label: None,
        };
        assert_eq!(item.hitbox_at(Position::new(100.0, 100.0)), Rect::new(110.0, 105.0, 80.0, 60.0));
        assert_eq!(item.visual_rect_at(Position::new(100.0, 100.0)), Rect::new(100.0, 100.0, 100.0, 80.0));
    }
}
