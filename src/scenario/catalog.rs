// src/scenario/catalog.rs
//! 組み込みのシナリオ一覧と、JSON からの読み込み。

use log::{info, warn};

use crate::components::{Position, Rect, Size};
use crate::config::layout;
use crate::error::SimError;
use crate::scenario::definition::{
    DraggableItem, PostSuccessMedia, ScenarioDefinition, SimCategory, TargetZone, TelemetryDetail,
};
use crate::scenario::lint::lint;

const MEDIA_ROOT: &str = "/media/simulation%20media";

fn media(path: &str) -> String {
    format!("{}/{}", MEDIA_ROOT, path)
}

/// プロトタイプ共通の骨組み。500×500 の正方形デザイン空間で、キャンバス内に閉じ込める。
fn prototype(
    id: &str,
    category: SimCategory,
    title: &str,
    prompt: &str,
    background: String,
    draggable: DraggableItem,
    target: TargetZone,
    success_text: &str,
    wrong_tip: &str,
    post_success: PostSuccessMedia,
) -> ScenarioDefinition {
    let hint_target_id = Some(target.id.clone());
    ScenarioDefinition {
        id: id.to_string(),
        category: Some(category),
        title: title.to_string(),
        prompt: prompt.to_string(),
        background,
        overlays: Vec::new(),
        draggables: vec![draggable],
        targets: vec![target],
        hint_delay_secs: None,
        time_limit_secs: None,
        max_attempts: None,
        success_text: success_text.to_string(),
        wrong_tips: vec![wrong_tip.to_string()],
        hint_target_id,
        design_space: layout::SQUARE_DESIGN_SPACE,
        clamp_to_canvas: true,
        post_success,
        telemetry: TelemetryDetail::Simplified,
    }
}

fn sprite_item(id: &str, sprite: String, start: Position, size: Size, label: &str) -> DraggableItem {
    DraggableItem {
        id: id.to_string(),
        sprite,
        start,
        hitbox: Rect::new(0.0, 0.0, size.width, size.height),
        size: Some(size),
        label: Some(label.to_string()),
    }
}

/// ヘルメットなし → ライダーの頭にヘルメットを乗せる ⛑️
pub fn helmet_prototype() -> ScenarioDefinition {
    prototype(
        "bike_no_helmet_prototype",
        SimCategory::Bike,
        "No Helmet Violation",
        "Drag the helmet onto the rider's head to fix the violation.",
        media("helmet%20wearing/without%20helmet.png"),
        sprite_item(
            "helmet",
            media("helmet%20wearing/helmet.png"),
            Position::new(20.0, 400.0),
            Size::new(100.0, 80.0),
            "Helmet",
        ),
        TargetZone {
            id: "head".into(),
            rect: Rect::new(250.0, 100.0, 120.0, 80.0),
            accepts: vec!["helmet".into()],
            label: Some("Rider's head".into()),
        },
        "Helmet Saves Lives! Always Wear One.",
        "The helmet belongs on the rider's head.",
        PostSuccessMedia::ImageSwap {
            src: media("helmet%20wearing/with%20helmet.png"),
        },
    )
}

/// 三人乗り → 「ルールを守る」カードをバイクに 🏍️
pub fn triple_riding_prototype() -> ScenarioDefinition {
    prototype(
        "bike_triple_riding_prototype",
        SimCategory::Bike,
        "Triple Riding Violation",
        "Drag the discipline card onto the scene to show what's correct for safe riding.",
        media("triple%20riding/triple%20riding.png"),
        sprite_item(
            "discipline",
            media("triple%20riding/discipline.png"),
            Position::new(20.0, 380.0),
            Size::new(120.0, 100.0),
            "Discipline",
        ),
        TargetZone {
            id: "riders".into(),
            rect: Rect::new(200.0, 150.0, 200.0, 150.0),
            accepts: vec!["discipline".into()],
            label: Some("Riders".into()),
        },
        "Two is Company, Three's a Crowd! Ride Safely with a Pillion Only.",
        "Drop the card on the riders.",
        PostSuccessMedia::VideoSwap {
            src: media("triple%20riding/two%20people.mp4"),
        },
    )
}

/// 飲酒運転 → しらふのメンターをドライバーのところへ 🚗
pub fn drunk_drive_prototype() -> ScenarioDefinition {
    prototype(
        "car_drunk_drive_prototype",
        SimCategory::Car,
        "Drunk Driving Awareness",
        "Drag the sobriety mentor onto the intoxicated driver to guide them into making the right choice.",
        media("drunkndrive/drunkanddrive.png"),
        sprite_item(
            "mentor",
            media("drunkndrive/soberman.png"),
            Position::new(20.0, 360.0),
            Size::new(120.0, 120.0),
            "Sober mentor",
        ),
        TargetZone {
            id: "driver".into(),
            rect: Rect::new(220.0, 180.0, 160.0, 140.0),
            accepts: vec!["mentor".into()],
            label: Some("Driver".into()),
        },
        "Choose Sober Drives. Friends don't let friends drive drunk.",
        "Drop the mentor on the driver.",
        PostSuccessMedia::VideoSwap {
            src: media("drunkndrive/sober%20driving.mp4"),
        },
    )
}

pub fn builtin_scenarios() -> Vec<ScenarioDefinition> {
    vec![helmet_prototype(), triple_riding_prototype(), drunk_drive_prototype()]
}

/// JSON 配列からシナリオ一覧を読み込む。
/// 作り間違いは警告ログに出すだけで、読み込み自体は失敗させないよ。
pub fn from_json(json: &str) -> Result<Vec<ScenarioDefinition>, SimError> {
    let scenarios: Vec<ScenarioDefinition> = serde_json::from_str(json).map_err(SimError::Catalog)?;
    info!("Loaded {} scenarios from JSON catalog.", scenarios.len());
    for finding in scenarios.iter().flat_map(lint) {
        warn!("Scenario catalog: {:?}", finding);
    }
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_three_prototypes() {
        let scenarios = builtin_scenarios();
        let ids: Vec<&str> = scenarios.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bike_no_helmet_prototype", "bike_triple_riding_prototype", "car_drunk_drive_prototype"]
        );
        for scenario in &scenarios {
            assert_eq!(scenario.design_space, Size::new(500.0, 500.0));
            assert!(scenario.clamp_to_canvas);
            assert_eq!(scenario.telemetry, TelemetryDetail::Simplified);
            assert!(scenario.hint_target().is_some());
        }
    }

    #[test]
    fn catalog_survives_a_json_round_trip() {
        let json = serde_json::to_string(&builtin_scenarios()).unwrap();
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded, builtin_scenarios());
    }

    #[test]
    fn invalid_json_is_a_catalog_error() {
        assert!(matches!(from_json("[{]"), Err(SimError::Catalog(_))));
    }
}
