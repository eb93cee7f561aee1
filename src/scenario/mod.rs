// src/scenario/mod.rs
//! シナリオ定義まわりのモジュールをまとめるよ！

pub mod definition;
pub mod catalog;
pub mod lint;

pub use definition::{
    DraggableItem, PostSuccessMedia, ScenarioDefinition, SimCategory, TargetZone, TelemetryDetail,
};
pub use lint::{lint, LintFinding};
