// src/engine/mod.rs
//! シナリオを進める心臓部 🫀
//! 状態・タイマー・イベント・描画用スナップショットと、それを束ねる `ScenarioEngine`。

pub mod timers;
pub mod state;
pub mod events;
pub mod render_state;
pub mod scenario_engine;


pub use events::{DropOutcome, EngineCallbacks, EngineEvent, ScenarioResult};
pub use render_state::{ItemView, RenderState, ScenarioView, TargetView};
pub use scenario_engine::ScenarioEngine;
pub use state::{InteractionState, ScenarioPhase};
pub use timers::{Millis, TimerHandle, TimerKind, TimerQueue};
