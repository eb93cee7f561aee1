// src/app/state_getter.rs
//! エンジンの描画用スナップショットを JSON にして JS に渡す。

use std::sync::{Arc, Mutex};

use log::error;
use wasm_bindgen::JsValue;

use crate::engine::ScenarioEngine;
use crate::error::SimError;

/// 今の `RenderState` を JSON 文字列にする。
pub fn render_state_json(engine: &ScenarioEngine) -> Result<String, SimError> {
    serde_json::to_string(&engine.render_state()).map_err(SimError::Serialize)
}

/// `SimulationApp::get_render_state_json` の中身。
/// ロックが取れないとき (コールバックの中から呼ばれたときなど) はエラーを返すよ。
pub fn get_render_state_json(engine_arc: &Arc<Mutex<ScenarioEngine>>) -> Result<JsValue, JsValue> {
    let engine = match engine_arc.try_lock() {
        Ok(engine) => engine,
        Err(e) => {
            let error_msg = format!("Failed to lock engine for render state: {}", e);
            error!("{}", error_msg);
            return Err(JsValue::from_str(&error_msg));
        }
    };
    let json = render_state_json(&engine)?;
    Ok(JsValue::from_str(&json))
}
