// src/app/host_callbacks.rs
//! JS から渡されたコールバック関数を `EngineCallbacks` に包んで、
//! エンジンのイベントを配るところ。
//!
//! 配るのは必ずエンジンのロックを離した後。コールバックの中から
//! `advance()` などを呼ばれて、配っている途中に新しいイベントが来ても
//! 取りこぼさないように、いったん backlog に積んでから順番に配るよ 📬

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use js_sys::Function;
use log::{error, warn};
use wasm_bindgen::JsValue;

use crate::engine::{EngineCallbacks, EngineEvent, ScenarioResult};

/// JS の関数 3 つを `EngineCallbacks` に変換する。渡されなかったものは None のまま。
pub fn from_js(
    on_scenario_start: Option<Function>,
    on_scenario_complete: Option<Function>,
    on_all_done: Option<Function>,
) -> EngineCallbacks {
    let mut callbacks = EngineCallbacks::default();

    if let Some(f) = on_scenario_start {
        callbacks.on_scenario_start = Some(Box::new(move |scene_id: &str| {
            report_js_error("onScenarioStart", f.call1(&JsValue::NULL, &JsValue::from_str(scene_id)));
        }));
    }
    if let Some(f) = on_scenario_complete {
        callbacks.on_scenario_complete = Some(Box::new(move |result: &ScenarioResult| {
            match result_to_js(result) {
                Ok(arg) => report_js_error("onScenarioComplete", f.call1(&JsValue::NULL, &arg)),
                Err(e) => error!("HostCallbacks: could not convert result for {}: {:?}", result.scene_id, e),
            }
        }));
    }
    if let Some(f) = on_all_done {
        callbacks.on_all_done = Some(Box::new(move || {
            report_js_error("onAllDone", f.call0(&JsValue::NULL));
        }));
    }
    callbacks
}

/// `{ sceneId, success, attempts, seconds }` の JS オブジェクトにする。
fn result_to_js(result: &ScenarioResult) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(result).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn report_js_error(name: &str, outcome: Result<JsValue, JsValue>) {
    if let Err(e) = outcome {
        warn!("HostCallbacks: {} threw: {:?}", name, e);
    }
}

/// イベントを順番にコールバックへ配る中継役。
#[derive(Clone, Default)]
pub struct CallbackRelay {
    callbacks: Arc<Mutex<EngineCallbacks>>,
    backlog: Arc<Mutex<VecDeque<EngineEvent>>>,
}

impl CallbackRelay {
    pub fn replace(&self, callbacks: EngineCallbacks) {
        match self.callbacks.try_lock() {
            Ok(mut current) => *current = callbacks,
            Err(e) => error!("HostCallbacks: cannot replace callbacks while dispatching: {}", e),
        }
    }

    /// イベントを積んで、今配っている最中でなければ全部配る。
    pub fn relay(&self, events: Vec<EngineEvent>) {
        if events.is_empty() {
            return;
        }
        match self.backlog.lock() {
            Ok(mut backlog) => backlog.extend(events),
            Err(e) => {
                error!("HostCallbacks: backlog lock poisoned: {}", e);
                return;
            }
        }

        // 配っている途中 (コールバックの中から呼ばれた) なら、外側のループに任せる
        let Ok(mut callbacks) = self.callbacks.try_lock() else { return };
        loop {
            // 一件ずつ取り出して、配る間は backlog のロックを持たない
            let next = self.backlog.lock().ok().and_then(|mut backlog| backlog.pop_front());
            let Some(event) = next else { break };
            callbacks.dispatch(std::iter::once(event));
        }
    }
}
