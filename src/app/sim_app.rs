// src/app/sim_app.rs

// --- 必要なものをインポート ---
use std::sync::{Arc, Mutex};

use js_sys::Function;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::app::browser_event_manager::{self, ListenerSet};
use crate::app::host_callbacks::{self, CallbackRelay};
use crate::app::renderer::{self, ImageCache};
use crate::app::state_getter;
use crate::config::EngineConfig;
use crate::engine::ScenarioEngine;
use crate::error::SimError;
use crate::network::HttpTelemetry;
use crate::scenario::catalog;
use crate::telemetry::{NullTelemetry, TelemetrySink};

/// リスナーのクロージャとアプリ本体で共有するもの一式。
/// 中身は Arc か JS オブジェクトなので、clone しても同じものを指すよ。
#[derive(Clone)]
pub(crate) struct SharedApp {
    pub(crate) engine: Arc<Mutex<ScenarioEngine>>,
    pub(crate) relay: CallbackRelay,
    pub(crate) canvas: HtmlCanvasElement,
    pub(crate) context: CanvasRenderingContext2d,
    pub(crate) images: Arc<Mutex<ImageCache>>,
}

impl SharedApp {
    /// エンジンをロックして `f` を実行し、溜まったイベントをロックを離してから配る。
    /// ロックが取れなければ (コールバックの中から呼ばれたなど) 何もしないで None。
    pub(crate) fn with_engine<R>(&self, what: &str, f: impl FnOnce(&mut ScenarioEngine) -> R) -> Option<R> {
        let (result, events) = {
            let mut engine = match self.engine.try_lock() {
                Ok(engine) => engine,
                Err(e) => {
                    warn!("SimulationApp: engine busy during {}: {}", what, e);
                    return None;
                }
            };
            let result = f(&mut engine);
            (result, engine.drain_events())
        }; // <-- ここでロック解放
        self.relay.relay(events);
        Some(result)
    }

    pub(crate) fn redraw(&self) {
        let state = match self.engine.try_lock() {
            Ok(engine) => engine.render_state(),
            Err(e) => {
                warn!("SimulationApp: skipped a frame, engine busy: {}", e);
                return;
            }
        };
        let mut images = match self.images.try_lock() {
            Ok(images) => images,
            Err(e) => {
                warn!("SimulationApp: skipped a frame, image cache busy: {}", e);
                return;
            }
        };
        if let Err(e) = renderer::render(&state, &self.canvas, &self.context, &mut images) {
            error!("SimulationApp: render failed: {:?}", e);
        }
    }
}

/// id で canvas を探して 2D コンテキストを取り出す。
fn initialize_canvas(canvas_id: &str) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), SimError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| SimError::MissingElement("document".into()))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| SimError::MissingElement(format!("#{}", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SimError::MissingElement(format!("#{} is not a canvas", canvas_id)))?;
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| SimError::MissingElement("2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SimError::MissingElement("2d context".into()))?;
    Ok((canvas, context))
}

// --- シミュレーション画面全体を管理する構造体 ---
#[wasm_bindgen]
pub struct SimulationApp {
    shared: SharedApp,
    listeners: Arc<Mutex<ListenerSet>>,
    tick_interval_ms: i32,
}

#[wasm_bindgen]
impl SimulationApp {
    /// `scenarios_json` を省略すると組み込みのプロトタイプ 3 つ、
    /// `config_json` を省略するとデフォルト設定になるよ。
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        scenarios_json: Option<String>,
        config_json: Option<String>,
    ) -> Result<SimulationApp, JsValue> {
        info!("SimulationApp: initializing on #{}", canvas_id);

        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json)?,
            None => EngineConfig::default(),
        };
        let scenarios = match scenarios_json {
            Some(json) => catalog::from_json(&json)?,
            None => catalog::builtin_scenarios(),
        };
        let (canvas, context) = initialize_canvas(canvas_id)?;

        let telemetry: Box<dyn TelemetrySink> = if config.telemetry_enabled {
            Box::new(HttpTelemetry::new(config.clone()))
        } else {
            Box::new(NullTelemetry)
        };
        let tick_interval_ms = config.tick_interval_ms;
        let mut engine = ScenarioEngine::new(scenarios, telemetry).with_config(config);
        engine.set_viewport(canvas.width() as f32, canvas.height() as f32);

        info!("SimulationApp: initialized.");
        Ok(Self {
            shared: SharedApp {
                engine: Arc::new(Mutex::new(engine)),
                relay: CallbackRelay::default(),
                canvas,
                context,
                images: Arc::new(Mutex::new(ImageCache::default())),
            },
            listeners: Arc::new(Mutex::new(ListenerSet::default())),
            tick_interval_ms,
        })
    }

    /// `onScenarioStart(id)`, `onScenarioComplete(result)`, `onAllDone()` を登録する。どれも省略可。
    pub fn set_callbacks(
        &self,
        on_scenario_start: Option<Function>,
        on_scenario_complete: Option<Function>,
        on_all_done: Option<Function>,
    ) {
        self.shared
            .relay
            .replace(host_callbacks::from_js(on_scenario_start, on_scenario_complete, on_all_done));
    }

    /// リスナーとタイマーを付けて、最初のシナリオを始める。
    pub fn start(&self) -> Result<(), JsValue> {
        {
            let mut listeners = self
                .listeners
                .lock()
                .map_err(|e| JsValue::from_str(&format!("Failed to lock listeners: {}", e)))?;
            if !listeners.is_attached() {
                browser_event_manager::attach_pointer_listeners(&self.shared, &mut listeners)?;
                browser_event_manager::start_ticker(&self.shared, self.tick_interval_ms, &mut listeners)?;
            }
        }
        let now = js_sys::Date::now();
        self.shared.with_engine("start", |engine| engine.start(now));
        self.shared.redraw();
        Ok(())
    }

    /// キャンバスの大きさを変える (座標の倍率もいっしょに変わる)。
    pub fn resize(&self, width: u32, height: u32) {
        self.shared.canvas.set_width(width);
        self.shared.canvas.set_height(height);
        self.shared
            .with_engine("resize", |engine| engine.set_viewport(width as f32, height as f32));
        self.shared.redraw();
    }

    /// 「次へ」ボタン用。最後のシナリオなら全部終わりになる。
    pub fn advance(&self) {
        let now = js_sys::Date::now();
        self.shared.with_engine("advance", |engine| engine.advance(now));
        self.shared.redraw();
    }

    pub fn render(&self) {
        self.shared.redraw();
    }

    pub fn get_render_state_json(&self) -> Result<JsValue, JsValue> {
        state_getter::get_render_state_json(&self.shared.engine)
    }

    pub fn progress_text(&self) -> String {
        self.shared
            .with_engine("progress_text", |engine| engine.progress_text())
            .unwrap_or_default()
    }

    /// タイマーを止めてリスナーを外す。二回呼んでも大丈夫。
    pub fn dispose(&self) -> Result<(), JsValue> {
        self.shared.with_engine("dispose", |engine| engine.shutdown());
        let mut listeners = self
            .listeners
            .lock()
            .map_err(|e| JsValue::from_str(&format!("Failed to lock listeners: {}", e)))?;
        browser_event_manager::detach_all(&self.shared.canvas, &mut listeners)
    }
}

// SimulationApp が不要になった時にリスナーを外す処理 (Drop トレイト)
impl Drop for SimulationApp {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            error!("SimulationApp: failed to dispose on drop: {:?}", e);
        }
    }
}
