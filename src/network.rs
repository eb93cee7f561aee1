// src/network.rs

// このファイルは、完了記録サーバーとの HTTP 通信を担当するモジュールだよ！📡
// ブラウザの fetch API を `web_sys` 経由で呼んで、`wasm_bindgen_futures` で
// Promise を待つ。送信はぜんぶ投げっぱなし (spawn_local) で、エンジンは結果を待たない。
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::config::EngineConfig;
use crate::error::SimError;
use crate::protocol::{CompletionAck, CompletionReport, PlayRecord, StartNotice};
use crate::scenario::ScenarioDefinition;
use crate::telemetry::{PlayLedger, ReferenceBook, TelemetrySink};

/// fetch でサーバーに記録を送るテレメトリ。
pub struct HttpTelemetry {
    config: EngineConfig,
    plays: PlayLedger,
    // 返事は非同期で届くので、Future の中からも書き込めるように共有する
    references: Arc<Mutex<ReferenceBook>>,
}

impl HttpTelemetry {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "HttpTelemetry: enabled={} complete endpoint={}",
            config.telemetry_enabled, config.complete_endpoint
        );
        Self {
            config,
            plays: PlayLedger::default(),
            references: Arc::new(Mutex::new(ReferenceBook::default())),
        }
    }

    /// JSON を POST して、結果は待たずに捨てる。
    fn post_detached<T: Serialize>(&self, url: &str, payload: &T) {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("HttpTelemetry: failed to serialize payload for {}: {}", url, e);
                return;
            }
        };
        let url = url.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = post_json(&url, &body).await.map_err(|e| {
                warn!("HttpTelemetry: POST {} failed: {}", url, e);
            });
        });
    }
}

impl TelemetrySink for HttpTelemetry {
    fn scenario_started(&mut self, scenario: &ScenarioDefinition) {
        if !self.config.telemetry_enabled {
            return;
        }
        // 新しく始めたシーンの古い参照 ID は見せない
        if let Ok(mut book) = self.references.lock() {
            book.forget(&scenario.id);
        }

        self.post_detached(&self.config.start_endpoint, &StartNotice { scene_id: scenario.id.clone() });

        if let Some(play_type) = self.plays.first_play(scenario.category()) {
            debug!("HttpTelemetry: first {} scenario of this session.", play_type);
            self.post_detached(&self.config.play_endpoint, &PlayRecord { play_type: play_type.to_string() });
        }
    }

    fn scenario_completed(&mut self, report: CompletionReport) {
        if !self.config.telemetry_enabled {
            return;
        }
        let body = match serde_json::to_string(&report) {
            Ok(body) => body,
            Err(e) => {
                warn!("HttpTelemetry: failed to serialize completion report: {}", e);
                return;
            }
        };
        let url = self.config.complete_endpoint.clone();
        let references = Arc::clone(&self.references);
        let scene_id = report.scene_id;
        // 返事が届くまでに同じシーンへ入り直していたら、その返事は使わない
        let run = self
            .references
            .lock()
            .map(|book| book.current_run(&scene_id))
            .unwrap_or_default();

        wasm_bindgen_futures::spawn_local(async move {
            let text = match post_json(&url, &body).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("HttpTelemetry: completion report for {} failed: {}", scene_id, e);
                    return;
                }
            };
            match serde_json::from_str::<CompletionAck>(&text) {
                Ok(CompletionAck { reference_id: Some(reference_id), .. }) => {
                    info!("HttpTelemetry: {} recorded as {}.", scene_id, reference_id);
                    if let Ok(mut book) = references.lock() {
                        if !book.record(&scene_id, run, reference_id) {
                            debug!("HttpTelemetry: dropped a reference id from an earlier run of {}.", scene_id);
                        }
                    }
                }
                Ok(CompletionAck { error: Some(error), .. }) => {
                    warn!("HttpTelemetry: server rejected {}: {}", scene_id, error);
                }
                Ok(_) => debug!("HttpTelemetry: {} recorded without a reference id.", scene_id),
                Err(e) => warn!("HttpTelemetry: unreadable completion response for {}: {}", scene_id, e),
            }
        });
    }

    fn reference_for(&self, scene_id: &str) -> Option<String> {
        self.references.lock().ok()?.get(scene_id).cloned()
    }
}

/// `url` に JSON を POST してレスポンス本文を返す。2xx 以外はエラー。
async fn post_json(url: &str, body: &str) -> Result<String, SimError> {
    let window = web_sys::window().ok_or_else(|| SimError::MissingElement("window".into()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&body.into());

    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        return Err(SimError::Js(format!("HTTP {}: {}", response.status(), text)));
    }
    Ok(text)
}
