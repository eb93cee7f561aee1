// src/lib.rs

// WASM と JavaScript を繋ぐための基本！
use wasm_bindgen::prelude::*;

// 自分で作ったモジュールたち！ これでコードを整理してるんだ。
pub mod components; // 座標・矩形・ドラッグ情報
pub mod config; // 定数と実行時設定
pub mod error;
pub mod scenario; // シナリオ定義と組み込みカタログ
pub mod logic; // 当たり判定・座標変換
pub mod engine; // シナリオを進める本体
pub mod protocol; // サーバーとやり取りする JSON
pub mod telemetry;
pub mod network; // fetch で記録を送る
pub mod app; // ブラウザ側 (SimulationApp)

// よく使う型はルートからも使えるようにしておく
pub use app::SimulationApp;
pub use config::EngineConfig;
pub use engine::{DropOutcome, EngineEvent, RenderState, ScenarioEngine, ScenarioPhase, ScenarioResult};
pub use error::SimError;
pub use scenario::ScenarioDefinition;

// main 関数の代わりに、Wasm がロードされた時に最初に実行される関数だよ。
#[wasm_bindgen(start)]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
    app::console_logger::init(log::LevelFilter::Info);
    log::info!("Panic hook and console logger set!");
}

/// 組み込みシナリオ一覧を JSON で返す (JS 側で一覧画面を作るとき用)。
#[wasm_bindgen]
pub fn builtin_scenarios_json() -> Result<String, JsValue> {
    serde_json::to_string(&scenario::catalog::builtin_scenarios())
        .map_err(|e| SimError::Serialize(e).into())
}

// ブラウザ上でだけ動くテスト (wasm-pack test --headless --chrome)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn sim_error_becomes_a_js_string() {
        let value: JsValue = SimError::MissingElement("#sim-canvas".into()).into();
        assert_eq!(value.as_string().as_deref(), Some("element not found: #sim-canvas"));
    }

    #[wasm_bindgen_test]
    fn js_errors_keep_their_message() {
        let err = SimError::from(JsValue::from(js_sys::Error::new("boom")));
        assert_eq!(err.to_string(), "browser API error: boom");
    }

    #[wasm_bindgen_test]
    fn render_state_is_returned_as_json_text() {
        let engine = std::sync::Arc::new(std::sync::Mutex::new(ScenarioEngine::new(
            scenario::catalog::builtin_scenarios(),
            Box::new(telemetry::NullTelemetry),
        )));
        let value = app::state_getter::get_render_state_json(&engine).unwrap();
        assert_eq!(value.as_string().as_deref(), Some(r#"{"finished":false,"scenario":null}"#));
    }

    #[wasm_bindgen_test]
    fn builtin_catalog_is_exported() {
        let json = builtin_scenarios_json().unwrap();
        assert!(json.contains("bike_no_helmet_prototype"));
    }
}
