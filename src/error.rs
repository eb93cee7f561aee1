// src/error.rs
//! クレート全体で使うエラー型。
//!
//! ドラッグ操作そのものはエラーを返さない (ログを出して何もしない) ので、
//! ここに来るのは設定の読み込みやブラウザ API まわりの失敗だけだよ。

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to parse scenario catalog: {0}")]
    Catalog(#[source] serde_json::Error),

    #[error("failed to parse engine config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("failed to serialize render state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("browser API error: {0}")]
    Js(String),
}

impl From<JsValue> for SimError {
    fn from(value: JsValue) -> Self {
        // JS の Error なら message を、それ以外は Debug 表示を使う
        let text = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        SimError::Js(text)
    }
}

impl From<SimError> for JsValue {
    fn from(err: SimError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
