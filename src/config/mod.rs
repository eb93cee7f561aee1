// src/config/mod.rs
//! 定数と実行時設定。

pub mod layout;
pub mod engine_config;

pub use engine_config::EngineConfig;
