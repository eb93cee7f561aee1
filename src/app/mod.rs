// src/app/mod.rs
//! ブラウザ側 (SimulationApp) の内部ロジックを役割ごとに分割して置くモジュールだよ！

pub mod sim_app;
pub mod browser_event_manager;
pub mod drag_handler;
pub mod host_callbacks;
pub mod renderer;
pub mod state_getter;
pub mod console_logger;

pub use sim_app::SimulationApp;
