// src/components/mod.rs

// シナリオの中で使う小さなデータ型たち！
pub mod position; // 座標・サイズ・矩形 📍
pub mod dragging_info; // ドラッグ中の情報 🖱️

pub use position::{Position, Rect, Size};
pub use dragging_info::DraggingInfo;
