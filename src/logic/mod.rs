// src/logic/mod.rs
//! 純粋な計算ロジック (状態を持たない関数たち)。

pub mod collision;
pub mod viewport;

pub use collision::{find_accepting_target, find_topmost_item, overlaps, overlaps_with_tolerance};
pub use viewport::{clamp_to_canvas, Viewport};
