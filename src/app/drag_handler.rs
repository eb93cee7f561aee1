// src/app/drag_handler.rs
//! ポインタイベント (押す・動かす・離す・外に出る) をエンジンの操作に変換する。

use log::debug;
use web_sys::{HtmlCanvasElement, MouseEvent};

use crate::app::sim_app::SharedApp;
use crate::components::Position;

/// イベントの座標をキャンバスのピクセル座標に直す。
/// CSS で拡大縮小されていても、キャンバスの width/height 基準になるよ。
pub fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Position {
    let rect = canvas.get_bounding_client_rect();
    let css_x = event.client_x() as f64 - rect.left();
    let css_y = event.client_y() as f64 - rect.top();
    let scale_x = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let scale_y = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    Position::new((css_x * scale_x) as f32, (css_y * scale_y) as f32)
}

/// 押した場所の一番手前のアイテムをつかむ。何もなければ何もしない。
pub(crate) fn handle_pointer_down(app: &SharedApp, event: &MouseEvent) {
    let point = canvas_point(&app.canvas, event);
    let began = app.with_engine("pointerdown", |engine| match engine.item_at(point) {
        Some(item_id) => engine.begin_drag(&item_id, point),
        None => false,
    });
    if began == Some(true) {
        event.prevent_default();
        app.redraw();
    }
}

pub(crate) fn handle_pointer_move(app: &SharedApp, event: &MouseEvent) {
    let point = canvas_point(&app.canvas, event);
    let moved = app.with_engine("pointermove", |engine| {
        if engine.dragged_item().is_none() {
            return false;
        }
        engine.update_drag(point);
        true
    });
    if moved == Some(true) {
        app.redraw();
    }
}

pub(crate) fn handle_pointer_up(app: &SharedApp, now: f64) {
    if let Some(Some(outcome)) = app.with_engine("pointerup", |engine| engine.end_drag(now)) {
        debug!("DragHandler: drop outcome {:?}", outcome);
        app.redraw();
    }
}

/// キャンバスの外に出たら、離したのと同じ扱い。
pub(crate) fn handle_pointer_leave(app: &SharedApp, now: f64) {
    if let Some(Some(outcome)) = app.with_engine("pointerleave", |engine| engine.pointer_left(now)) {
        debug!("DragHandler: pointer left the canvas, outcome {:?}", outcome);
        app.redraw();
    }
}

/// インターバルごとに呼ばれる。タイマーを進めて描き直す ⏱️
pub(crate) fn handle_tick(app: &SharedApp, now: f64) {
    if app.with_engine("tick", |engine| engine.tick(now)).is_some() {
        app.redraw();
    }
}
