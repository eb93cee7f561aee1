// src/app/renderer.rs
//! `RenderState` を Canvas 2D に描く。
//!
//! 描く順番: 背景 → オーバーレイ → ヒント枠 → アイテム (ドラッグ中は最後) → 状態バナー。
//! 動画の差し替えは Canvas では再生しないので、JS 側が `video` を見て DOM で重ねてね。

use std::collections::HashMap;

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::components::Rect;
use crate::config::layout;
use crate::engine::{ItemView, RenderState, ScenarioView, TargetView};

/// 画像は src ごとに一度だけ読み込む 🖼️
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// 読み込み済みなら画像を返す。初めての src ならここで読み込みを始める。
    pub fn get(&mut self, src: &str) -> Option<HtmlImageElement> {
        if let Some(image) = self.images.get(src) {
            return (image.complete() && image.natural_width() > 0).then(|| image.clone());
        }
        match HtmlImageElement::new() {
            Ok(image) => {
                image.set_src(src);
                debug!("ImageCache: loading {}", src);
                self.images.insert(src.to_string(), image);
            }
            Err(e) => debug!("ImageCache: could not create image for {}: {:?}", src, e),
        }
        None
    }
}

pub fn render(
    state: &RenderState,
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
    images: &mut ImageCache,
) -> Result<(), JsValue> {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    context.clear_rect(0.0, 0.0, width, height);
    context.set_fill_style_str(layout::BACKGROUND_COLOR);
    context.fill_rect(0.0, 0.0, width, height);

    let Some(view) = state.scenario.as_ref() else {
        if state.finished {
            draw_centered_text(context, "All scenarios complete 🎉", width, height)?;
        }
        return Ok(());
    };

    if let Some(background) = images.get(&view.background) {
        context.draw_image_with_html_image_element_and_dw_and_dh(&background, 0.0, 0.0, width, height)?;
    }
    for overlay in &view.overlays {
        if let Some(image) = images.get(overlay) {
            context.draw_image_with_html_image_element_and_dw_and_dh(&image, 0.0, 0.0, width, height)?;
        }
    }

    for target in view.targets.iter().filter(|t| t.highlighted) {
        draw_hint(context, target)?;
    }
    for item in &view.items {
        draw_item(context, item, images)?;
    }
    draw_banner(context, view, width)?;
    Ok(())
}

fn draw_hint(context: &CanvasRenderingContext2d, target: &TargetView) -> Result<(), JsValue> {
    let Rect { x, y, width, height } = target.rect;
    let (x, y, w, h) = (x as f64, y as f64, width as f64, height as f64);

    context.save();
    context.set_fill_style_str(layout::HINT_FILL_COLOR);
    context.fill_rect(x, y, w, h);
    context.set_stroke_style_str(layout::HINT_STROKE_COLOR);
    context.set_line_width(3.0);
    let dash = js_sys::Array::of2(&JsValue::from_f64(8.0), &JsValue::from_f64(6.0));
    context.set_line_dash(&dash)?;
    context.stroke_rect(x, y, w, h);
    context.set_fill_style_str(layout::HINT_STROKE_COLOR);
    context.set_font("bold 14px sans-serif");
    context.fill_text("Place here →", x, (y - 6.0).max(14.0))?;
    context.restore();
    Ok(())
}

fn draw_item(context: &CanvasRenderingContext2d, item: &ItemView, images: &mut ImageCache) -> Result<(), JsValue> {
    let Rect { x, y, width, height } = item.rect;
    let (mut x, mut y, mut w, mut h) = (x as f64, y as f64, width as f64, height as f64);

    // ドラッグ中はちょっと大きく (中心はそのまま)
    if item.dragging {
        let (grown_w, grown_h) = (w * layout::DRAGGING_SCALE, h * layout::DRAGGING_SCALE);
        x -= (grown_w - w) / 2.0;
        y -= (grown_h - h) / 2.0;
        w = grown_w;
        h = grown_h;
    }

    match images.get(&item.sprite) {
        Some(image) => context.draw_image_with_html_image_element_and_dw_and_dh(&image, x, y, w, h)?,
        None => {
            // まだ読み込めていないときは名前付きの四角
            context.set_fill_style_str("#e5e7eb");
            context.fill_rect(x, y, w, h);
            context.set_stroke_style_str("#6b7280");
            context.stroke_rect(x, y, w, h);
            context.set_fill_style_str("#111827");
            context.set_font("12px sans-serif");
            let label = item.label.as_deref().unwrap_or(&item.id);
            context.fill_text(label, x + 4.0, y + h / 2.0)?;
        }
    }
    Ok(())
}

fn draw_banner(context: &CanvasRenderingContext2d, view: &ScenarioView, width: f64) -> Result<(), JsValue> {
    let mut lines: Vec<(String, &str)> = Vec::new();
    if let Some(text) = &view.success_text {
        lines.push((format!("✓ {}", text), "#047857"));
    }
    if view.wrong_shown {
        let tip = view.wrong_tip.as_deref().unwrap_or("Try again!");
        lines.push((format!("✗ Not quite. {}", tip), "#b91c1c"));
    }
    if let Some(reference) = &view.reference_id {
        lines.push((format!("Reference: {}", reference), "#374151"));
    }
    if lines.is_empty() {
        return Ok(());
    }

    let line_height = 22.0;
    context.save();
    context.set_global_alpha(0.9);
    context.set_fill_style_str("#ffffff");
    context.fill_rect(0.0, 0.0, width, 12.0 + line_height * lines.len() as f64);
    context.set_global_alpha(1.0);
    context.set_font("bold 15px sans-serif");
    for (i, (text, color)) in lines.iter().enumerate() {
        context.set_fill_style_str(color);
        context.fill_text(text, 10.0, 24.0 + line_height * i as f64)?;
    }
    context.restore();
    Ok(())
}

fn draw_centered_text(context: &CanvasRenderingContext2d, text: &str, width: f64, height: f64) -> Result<(), JsValue> {
    context.set_fill_style_str("#111827");
    context.set_font("bold 20px sans-serif");
    context.set_text_align("center");
    context.fill_text(text, width / 2.0, height / 2.0)?;
    context.set_text_align("start");
    Ok(())
}
