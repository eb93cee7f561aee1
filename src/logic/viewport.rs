// src/logic/viewport.rs
//! 画面に描かれたキャンバス (ピクセル) とデザイン空間の間の座標変換。
//!
//! シナリオはデザイン空間 (640×500 や 500×500) で作られているけど、
//! キャンバスは好きなサイズで表示される。ポインタ座標はここで
//! デザイン空間に縮めてから当たり判定に使うよ。

use serde::{Deserialize, Serialize};

use crate::components::{Position, Rect, Size};

/// 実際に描画されているキャンバスの大きさ。
/// まだ分からない (0 以下) ときは倍率 1 として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub rendered: Size,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { rendered: Size::new(width, height) }
    }

    /// (描画幅 / デザイン幅, 描画高さ / デザイン高さ)
    pub fn scale_for(&self, design: Size) -> (f32, f32) {
        let axis = |rendered: f32, designed: f32| {
            if rendered > 0.0 && designed > 0.0 {
                rendered / designed
            } else {
                1.0
            }
        };
        (
            axis(self.rendered.width, design.width),
            axis(self.rendered.height, design.height),
        )
    }

    /// キャンバス上のポインタ座標 → デザイン空間
    pub fn to_design(&self, point: Position, design: Size) -> Position {
        let (sx, sy) = self.scale_for(design);
        Position::new(point.x / sx, point.y / sy)
    }

    /// デザイン空間の点 → キャンバス上の座標
    pub fn to_rendered(&self, point: Position, design: Size) -> Position {
        let (sx, sy) = self.scale_for(design);
        Position::new(point.x * sx, point.y * sy)
    }

    pub fn rect_to_rendered(&self, rect: Rect, design: Size) -> Rect {
        let (sx, sy) = self.scale_for(design);
        Rect::new(rect.x * sx, rect.y * sy, rect.width * sx, rect.height * sy)
    }
}

/// アイテムがデザイン空間からはみ出さないように左上位置を押し込む。
pub fn clamp_to_canvas(position: Position, item: Size, design: Size) -> Position {
    let max_x = (design.width - item.width).max(0.0);
    let max_y = (design.height - item.height).max(0.0);
    Position::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_is_scaled_down_into_design_space() {
        let design = Size::new(500.0, 500.0);
        let viewport = Viewport::new(1000.0, 250.0);
        assert_eq!(viewport.scale_for(design), (2.0, 0.5));
        assert_eq!(viewport.to_design(Position::new(600.0, 100.0), design), Position::new(300.0, 200.0));
        assert_eq!(viewport.to_rendered(Position::new(300.0, 200.0), design), Position::new(600.0, 100.0));
        assert_eq!(
            viewport.rect_to_rendered(Rect::new(250.0, 100.0, 120.0, 80.0), design),
            Rect::new(500.0, 50.0, 240.0, 40.0)
        );
    }

    #[test]
    fn unknown_viewport_means_identity() {
        let design = Size::new(640.0, 500.0);
        let viewport = Viewport::default();
        assert_eq!(viewport.scale_for(design), (1.0, 1.0));
        assert_eq!(viewport.to_design(Position::new(12.0, 34.0), design), Position::new(12.0, 34.0));
    }

    #[test]
    fn clamp_keeps_the_whole_item_inside() {
        let design = Size::new(500.0, 500.0);
        let helmet = Size::new(100.0, 80.0);
        assert_eq!(clamp_to_canvas(Position::new(-30.0, 460.0), helmet, design), Position::new(0.0, 420.0));
        assert_eq!(clamp_to_canvas(Position::new(450.0, 10.0), helmet, design), Position::new(400.0, 10.0));
        assert_eq!(clamp_to_canvas(Position::new(40.0, 50.0), helmet, design), Position::new(40.0, 50.0));
    }
}
