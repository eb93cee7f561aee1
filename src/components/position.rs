// src/components/position.rs

// serde を使う宣言！シナリオ定義の JSON から座標や矩形を読み込むよ！
use serde::{Deserialize, Serialize};

/// デザイン空間 (またはキャンバスのピクセル空間) での位置だよ！ (x, y) 📍
///
/// ドラッグできるアイテムの「左上の角」を表すのに使うことが多いかな。
/// JSON では `[x, y]` の配列でも `{ "x": .., "y": .. }` でも書けるようにしてあるよ。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PositionRepr")]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 2点の差 (self - other) をオフセットとして返す。
    pub fn offset_from(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

// シナリオ作者は `"start": [20, 400]` みたいに配列で書くのが楽なので両対応！
#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Pair([f32; 2]),
    Named { x: f32, y: f32 },
}

impl From<PositionRepr> for Position {
    fn from(repr: PositionRepr) -> Self {
        match repr {
            PositionRepr::Pair([x, y]) => Position::new(x, y),
            PositionRepr::Named { x, y } => Position::new(x, y),
        }
    }
}

/// 幅と高さ。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 軸に平行な矩形 (AABB) だよ！ 当たり判定はぜんぶこれで計算する 📦
///
/// `x`, `y` は左上の角。JSON では `[x, y, w, h]` の配列でも書ける。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RectRepr")]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// 四辺すべてを `margin` だけ外側に広げた矩形を返す。
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// 点が矩形の中にあるか (左上は含む、右下は含まない)。
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RectRepr {
    Quad([f32; 4]),
    Named { x: f32, y: f32, width: f32, height: f32 },
}

impl From<RectRepr> for Rect {
    fn from(repr: RectRepr) -> Self {
        match repr {
            RectRepr::Quad([x, y, width, height]) => Rect::new(x, y, width, height),
            RectRepr::Named { x, y, width, height } => Rect::new(x, y, width, height),
        }
    }
}

// --- テスト ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_expansion() {
        let rect = Rect::new(250.0, 100.0, 120.0, 80.0);
        assert_eq!(rect.right(), 370.0);
        assert_eq!(rect.bottom(), 180.0);

        let grown = rect.expanded(20.0);
        assert_eq!(grown, Rect::new(230.0, 80.0, 160.0, 120.0));
        println!("Rect の辺と拡張テスト、成功！🎉");
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Position::new(0.0, 0.0)));
        assert!(rect.contains(Position::new(9.9, 9.9)));
        assert!(!rect.contains(Position::new(10.0, 5.0)), "右端はふくまないはず");
    }

    #[test]
    fn deserializes_both_array_and_named_forms() {
        let pos: Position = serde_json::from_str("[20, 400]").unwrap();
        assert_eq!(pos, Position::new(20.0, 400.0));
        let pos: Position = serde_json::from_str(r#"{"x": 1.5, "y": 2}"#).unwrap();
        assert_eq!(pos, Position::new(1.5, 2.0));

        let rect: Rect = serde_json::from_str("[200, 150, 200, 150]").unwrap();
        assert_eq!(rect, Rect::new(200.0, 150.0, 200.0, 150.0));
        let rect: Rect = serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(rect.size(), Size::new(3.0, 4.0));
    }
}
