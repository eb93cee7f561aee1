// src/components/dragging_info.rs

use serde::{Deserialize, Serialize};
use crate::components::position::Position;

/// 今まさにドラッグされているアイテムの情報だよ！🖱️➡️⛑️
///
/// ドラッグ中は同時にひとつだけ。ドラッグが終わったら捨てられる。
/// 座標はぜんぶデザイン空間 (シナリオ作者が配置に使う座標系) の値。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DraggingInfo {
    /// ドラッグ中のアイテム ID
    pub item_id: String,
    /// ドラッグ開始時のポインタとアイテム左上のオフセット。
    /// ドラッグ中はずっと固定 (アイテムがポインタの下でジャンプしないように)
    pub offset: Position,
    /// ドラッグ開始時のアイテムの位置
    pub original: Position,
}

impl DraggingInfo {
    /// ポインタ位置から、アイテムの新しい左上位置を計算する。
    pub fn item_position_for(&self, pointer: Position) -> Position {
        pointer.offset_from(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_follows_pointer_minus_offset() {
        let info = DraggingInfo {
            item_id: "helmet".to_string(),
            offset: Position::new(10.0, 5.0),
            original: Position::new(20.0, 400.0),
        };
        assert_eq!(info.item_position_for(Position::new(110.0, 105.0)), Position::new(100.0, 100.0));
        // 同じポインタなら何度呼んでも同じ位置
        assert_eq!(
            info.item_position_for(Position::new(110.0, 105.0)),
            info.item_position_for(Position::new(110.0, 105.0))
        );
    }
}
