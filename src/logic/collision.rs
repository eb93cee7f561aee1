// src/logic/collision.rs
//! 当たり判定のロジック。
//!
//! 座標はぜんぶデザイン空間で揃えてから呼ぶこと！ (画面のピクセル座標は
//! `viewport` で先に変換しておく)

use std::collections::HashMap;

use crate::components::{Position, Rect};
use crate::scenario::{DraggableItem, ScenarioDefinition, TargetZone};

/// AABB 同士が重なっているか。
///
/// 分離軸のショートカット: どちらかの右端がもう一方の左端より手前にある、
/// または下端が上端より手前にあるなら「離れている」。重なりはその否定。
/// 辺がちょうど接しているだけでも重なり扱い。
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.left() || a.left() > b.right() || a.bottom() < b.top() || a.top() > b.bottom())
}

/// ターゲットを `margin` だけ四方に広げてから重なりを判定する。
pub fn overlaps_with_tolerance(hitbox: &Rect, target: &Rect, margin: f32) -> bool {
    overlaps(hitbox, &target.expanded(margin))
}

/// `position` に置かれた `item` を受け付けて、しかも重なっている最初のターゲットを探す。
/// 定義順で最初に見つかったものが勝ち。
pub fn find_accepting_target<'a>(
    item: &DraggableItem,
    position: Position,
    targets: &'a [TargetZone],
    margin: f32,
) -> Option<&'a TargetZone> {
    let hitbox = item.hitbox_at(position);
    targets
        .iter()
        .filter(|target| target.accepts(&item.id))
        .find(|target| overlaps_with_tolerance(&hitbox, &target.rect, margin))
}

/// `point` の下にある一番手前のアイテムを探す (ポインタを押したときに使う)。
///
/// 重なり順: ドラッグ中のアイテムが一番上、それ以外は定義の後ろにあるものほど上。
pub fn find_topmost_item<'a>(
    scenario: &'a ScenarioDefinition,
    positions: &HashMap<String, Position>,
    dragging: Option<&str>,
    point: Position,
) -> Option<&'a DraggableItem> {
    let hit = |item: &DraggableItem| {
        positions
            .get(&item.id)
            .map(|pos| item.visual_rect_at(*pos).contains(point))
            .unwrap_or(false)
    };

    if let Some(item) = dragging.and_then(|id| scenario.draggable(id)) {
        if hit(item) {
            return Some(item);
        }
    }
    scenario.draggables.iter().rev().find(|item| hit(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Size;
    use crate::scenario::catalog;

    #[test]
    fn touching_edges_count_as_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(overlaps(&a, &Rect::new(0.0, 10.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, -5.5, 5.0, 5.0)));
    }

    #[test]
    fn overlap_is_symmetric_and_handles_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn tolerance_margin_grows_the_target_on_every_side() {
        let target = Rect::new(200.0, 150.0, 200.0, 150.0);
        let margin = 20.0;
        // 各辺から 20 以内ならヒット
        let near = [
            Rect::new(170.0, 200.0, 10.0, 10.0), // 左
            Rect::new(420.0, 200.0, 10.0, 10.0), // 右
            Rect::new(250.0, 120.0, 10.0, 10.0), // 上
            Rect::new(250.0, 320.0, 10.0, 10.0), // 下
        ];
        for hitbox in &near {
            assert!(overlaps_with_tolerance(hitbox, &target, margin), "{:?} はヒットするはず", hitbox);
        }
        // 20 より離れていたらハズレ
        let far = [
            Rect::new(169.0, 200.0, 10.0, 10.0),
            Rect::new(421.0, 200.0, 10.0, 10.0),
            Rect::new(250.0, 119.0, 10.0, 10.0),
            Rect::new(250.0, 321.0, 10.0, 10.0),
        ];
        for hitbox in &far {
            assert!(!overlaps_with_tolerance(hitbox, &target, margin), "{:?} はハズレのはず", hitbox);
        }
    }

    #[test]
    fn only_accepting_targets_are_considered() {
        let mut scenario = catalog::helmet_prototype();
        let helmet = scenario.draggables[0].clone();
        let on_head = Position::new(260.0, 100.0);

        assert_eq!(
            find_accepting_target(&helmet, on_head, &scenario.targets, 20.0).map(|t| t.id.as_str()),
            Some("head")
        );

        scenario.targets[0].accepts.clear();
        assert!(find_accepting_target(&helmet, on_head, &scenario.targets, 20.0).is_none());
    }

    #[test]
    fn first_target_in_definition_order_wins() {
        let mut scenario = catalog::helmet_prototype();
        let mut second = scenario.targets[0].clone();
        second.id = "head_again".into();
        scenario.targets.push(second);
        let helmet = scenario.draggables[0].clone();
        let found = find_accepting_target(&helmet, Position::new(260.0, 100.0), &scenario.targets, 20.0);
        assert_eq!(found.map(|t| t.id.as_str()), Some("head"));
    }

    #[test]
    fn topmost_item_prefers_the_dragged_one() {
        let mut scenario = catalog::helmet_prototype();
        let mut gloves = scenario.draggables[0].clone();
        gloves.id = "gloves".into();
        gloves.size = Some(Size::new(100.0, 80.0));
        scenario.draggables.push(gloves);

        let mut positions = HashMap::new();
        positions.insert("helmet".to_string(), Position::new(0.0, 0.0));
        positions.insert("gloves".to_string(), Position::new(50.0, 0.0));
        let point = Position::new(60.0, 10.0);

        // 重なっている所では後ろの定義 (gloves) が上
        assert_eq!(find_topmost_item(&scenario, &positions, None, point).map(|i| i.id.as_str()), Some("gloves"));
        // ドラッグ中なら helmet が一番上
        assert_eq!(
            find_topmost_item(&scenario, &positions, Some("helmet"), point).map(|i| i.id.as_str()),
            Some("helmet")
        );
        assert!(find_topmost_item(&scenario, &positions, None, Position::new(400.0, 400.0)).is_none());
    }
}
