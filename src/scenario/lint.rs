// src/scenario/lint.rs
//! シナリオ定義の「作り間違い」を見つけて報告する。
//!
//! エンジンはこれを理由に定義を拒否しない。ホストが正しい定義を渡すのが前提で、
//! ここで見つかるのはあくまで作者向けの警告だよ。

use itertools::Itertools;

use crate::scenario::definition::ScenarioDefinition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintFinding {
    /// どのターゲットにも受け付けられないアイテム (絶対に成功できない！)
    UnplaceableItem { scenario_id: String, item_id: String },
    /// 存在しないアイテムを受け付けるターゲット
    UnknownAcceptedItem { scenario_id: String, target_id: String, item_id: String },
    DuplicateItemId { scenario_id: String, item_id: String },
    MissingHintTarget { scenario_id: String, hint_target_id: String },
}

pub fn lint(scenario: &ScenarioDefinition) -> Vec<LintFinding> {
    let scenario_id = scenario.id.clone();
    let mut findings = Vec::new();

    findings.extend(
        scenario
            .draggables
            .iter()
            .map(|d| d.id.as_str())
            .duplicates()
            .map(|item_id| LintFinding::DuplicateItemId {
                scenario_id: scenario_id.clone(),
                item_id: item_id.to_string(),
            }),
    );

    findings.extend(
        scenario
            .draggables
            .iter()
            .filter(|item| !scenario.targets.iter().any(|t| t.accepts(&item.id)))
            .map(|item| LintFinding::UnplaceableItem {
                scenario_id: scenario_id.clone(),
                item_id: item.id.clone(),
            }),
    );

    for target in &scenario.targets {
        findings.extend(
            target
                .accepts
                .iter()
                .filter(|item_id| scenario.draggable(item_id).is_none())
                .map(|item_id| LintFinding::UnknownAcceptedItem {
                    scenario_id: scenario_id.clone(),
                    target_id: target.id.clone(),
                    item_id: item_id.clone(),
                }),
        );
    }

    if let Some(hint_id) = &scenario.hint_target_id {
        if scenario.hint_target().is_none() {
            findings.push(LintFinding::MissingHintTarget {
                scenario_id,
                hint_target_id: hint_id.clone(),
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::catalog;

    #[test]
    fn builtin_catalog_is_clean() {
        for scenario in catalog::builtin_scenarios() {
            assert!(lint(&scenario).is_empty(), "{} に警告が出たらダメ", scenario.id);
        }
    }

    #[test]
    fn reports_authoring_mistakes() {
        let mut scenario = catalog::helmet_prototype();
        scenario.draggables.push(scenario.draggables[0].clone());
        scenario.targets[0].accepts.push("gloves".into());
        scenario.hint_target_id = Some("neck".into());
        scenario.draggables[0].id = "visor".into();

        let findings = lint(&scenario);
        assert!(findings.contains(&LintFinding::UnplaceableItem {
            scenario_id: scenario.id.clone(),
            item_id: "visor".into(),
        }));
        assert!(findings.contains(&LintFinding::UnknownAcceptedItem {
            scenario_id: scenario.id.clone(),
            target_id: "head".into(),
            item_id: "gloves".into(),
        }));
        assert!(findings.contains(&LintFinding::MissingHintTarget {
            scenario_id: scenario.id.clone(),
            hint_target_id: "neck".into(),
        }));
        println!("lint 検出テスト、成功！🎉 {:?}", findings);
    }

    #[test]
    fn duplicate_ids_are_reported_once() {
        let mut scenario = catalog::helmet_prototype();
        scenario.draggables.push(scenario.draggables[0].clone());
        let duplicates: Vec<_> = lint(&scenario)
            .into_iter()
            .filter(|f| matches!(f, LintFinding::DuplicateItemId { .. }))
            .collect();
        assert_eq!(duplicates.len(), 1);
    }
}
