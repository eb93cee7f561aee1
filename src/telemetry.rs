// src/telemetry.rs
//! 完了記録 (テレメトリ) の受け口。
//!
//! エンジンはここに投げっぱなしにするだけで、結果を待たない。
//! 失敗してもエンジンの状態や画面には一切影響しないこと！

use std::collections::{HashMap, HashSet};

use crate::protocol::CompletionReport;
use crate::scenario::{ScenarioDefinition, SimCategory};

pub trait TelemetrySink {
    /// シナリオが始まった
    fn scenario_started(&mut self, scenario: &ScenarioDefinition);

    /// シナリオに成功した (投げっぱなし)
    fn scenario_completed(&mut self, report: CompletionReport);

    /// そのシーンの完了に対してサーバーが返した参照 ID (届いていれば)
    fn reference_for(&self, _scene_id: &str) -> Option<String> {
        None
    }
}

/// 何も送らない。ネイティブ実行やテレメトリ無効時に使う。
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn scenario_started(&mut self, _scenario: &ScenarioDefinition) {}

    fn scenario_completed(&mut self, _report: CompletionReport) {}
}

/// セッション中に各種別を最初にプレイしたときだけプレイ記録を送るための帳簿。
#[derive(Debug, Default)]
pub struct PlayLedger {
    seen: HashSet<SimCategory>,
}

impl PlayLedger {
    /// 初めての種別なら送るべき種別名を返す。Other は記録しない。
    pub fn first_play(&mut self, category: SimCategory) -> Option<&'static str> {
        let play_type = category.play_type()?;
        if self.seen.insert(category) {
            Some(play_type)
        } else {
            None
        }
    }
}

/// シーン ID ごとの参照 ID。返事はシーンの切り替えより遅れて届くことがあるので、
/// 「今のシーン」じゃなくシーン ID をキーにして持つ。
/// 同じシーンに入り直すと回数 (run) が増えて、前の回の返事は捨てられる。
#[derive(Debug, Default)]
pub struct ReferenceBook {
    by_scene: HashMap<String, String>,
    runs: HashMap<String, u64>,
}

impl ReferenceBook {
    /// `run` 回目の報告に対する返事を記録する。もう次の回に入っていたら捨てて false。
    pub fn record(&mut self, scene_id: &str, run: u64, reference_id: String) -> bool {
        if run != self.current_run(scene_id) {
            return false;
        }
        self.by_scene.insert(scene_id.to_string(), reference_id);
        true
    }

    pub fn get(&self, scene_id: &str) -> Option<&String> {
        self.by_scene.get(scene_id)
    }

    /// シーンに入り直した。古い参照 ID を消して、回数を進める。
    pub fn forget(&mut self, scene_id: &str) {
        self.by_scene.remove(scene_id);
        *self.runs.entry(scene_id.to_string()).or_insert(0) += 1;
    }

    pub fn current_run(&self, scene_id: &str) -> u64 {
        self.runs.get(scene_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod recording {
    //! テスト用: 呼ばれた内容を記録するだけの受け口。

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TelemetryCall {
        Started(String),
        Completed(CompletionReport),
    }

    #[derive(Debug, Default, Clone)]
    pub struct RecordingTelemetry {
        pub calls: Rc<RefCell<Vec<TelemetryCall>>>,
        pub references: Rc<RefCell<ReferenceBook>>,
    }

    impl TelemetrySink for RecordingTelemetry {
        fn scenario_started(&mut self, scenario: &ScenarioDefinition) {
            self.calls.borrow_mut().push(TelemetryCall::Started(scenario.id.clone()));
        }

        fn scenario_completed(&mut self, report: CompletionReport) {
            self.calls.borrow_mut().push(TelemetryCall::Completed(report));
        }

        fn reference_for(&self, scene_id: &str) -> Option<String> {
            self.references.borrow().get(scene_id).cloned()
        }
    }
}
