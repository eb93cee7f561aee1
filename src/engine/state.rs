// src/engine/state.rs
//! 今のシナリオひとつ分の、書き換わる状態。
//! シナリオに入るたびに作り直して、次へ進むときに捨てる。

use std::collections::HashMap;

use crate::components::{DraggingInfo, Position};
use crate::engine::timers::{Millis, TimerHandle, TimerKind, TimerQueue};
use crate::scenario::ScenarioDefinition;

/// シナリオの進み具合。Active 以外は終端で、もう当たり判定はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPhase {
    Active,
    /// 正しい場所に置けた 🎉
    Succeeded,
    /// 試行回数を使い切った (自動で次へ進むのを待っている)
    Failed,
    /// 制限時間切れ (自動で次へ進むのを待っている)
    TimedOut,
}

impl ScenarioPhase {
    pub fn is_terminal(self) -> bool {
        self != ScenarioPhase::Active
    }
}

#[derive(Debug)]
pub struct InteractionState {
    pub index: usize,
    /// アイテム ID → 現在の左上位置 (デザイン空間)。シナリオの全アイテム分が必ずある
    pub positions: HashMap<String, Position>,
    pub dragging: Option<DraggingInfo>,
    pub attempts: u32,
    pub started_at: Millis,
    pub remaining_secs: f64,
    pub hint_shown: bool,
    pub success_shown: bool,
    pub wrong_shown: bool,
    pub phase: ScenarioPhase,
    pub matched_target: Option<String>,
    pub timers: TimerQueue,
    pub hint_timer: Option<TimerHandle>,
    pub time_limit_timer: Option<TimerHandle>,
}

impl InteractionState {
    /// シナリオ開始時の状態を作って、ヒント用と制限時間用のタイマーを積む。
    pub fn enter(index: usize, scenario: &ScenarioDefinition, now: Millis) -> Self {
        let positions = scenario
            .draggables
            .iter()
            .map(|item| (item.id.clone(), item.start))
            .collect();

        let mut timers = TimerQueue::new();
        let hint_timer = timers.schedule(TimerKind::InactivityHint, now + scenario.hint_delay_ms());
        let time_limit_timer = timers.schedule(TimerKind::TimeLimit, now + scenario.time_limit_ms());

        Self {
            index,
            positions,
            dragging: None,
            attempts: 0,
            started_at: now,
            remaining_secs: scenario.time_limit_secs(),
            hint_shown: false,
            success_shown: false,
            wrong_shown: false,
            phase: ScenarioPhase::Active,
            matched_target: None,
            timers,
            hint_timer: Some(hint_timer),
            time_limit_timer: Some(time_limit_timer),
        }
    }

    /// 経過秒 (切り捨て)
    pub fn elapsed_secs(&self, now: Millis) -> u32 {
        ((now - self.started_at).max(0.0) / 1000.0).floor() as u32
    }

    /// 残り時間を経過時間から計算し直す。0 より下にはならない。
    pub fn refresh_countdown(&mut self, scenario: &ScenarioDefinition, now: Millis) {
        let elapsed = self.elapsed_secs(now) as f64;
        self.remaining_secs = (scenario.time_limit_secs() - elapsed).max(0.0);
    }

    pub fn cancel_hint_timer(&mut self) {
        if let Some(handle) = self.hint_timer.take() {
            self.timers.cancel(handle);
        }
    }

    pub fn cancel_time_limit_timer(&mut self) {
        if let Some(handle) = self.time_limit_timer.take() {
            self.timers.cancel(handle);
        }
    }

    /// 積んであるタイマーを全部取り消す。
    pub fn cancel_all_timers(&mut self) {
        self.timers.cancel_all();
        self.hint_timer = None;
        self.time_limit_timer = None;
    }

    pub fn is_dragging(&self, item_id: &str) -> bool {
        self.dragging.as_ref().map(|d| d.item_id == item_id).unwrap_or(false)
    }
}
