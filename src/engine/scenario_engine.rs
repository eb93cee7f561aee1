// src/engine/scenario_engine.rs
//! シナリオ操作エンジン本体 🚦
//!
//! シナリオ一覧を順番に1つずつ進めて、ドラッグ・当たり判定・制限時間・試行回数を
//! 全部ここで面倒を見るよ。状態を書き換えるのはポインタイベントか tick だけで、
//! どちらもホストのイベントループから1つずつ呼ばれる前提 (同時には来ない)。

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::components::{DraggingInfo, Position};
use crate::config::{layout, EngineConfig};
use crate::engine::events::{DropOutcome, EngineEvent, ScenarioResult};
use crate::engine::render_state::{ItemView, RenderState, ScenarioView, TargetView};
use crate::engine::state::{InteractionState, ScenarioPhase};
use crate::engine::timers::{Millis, TimerKind};
use crate::logic::{clamp_to_canvas, find_accepting_target, find_topmost_item, Viewport};
use crate::protocol::CompletionReport;
use crate::scenario::{PostSuccessMedia, ScenarioDefinition};
use crate::telemetry::TelemetrySink;

pub struct ScenarioEngine {
    scenarios: Vec<ScenarioDefinition>,
    config: EngineConfig,
    viewport: Viewport,
    /// 今のシナリオの状態。開始前と全部終わった後は None
    state: Option<InteractionState>,
    finished: bool,
    telemetry: Box<dyn TelemetrySink>,
    events: VecDeque<EngineEvent>,
}

impl ScenarioEngine {
    pub fn new(scenarios: Vec<ScenarioDefinition>, telemetry: Box<dyn TelemetrySink>) -> Self {
        info!("ScenarioEngine: created with {} scenarios.", scenarios.len());
        Self {
            scenarios,
            config: EngineConfig::default(),
            viewport: Viewport::default(),
            state: None,
            finished: false,
            telemetry,
            events: VecDeque::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    // --- ライフサイクル ---

    /// 最初のシナリオから始める。シナリオが空ならすぐに「全部終わった」になる。
    pub fn start(&mut self, now: Millis) {
        if self.scenarios.is_empty() {
            warn!("ScenarioEngine: start() called with no scenarios.");
            self.finish();
            return;
        }
        self.enter(0, now);
    }

    /// `index` 番目のシナリオに入る。前のシナリオのタイマーは全部捨てる。
    pub fn enter(&mut self, index: usize, now: Millis) {
        let Some(scenario) = self.scenarios.get(index) else {
            warn!("ScenarioEngine: enter({}) is out of range ({} scenarios).", index, self.scenarios.len());
            return;
        };

        if let Some(mut previous) = self.state.take() {
            previous.cancel_all_timers();
            debug!("ScenarioEngine: discarded state of scenario {}.", previous.index);
        }

        info!("ScenarioEngine: entering scenario {} ({}).", index, scenario.id);
        self.state = Some(InteractionState::enter(index, scenario, now));
        self.finished = false;
        self.events.push_back(EngineEvent::ScenarioStarted { scene_id: scenario.id.clone() });
        self.telemetry.scenario_started(scenario);
    }

    /// 次のシナリオへ。最後のシナリオなら「全部終わった」を一度だけ通知する。
    pub fn advance(&mut self, now: Millis) {
        if self.finished {
            debug!("ScenarioEngine: advance() after all scenarios are done; ignoring.");
            return;
        }
        let next = self.state.as_ref().map(|s| s.index + 1).unwrap_or(0);
        if next < self.scenarios.len() {
            self.enter(next, now);
        } else {
            self.finish();
        }
    }

    /// ページを離れるときなど。タイマーを全部止めて、状態を捨てる (通知はしない)。
    pub fn shutdown(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.cancel_all_timers();
            info!("ScenarioEngine: shut down during scenario {}.", state.index);
        }
    }

    fn finish(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.cancel_all_timers();
        }
        self.finished = true;
        info!("ScenarioEngine: all scenarios done.");
        self.events.push_back(EngineEvent::AllScenariosDone);
    }

    // --- ドラッグ ---

    /// `item_id` のドラッグを始める。`pointer` はキャンバス上のピクセル座標。
    /// 受け付けなかったら false (ログを出して何もしない)。
    pub fn begin_drag(&mut self, item_id: &str, pointer: Position) -> bool {
        let Some(state) = self.state.as_mut() else {
            warn!("ScenarioEngine: begin_drag({}) with no active scenario.", item_id);
            return false;
        };
        let scenario = &self.scenarios[state.index];

        if state.phase.is_terminal() {
            debug!("ScenarioEngine: begin_drag ignored, scenario {} is {:?}.", scenario.id, state.phase);
            return false;
        }
        if let Some(current) = &state.dragging {
            warn!("ScenarioEngine: begin_drag({}) while {} is already being dragged.", item_id, current.item_id);
            return false;
        }
        let Some(position) = state.positions.get(item_id).copied() else {
            warn!("ScenarioEngine: unknown draggable {} in scenario {}.", item_id, scenario.id);
            return false;
        };

        let pointer = self.viewport.to_design(pointer, scenario.design_space);
        state.dragging = Some(DraggingInfo {
            item_id: item_id.to_string(),
            offset: pointer.offset_from(position),
            original: position,
        });
        // ドラッグ中は「放置」じゃないのでヒントのタイマーは止める
        state.cancel_hint_timer();
        debug!("ScenarioEngine: dragging {} from {:?}.", item_id, position);
        true
    }

    /// ドラッグ中のアイテムをポインタに追従させる。ドラッグしていなければ何もしない。
    pub fn update_drag(&mut self, pointer: Position) {
        let Some(state) = self.state.as_mut() else { return };
        let Some(dragging) = state.dragging.as_ref() else { return };
        let scenario = &self.scenarios[state.index];

        let pointer = self.viewport.to_design(pointer, scenario.design_space);
        let mut next = dragging.item_position_for(pointer);
        if scenario.clamp_to_canvas {
            if let Some(item) = scenario.draggable(&dragging.item_id) {
                next = clamp_to_canvas(next, item.visual_size(), scenario.design_space);
            }
        }
        let item_id = dragging.item_id.clone();
        state.positions.insert(item_id, next);
    }

    /// ドラッグを終えて当たり判定をする。ドラッグしていなければ None (何もしない)。
    pub fn end_drag(&mut self, now: Millis) -> Option<DropOutcome> {
        let state = self.state.as_mut()?;
        let dragging = state.dragging.take()?;
        let scenario = &self.scenarios[state.index];

        if state.phase.is_terminal() {
            debug!("ScenarioEngine: drag of {} ended after scenario became {:?}.", dragging.item_id, state.phase);
            return None;
        }
        let Some(position) = state.positions.get(&dragging.item_id).copied() else {
            warn!("ScenarioEngine: no recorded position for {}; dropping the drag.", dragging.item_id);
            return None;
        };
        let item = scenario.draggable(&dragging.item_id)?;

        state.attempts += 1;
        let margin = self.config.tolerance_margin;

        if let Some(target) = find_accepting_target(item, position, &scenario.targets, margin) {
            info!("ScenarioEngine: {} placed on {} in {}.", item.id, target.id, scenario.id);
            state.phase = ScenarioPhase::Succeeded;
            state.success_shown = true;
            state.hint_shown = false;
            state.wrong_shown = false;
            state.matched_target = Some(target.id.clone());
            state.cancel_all_timers();

            let result = ScenarioResult {
                scene_id: scenario.id.clone(),
                success: true,
                attempts: state.attempts,
                seconds: state.elapsed_secs(now),
            };
            self.telemetry
                .scenario_completed(CompletionReport::from_result(&result, scenario.telemetry));
            self.events.push_back(EngineEvent::ScenarioCompleted(result));
            state.timers.schedule(TimerKind::Advance, now + layout::SUCCESS_ADVANCE_DELAY_MS);
            return Some(DropOutcome::Placed { target_id: target.id.clone() });
        }

        info!("ScenarioEngine: {} missed in {} (attempt {}).", item.id, scenario.id, state.attempts);
        state.wrong_shown = true;
        state.timers.schedule(
            TimerKind::ClearWrong { item_id: item.id.clone() },
            now + layout::WRONG_CLEAR_DELAY_MS,
        );

        if state.attempts >= scenario.max_attempts() {
            state.phase = ScenarioPhase::Failed;
            state.hint_shown = true;
            state.cancel_hint_timer();
            state.cancel_time_limit_timer();
            state.timers.schedule(TimerKind::ReportFailure, now + layout::FAILURE_ADVANCE_DELAY_MS);
            return Some(DropOutcome::Exhausted { attempts: state.attempts });
        }
        Some(DropOutcome::Missed { attempts: state.attempts })
    }

    /// ポインタが操作エリアの外に出た。離したのと同じ扱い。
    pub fn pointer_left(&mut self, now: Millis) -> Option<DropOutcome> {
        self.end_drag(now)
    }

    // --- 時間 ---

    /// 期限が来たタイマーを順番に発火させて、残り時間の表示を更新する。
    /// 待ち時間は期限の時刻から数えるけど、次のシナリオは tick の `now` で始める
    /// (遅れた tick の分だけ、まだ見ていないシナリオの時間が減ることはない)。
    pub fn tick(&mut self, now: Millis) {
        loop {
            let Some(state) = self.state.as_mut() else { break };
            let Some((kind, due_at)) = state.timers.pop_due(now) else { break };
            self.fire(kind, due_at, now);
        }
        if let Some(state) = self.state.as_mut() {
            let scenario = &self.scenarios[state.index];
            if !state.phase.is_terminal() {
                state.refresh_countdown(scenario, now);
            }
        }
    }

    fn fire(&mut self, kind: TimerKind, due_at: Millis, now: Millis) {
        let Some(state) = self.state.as_mut() else { return };
        let scenario = &self.scenarios[state.index];
        debug!("ScenarioEngine: timer {:?} fired for {}.", kind, scenario.id);

        match kind {
            TimerKind::InactivityHint => {
                state.hint_timer = None;
                if state.dragging.is_none() && !state.phase.is_terminal() {
                    state.hint_shown = true;
                }
            }
            TimerKind::TimeLimit => {
                state.time_limit_timer = None;
                if state.phase.is_terminal() {
                    return;
                }
                info!("ScenarioEngine: time limit reached in {}.", scenario.id);
                state.phase = ScenarioPhase::TimedOut;
                state.hint_shown = true;
                state.remaining_secs = 0.0;
                state.cancel_hint_timer();
                // ドラッグ途中だったら持ち上げた場所に戻す
                if let Some(dragging) = state.dragging.take() {
                    state.positions.insert(dragging.item_id, dragging.original);
                }
                state.timers.schedule(TimerKind::Advance, due_at + layout::TIME_LIMIT_ADVANCE_DELAY_MS);
            }
            TimerKind::ClearWrong { item_id } => {
                state.wrong_shown = false;
                // もう一度つかまれていたら位置はそのまま
                if !state.is_dragging(&item_id) {
                    if let Some(item) = scenario.draggable(&item_id) {
                        state.positions.insert(item_id, item.start);
                    }
                }
            }
            TimerKind::ReportFailure => {
                let result = ScenarioResult {
                    scene_id: scenario.id.clone(),
                    success: false,
                    attempts: state.attempts,
                    // かかった時間は期限の時刻で数える (tick が遅れても増えない)
                    seconds: state.elapsed_secs(due_at),
                };
                self.events.push_back(EngineEvent::ScenarioCompleted(result));
                self.advance(now);
            }
            TimerKind::Advance => self.advance(now),
        }
    }

    // --- ホスト向け ---

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// キャンバス上の `pointer` の下にある一番手前のアイテム ID。
    pub fn item_at(&self, pointer: Position) -> Option<String> {
        let state = self.state.as_ref()?;
        let scenario = &self.scenarios[state.index];
        let pointer = self.viewport.to_design(pointer, scenario.design_space);
        let dragging = state.dragging.as_ref().map(|d| d.item_id.as_str());
        find_topmost_item(scenario, &state.positions, dragging, pointer).map(|item| item.id.clone())
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.index)
    }

    pub fn current_scenario(&self) -> Option<&ScenarioDefinition> {
        self.state.as_ref().map(|s| &self.scenarios[s.index])
    }

    pub fn state(&self) -> Option<&InteractionState> {
        self.state.as_ref()
    }

    pub fn phase(&self) -> Option<ScenarioPhase> {
        self.state.as_ref().map(|s| s.phase)
    }

    pub fn attempts(&self) -> u32 {
        self.state.as_ref().map(|s| s.attempts).unwrap_or(0)
    }

    pub fn position_of(&self, item_id: &str) -> Option<Position> {
        self.state.as_ref()?.positions.get(item_id).copied()
    }

    pub fn dragged_item(&self) -> Option<&str> {
        self.state.as_ref()?.dragging.as_ref().map(|d| d.item_id.as_str())
    }

    /// 「Scenario 1 of 3 • Time: 45s」みたいな進捗の文字列。
    pub fn progress_text(&self) -> String {
        match &self.state {
            Some(state) => format!(
                "Scenario {} of {} • Time: {}s",
                state.index + 1,
                self.scenarios.len(),
                state.remaining_secs.max(0.0).floor()
            ),
            None if self.finished => "All scenarios complete".to_string(),
            None => "Not started".to_string(),
        }
    }

    pub fn render_state(&self) -> RenderState {
        let Some(state) = self.state.as_ref() else {
            return if self.finished { RenderState::finished() } else { RenderState::idle() };
        };
        let scenario = &self.scenarios[state.index];
        let design = scenario.design_space;
        let succeeded = state.phase == ScenarioPhase::Succeeded;

        let (background, video) = match (&scenario.post_success, succeeded) {
            (PostSuccessMedia::ImageSwap { src }, true) => (src.clone(), None),
            (PostSuccessMedia::VideoSwap { src }, true) => (scenario.background.clone(), Some(src.clone())),
            _ => (scenario.background.clone(), None),
        };

        let hint_id = scenario.hint_target().map(|t| t.id.as_str());
        let targets = scenario
            .targets
            .iter()
            .map(|target| TargetView {
                id: target.id.clone(),
                rect: self.viewport.rect_to_rendered(target.rect, design),
                label: target.label.clone(),
                highlighted: state.hint_shown && hint_id == Some(target.id.as_str()),
            })
            .collect();

        // 差し替えメディアがあるシナリオは、成功したらアイテムを消す (絵の中に描かれているので)
        let hide_items = succeeded && scenario.post_success != PostSuccessMedia::None;
        let mut items: Vec<ItemView> = if hide_items {
            Vec::new()
        } else {
            scenario
                .draggables
                .iter()
                .map(|item| {
                    let position = state.positions.get(&item.id).copied().unwrap_or(item.start);
                    ItemView {
                        id: item.id.clone(),
                        sprite: item.sprite.clone(),
                        rect: self.viewport.rect_to_rendered(item.visual_rect_at(position), design),
                        label: item.label.clone(),
                        dragging: state.is_dragging(&item.id),
                    }
                })
                .collect()
        };
        // ドラッグ中のものを最後に (stable sort なので他の順番は崩れない)
        items.sort_by_key(|item| item.dragging);

        RenderState {
            finished: false,
            scenario: Some(ScenarioView {
                index: state.index,
                count: self.scenarios.len(),
                scene_id: scenario.id.clone(),
                title: scenario.title.clone(),
                prompt: scenario.prompt.clone(),
                background,
                overlays: scenario.overlays.clone(),
                video,
                targets,
                items,
                remaining_secs: state.remaining_secs,
                attempts: state.attempts,
                max_attempts: scenario.max_attempts(),
                hint_shown: state.hint_shown,
                success_shown: state.success_shown,
                wrong_shown: state.wrong_shown,
                success_text: state.success_shown.then(|| scenario.success_text.clone()),
                wrong_tip: if state.wrong_shown {
                    scenario.first_wrong_tip().map(str::to_string)
                } else {
                    None
                },
                reference_id: if succeeded { self.telemetry.reference_for(&scenario.id) } else { None },
                progress_text: self.progress_text(),
                attempts_text: format!("Attempts: {} / {}", state.attempts, scenario.max_attempts()),
            }),
        }
    }
}
