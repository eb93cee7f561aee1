// src/engine/events.rs
//! エンジンからホストへ伝える出来事と、それを受け取るコールバック。
//!
//! エンジンはコールバックを直接呼ばずにイベントをキューに積むだけ。
//! ホストはエンジンのロックを離してから `EngineCallbacks::dispatch` で配る
//! (コールバックの中からエンジンをもう一度触っても大丈夫なように)。

use serde::{Deserialize, Serialize};

/// シナリオひとつの結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scene_id: String,
    pub success: bool,
    pub attempts: u32,
    pub seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ScenarioStarted { scene_id: String },
    ScenarioCompleted(ScenarioResult),
    AllScenariosDone,
}

/// `end_drag` の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// 受け付けてくれるターゲットに重なった
    Placed { target_id: String },
    /// ハズレ。まだ挑戦できる
    Missed { attempts: u32 },
    /// ハズレで試行回数を使い切った
    Exhausted { attempts: u32 },
}

pub type StartCallback = Box<dyn FnMut(&str)>;
pub type CompleteCallback = Box<dyn FnMut(&ScenarioResult)>;
pub type AllDoneCallback = Box<dyn FnMut()>;

/// ホストが登録するコールバック。どれも省略できる。
#[derive(Default)]
pub struct EngineCallbacks {
    pub on_scenario_start: Option<StartCallback>,
    pub on_scenario_complete: Option<CompleteCallback>,
    pub on_all_done: Option<AllDoneCallback>,
}

impl EngineCallbacks {
    pub fn dispatch<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = EngineEvent>,
    {
        for event in events {
            match event {
                EngineEvent::ScenarioStarted { scene_id } => {
                    if let Some(cb) = self.on_scenario_start.as_mut() {
                        cb(&scene_id);
                    }
                }
                EngineEvent::ScenarioCompleted(result) => {
                    if let Some(cb) = self.on_scenario_complete.as_mut() {
                        cb(&result);
                    }
                }
                EngineEvent::AllScenariosDone => {
                    if let Some(cb) = self.on_all_done.as_mut() {
                        cb();
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for EngineCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCallbacks")
            .field("on_scenario_start", &self.on_scenario_start.is_some())
            .field("on_scenario_complete", &self.on_scenario_complete.is_some())
            .field("on_all_done", &self.on_all_done.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_routes_each_event_and_skips_missing_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let started = Rc::clone(&seen);
        let done = Rc::clone(&seen);

        let mut callbacks = EngineCallbacks {
            on_scenario_start: Some(Box::new(move |id| started.borrow_mut().push(format!("start:{}", id)))),
            on_scenario_complete: None,
            on_all_done: Some(Box::new(move || done.borrow_mut().push("done".into()))),
        };

        callbacks.dispatch(vec![
            EngineEvent::ScenarioStarted { scene_id: "bike_a".into() },
            EngineEvent::ScenarioCompleted(ScenarioResult {
                scene_id: "bike_a".into(),
                success: true,
                attempts: 1,
                seconds: 3,
            }),
            EngineEvent::AllScenariosDone,
        ]);

        assert_eq!(*seen.borrow(), vec!["start:bike_a".to_string(), "done".to_string()]);
    }

    #[test]
    fn result_serializes_in_camel_case() {
        let result = ScenarioResult { scene_id: "car_x".into(), success: false, attempts: 3, seconds: 12 };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"sceneId":"car_x","success":false,"attempts":3,"seconds":12}"#);
    }
}
