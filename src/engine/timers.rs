// src/engine/timers.rs
//! シナリオごとのタイマー置き場。
//!
//! ブラウザの setTimeout に直接コールバックを預けるんじゃなくて、
//! 「いつ・何をするか」をここに積んでおいて、ホストの tick でまとめて発火させるよ。
//! キューは `InteractionState` が持っているので、シナリオが入れ替わると
//! 古いタイマーはキューごと消える (古いシナリオのタイマーが新しいシナリオで発火しない)。

/// 時刻はミリ秒 (`Date.now()` と同じ単位)。
pub type Millis = f64;

/// キャンセル用のハンドル。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// 発火したときに何をするか ⏰
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// しばらく操作がなければヒントを出す
    InactivityHint,
    /// 制限時間切れ
    TimeLimit,
    /// 次のシナリオへ進む
    Advance,
    /// 「ちがうよ」表示を消してアイテムを開始位置に戻す
    ClearWrong { item_id: String },
    /// 試行回数を使い切った結果を報告して次へ
    ReportFailure,
}

#[derive(Debug, Clone)]
struct ScheduledTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due_at: Millis,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<ScheduledTimer>,
    next_handle: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_at: Millis) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(ScheduledTimer { handle, kind, due_at });
        handle
    }

    /// まだ発火していなければ取り消して true を返す。
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// `now` までに期限が来たタイマーのうち一番早いものを取り出す。
    /// 同時刻なら先に積んだほうが先。返す時刻は予定されていた期限。
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerKind, Millis)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= now)
            .min_by(|(_, a), (_, b)| a.due_at.total_cmp(&b.due_at).then(a.handle.cmp(&b.handle)))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        Some((timer.kind, timer.due_at))
    }

    pub fn next_due_at(&self) -> Option<Millis> {
        self.timers.iter().map(|t| t.due_at).min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order_then_insertion_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::TimeLimit, 45_000.0);
        queue.schedule(TimerKind::InactivityHint, 10_000.0);
        queue.schedule(TimerKind::Advance, 10_000.0);

        assert_eq!(queue.next_due_at(), Some(10_000.0));
        assert_eq!(queue.pop_due(9_999.0), None);
        assert_eq!(queue.pop_due(50_000.0), Some((TimerKind::InactivityHint, 10_000.0)));
        assert_eq!(queue.pop_due(50_000.0), Some((TimerKind::Advance, 10_000.0)));
        assert_eq!(queue.pop_due(50_000.0), Some((TimerKind::TimeLimit, 45_000.0)));
        assert!(queue.is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut queue = TimerQueue::new();
        let hint = queue.schedule(TimerKind::InactivityHint, 10.0);
        assert!(queue.is_pending(hint));
        assert!(queue.cancel(hint));
        assert!(!queue.cancel(hint), "二回目のキャンセルは何もしない");
        assert_eq!(queue.pop_due(1_000.0), None);

        queue.schedule(TimerKind::TimeLimit, 10.0);
        queue.schedule(TimerKind::Advance, 20.0);
        queue.cancel_all();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop_due(1_000.0), None);
    }
}
