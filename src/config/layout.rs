// src/config/layout.rs
//! シミュレーション画面のレイアウトとタイミングに関する定数を定義するよ！
//! デザイン空間のサイズ、当たり判定の余白、タイマーの待ち時間など。

use crate::components::Size;

// --- デザイン空間 (シナリオ作者が座標を書く論理座標系) ---
pub const WIDE_DESIGN_SPACE: Size = Size::new(640.0, 500.0); // 汎用シナリオ
pub const SQUARE_DESIGN_SPACE: Size = Size::new(500.0, 500.0); // プロトタイプ3種

/// ターゲット矩形を四方に広げる余白 (デザイン空間の単位)
pub const TOLERANCE_MARGIN: f32 = 20.0;

// --- シナリオごとのデフォルト値 (秒・回数) ---
pub const DEFAULT_HINT_DELAY_SECS: f64 = 10.0;
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 45.0;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

// --- 固定の待ち時間 (ミリ秒) ---
pub const SUCCESS_ADVANCE_DELAY_MS: f64 = 1_500.0; // 成功 → 次へ
pub const TIME_LIMIT_ADVANCE_DELAY_MS: f64 = 1_500.0; // 時間切れ → 次へ
pub const WRONG_CLEAR_DELAY_MS: f64 = 1_000.0; // 「ちがうよ」表示を消して元の位置に戻す
pub const FAILURE_ADVANCE_DELAY_MS: f64 = 2_000.0; // 試行回数を使い切った → 次へ

/// ホスト側がカウントダウンを更新する間隔
pub const TICK_INTERVAL_MS: i32 = 100;

// --- 描画まわり ---
pub const DRAGGING_SCALE: f64 = 1.1; // ドラッグ中はちょっと大きく
pub const HINT_STROKE_COLOR: &str = "#10b981";
pub const HINT_FILL_COLOR: &str = "rgba(16, 185, 129, 0.2)";
pub const BACKGROUND_COLOR: &str = "#ffffff";
