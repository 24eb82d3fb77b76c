use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fold::{WindowEnergy, REFERENCE_TEMP};

/// 送入外部引擎的最短窗口
pub const MIN_WINDOW_LEN: usize = 6;

/// 位置能量剖面参数
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOpt {
    pub window: usize,
    pub temperature: f64,
}

impl Default for ProfileOpt {
    fn default() -> Self {
        Self {
            window: 10,
            temperature: REFERENCE_TEMP,
        }
    }
}

/// 外部引擎返回的 NaN / ±Inf 一律归零
#[inline]
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// 位置 i 对应的窗口 [max(0, i-h), min(n, i+h+1))
#[inline]
fn window_bounds(i: usize, n: usize, half: usize) -> (usize, usize) {
    (i.saturating_sub(half), (i + half + 1).min(n))
}

fn energy_at<E: WindowEnergy + ?Sized>(seq: &[u8], i: usize, half: usize, temperature: f64, engine: &E) -> f64 {
    let (s, e) = window_bounds(i, seq.len(), half);
    if e - s < MIN_WINDOW_LEN {
        return 0.0;
    }
    let raw = engine.window_energy(&seq[s..e], temperature);
    if !raw.is_finite() {
        warn!(position = i, value = raw, "non-finite window energy clamped to 0");
    }
    finite_or_zero(raw)
}

/// 滑动窗口自由能剖面。输出与输入等长，所有值均为有限数。
/// 每个位置调用一次外部引擎，长序列请在后台执行。
pub fn energy_profile<E: WindowEnergy + ?Sized>(seq: &[u8], opt: ProfileOpt, engine: &E) -> Vec<f64> {
    let half = opt.window / 2;
    (0..seq.len())
        .map(|i| energy_at(seq, i, half, opt.temperature, engine))
        .collect()
}

/// 并行版本，结果与 [`energy_profile`] 逐位相同
pub fn energy_profile_par<E: WindowEnergy + Sync + ?Sized>(seq: &[u8], opt: ProfileOpt, engine: &E) -> Vec<f64> {
    let half = opt.window / 2;
    (0..seq.len())
        .into_par_iter()
        .map(|i| energy_at(seq, i, half, opt.temperature, engine))
        .collect()
}
