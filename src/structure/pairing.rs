use super::fold::BasePair;
use crate::util::dna;

/// 局部窗口半径（±5）
pub const PAIRING_WINDOW: usize = 5;
/// 每个可互补碱基贡献的配对势
const PAIRING_POTENTIAL_STEP: f64 = 0.1;

/// 位置 `pos` 的配对风险估计，取值 [0, 1]。
///
/// 出现在碱基对列表中的位置恒为 1.0；否则按 ±5 窗口的 GC 比例与
/// 可互补碱基数量估计。越界位置返回 0.0。
pub fn pairing_probability(seq: &[u8], pos: usize, pairs: &[BasePair]) -> f64 {
    if pos >= seq.len() {
        return 0.0;
    }
    if pairs.iter().any(|p| p.contains(pos)) {
        return 1.0;
    }

    let start = pos.saturating_sub(PAIRING_WINDOW);
    let end = (pos + PAIRING_WINDOW + 1).min(seq.len());
    let window = &seq[start..end];

    let gc_ratio = dna::gc_count(window) as f64 / window.len() as f64;
    let base = seq[pos];
    let complementary = window.iter().filter(|&&b| dna::can_pair(base, b)).count();
    let pairing_potential = PAIRING_POTENTIAL_STEP * complementary as f64;

    (0.5 * gc_ratio + pairing_potential).min(1.0)
}

/// 整条序列的配对风险剖面
pub fn pairing_profile(seq: &[u8], pairs: &[BasePair]) -> Vec<f64> {
    let mut paired = vec![false; seq.len()];
    for p in pairs {
        for idx in [p.i, p.j] {
            if idx < paired.len() {
                paired[idx] = true;
            }
        }
    }
    (0..seq.len())
        .map(|pos| if paired[pos] { 1.0 } else { pairing_probability(seq, pos, &[]) })
        .collect()
}
