use serde::Serialize;
use tracing::trace;

use crate::util::dna;

/// 最小潜在重叠长度
const MIN_OVERLAP: isize = 3;
/// 最长连续配对的加权系数
const RUN_WEIGHT: f64 = 2.0;

/// 一个互补配对位置：seq1 索引、seq2 索引（均为 5′→3′ 原始坐标）及碱基
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedPosition {
    pub i: usize,
    pub j: usize,
    pub base1: char,
    pub base2: char,
}

/// 二聚体对齐结果，类似引物设计工具中的 "zipper" 视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimerAlignment {
    /// seq1 索引与 revcomp(seq2) 索引之差
    pub offset: isize,
    /// 加权得分 = 能量和 + 2 × 最长连续配对
    pub score: f64,
    /// 未加权的配对能量幅值之和（kcal/mol）
    pub energy_score: f64,
    pub paired_positions: Vec<PairedPosition>,
    pub max_consecutive_run: usize,
    pub involves_5prime_seq1: bool,
    pub involves_3prime_seq1: bool,
    pub involves_5prime_seq2: bool,
    pub involves_3prime_seq2: bool,
}

impl DimerAlignment {
    /// 是否涉及任一 3′ 末端（可被聚合酶延伸）
    pub fn is_extensible(&self) -> bool {
        self.involves_3prime_seq1 || self.involves_3prime_seq2
    }

    /// 三行双链示意：seq1 5′→3′、配对标记、seq2 3′→5′。
    /// 超出所给序列范围的配对位置不标记。
    pub fn duplex_lines(&self, seq1: &[u8], seq2: &[u8]) -> [String; 3] {
        let pad1 = (-self.offset).max(0) as usize;
        let pad2 = self.offset.max(0) as usize;

        let mut top = " ".repeat(pad1);
        top.push_str(&String::from_utf8_lossy(seq1));

        let mut bottom = " ".repeat(pad2);
        let rev2: Vec<u8> = seq2.iter().rev().copied().collect();
        bottom.push_str(&String::from_utf8_lossy(&rev2));

        let width = top.len().max(bottom.len());
        let mut bars = vec![b' '; width];
        for p in &self.paired_positions {
            if let Some(bar) = bars.get_mut(pad1 + p.i) {
                *bar = b'|';
            }
        }
        let mid = String::from_utf8_lossy(&bars).trim_end().to_string();

        [top, mid, bottom]
    }
}

/// 在所有偏移上搜索 seq1 与 seq2 的最佳互补对齐（交叉二聚体 / 自二聚体）。
///
/// 偏移范围 [-(len2-3), len1-3)，保证至少 3 个碱基的潜在重叠。
/// 仅计 Watson–Crick 配对；得分相同时保留最小偏移。无任何配对返回 None。
pub fn find_dimer(seq1: &[u8], seq2: &[u8]) -> Option<DimerAlignment> {
    let n1 = seq1.len() as isize;
    let n2 = seq2.len() as isize;
    if n1 == 0 || n2 == 0 {
        return None;
    }

    let mut best: Option<DimerAlignment> = None;
    let mut best_score = 0.0f64;

    for offset in -(n2 - MIN_OVERLAP)..(n1 - MIN_OVERLAP) {
        let mut energy = 0.0f64;
        let mut run = 0usize;
        let mut max_run = 0usize;
        let mut pairs: Vec<PairedPosition> = Vec::new();

        for i in 0..seq1.len() {
            let j = i as isize - offset;
            if j < 0 || j >= n2 {
                continue;
            }
            // revcomp(seq2)[j] 对应 seq2[len2-1-j]
            let k = (n2 - 1 - j) as usize;
            let a = seq1[i].to_ascii_uppercase();
            let b = seq2[k].to_ascii_uppercase();
            if dna::can_pair(a, b) {
                energy += dna::pair_energy(a, b).abs();
                pairs.push(PairedPosition {
                    i,
                    j: k,
                    base1: a as char,
                    base2: b as char,
                });
                run += 1;
                max_run = max_run.max(run);
            } else {
                run = 0;
            }
        }

        let weighted = energy + RUN_WEIGHT * max_run as f64;
        if weighted > best_score {
            trace!(offset, weighted, max_run, "new best dimer offset");
            best_score = weighted;
            best = Some(build_alignment(offset, weighted, energy, pairs, max_run, seq1.len(), seq2.len()));
        }
    }

    best
}

/// 自二聚体
pub fn find_self_dimer(seq: &[u8]) -> Option<DimerAlignment> {
    find_dimer(seq, seq)
}

fn build_alignment(
    offset: isize,
    score: f64,
    energy_score: f64,
    paired_positions: Vec<PairedPosition>,
    max_consecutive_run: usize,
    len1: usize,
    len2: usize,
) -> DimerAlignment {
    let tail1 = len1.saturating_sub(dna::TERMINUS_WINDOW);
    let tail2 = len2.saturating_sub(dna::TERMINUS_WINDOW);
    let w = dna::TERMINUS_WINDOW;

    DimerAlignment {
        offset,
        score,
        energy_score,
        involves_5prime_seq1: paired_positions.iter().any(|p| p.i < w),
        involves_3prime_seq1: paired_positions.iter().any(|p| p.i >= tail1),
        involves_5prime_seq2: paired_positions.iter().any(|p| p.j < w),
        involves_3prime_seq2: paired_positions.iter().any(|p| p.j >= tail2),
        paired_positions,
        max_consecutive_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_complement_partner_aligns_at_zero() {
        let d = find_dimer(b"AAAAACCCCC", b"GGGGGTTTTT").expect("dimer");
        assert_eq!(d.offset, 0);
        assert_eq!(d.max_consecutive_run, 10);
        assert_eq!(d.paired_positions.len(), 10);
        assert!((d.energy_score - 19.5).abs() < 1e-9);
        assert!((d.score - 39.5).abs() < 1e-9);
        assert_eq!(d.paired_positions[0], PairedPosition { i: 0, j: 9, base1: 'A', base2: 'T' });
        assert!(d.involves_5prime_seq1 && d.involves_3prime_seq1);
        assert!(d.involves_5prime_seq2 && d.involves_3prime_seq2);
    }

    #[test]
    fn identical_poly_a_has_no_dimer() {
        assert!(find_dimer(b"AAAAAAAAAA", b"AAAAAAAAAA").is_none());
    }

    #[test]
    fn empty_inputs_have_no_dimer() {
        assert!(find_dimer(b"", b"ACGT").is_none());
        assert!(find_dimer(b"ACGT", b"").is_none());
    }

    #[test]
    fn ties_keep_lowest_offset() {
        // 偏移 4..=8 得分均为 14.0
        let d = find_dimer(b"CCCCAAAATTTT", b"AAAAAAAA").expect("dimer");
        assert_eq!(d.offset, 4);
        assert!((d.score - 14.0).abs() < 1e-9);
        let idx: Vec<(usize, usize)> = d.paired_positions.iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(idx, vec![(8, 3), (9, 2), (10, 1), (11, 0)]);
        assert!(d.involves_3prime_seq1);
        assert!(!d.involves_5prime_seq1);
        assert!(d.involves_5prime_seq2);
        assert!(d.involves_3prime_seq2);
    }

    #[test]
    fn search_is_deterministic() {
        let s1 = b"ATGCGTACGTTAGCCGATAGC";
        let s2 = b"GCTATCGGCTAACGTACGCAT";
        let a = find_dimer(s1, s2);
        for _ in 0..5 {
            assert_eq!(find_dimer(s1, s2), a);
        }
    }

    #[test]
    fn palindrome_self_dimer() {
        let d = find_self_dimer(b"GAATTC").expect("dimer");
        assert_eq!(d.offset, 0);
        assert_eq!(d.max_consecutive_run, 6);
        assert!((d.score - 22.8).abs() < 1e-9);
        assert!(d.is_extensible());
    }

    #[test]
    fn lowercase_input_is_accepted() {
        let d = find_dimer(b"acgt", b"ACGT").expect("dimer");
        assert_eq!(d.max_consecutive_run, 4);
        assert_eq!(d.paired_positions[0].base1, 'A');
    }

    #[test]
    fn duplex_lines_mark_pairs() {
        let s1 = b"CCCCAAAATTTT";
        let s2 = b"AAAAAAAA";
        let d = find_dimer(s1, s2).unwrap();
        let [top, mid, bottom] = d.duplex_lines(s1, s2);
        assert_eq!(top, "CCCCAAAATTTT");
        assert_eq!(mid, "        ||||");
        assert_eq!(bottom, "    AAAAAAAA");
    }

    #[test]
    fn duplex_lines_ignore_foreign_sequences() {
        let d = find_dimer(b"CCCCAAAATTTT", b"AAAAAAAA").unwrap();
        let [top, mid, bottom] = d.duplex_lines(b"CC", b"AA");
        assert_eq!(top, "CC");
        assert_eq!(mid, "");
        assert_eq!(bottom, "    AA");
    }

    #[test]
    fn shortest_sequences() {
        // 偏移区间不含上界：3 nt 时为空区间
        assert!(find_dimer(b"GGG", b"CCC").is_none());

        let d = find_dimer(b"GGGG", b"CCCC").expect("dimer");
        assert_eq!(d.offset, 0);
        assert_eq!(d.max_consecutive_run, 4);
        assert!((d.score - 17.6).abs() < 1e-9);
    }
}
