use serde::Serialize;
use tracing::debug;

use super::fold::BasePair;

/// 3′ 区域：序列最后 10 个位置
pub const THREE_PRIME_REGION: usize = 10;

/// 茎环分解结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureDecomposition {
    /// 按 5′ 索引排序（外到内）
    pub stem_pairs: Vec<BasePair>,
    /// 跨度最小的碱基对
    pub innermost: BasePair,
    /// -1 表示未识别到环
    pub loop_start: isize,
    pub loop_end: isize,
    pub loop_sequence: String,
    pub has_3prime_in_stem: bool,
    pub has_3prime_in_loop: bool,
}

impl StructureDecomposition {
    pub fn has_loop(&self) -> bool {
        self.loop_start >= 0
    }

    pub fn loop_len(&self) -> usize {
        if self.has_loop() {
            (self.loop_end - self.loop_start).max(0) as usize
        } else {
            0
        }
    }
}

/// 将碱基对列表分解为茎 / 环。空列表返回 None。
///
/// 越界或 i >= j 的碱基对被丢弃；假定其余碱基对互不交叉。
pub fn decompose(seq: &[u8], pairs: &[BasePair]) -> Option<StructureDecomposition> {
    let n = seq.len();
    let mut sorted: Vec<BasePair> = pairs
        .iter()
        .copied()
        .filter(|p| {
            let ok = p.i < p.j && p.j < n;
            if !ok {
                debug!(i = p.i, j = p.j, len = n, "dropping invalid base pair");
            }
            ok
        })
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|p| p.i);

    // 对称配对表
    let mut partner: Vec<Option<usize>> = vec![None; n];
    for p in &sorted {
        partner[p.i] = Some(p.j);
        partner[p.j] = Some(p.i);
    }

    let mut innermost = sorted[0];
    for p in &sorted[1..] {
        if p.span() < innermost.span() {
            innermost = *p;
        }
    }

    // 第一个内部不再包含任何碱基对的配对即为环的闭合对
    let mut loop_start: isize = -1;
    let mut loop_end: isize = -1;
    for p in &sorted {
        let encloses_any = (p.i + 1..p.j).any(|k| partner[k].is_some());
        if !encloses_any {
            loop_start = p.i as isize + 1;
            loop_end = p.j as isize;
            break;
        }
    }

    let loop_sequence = if loop_start >= 0 {
        String::from_utf8_lossy(&seq[loop_start as usize..loop_end as usize]).into_owned()
    } else {
        String::new()
    };

    let region_start = n.saturating_sub(THREE_PRIME_REGION);
    let has_3prime_in_stem = sorted.iter().any(|p| p.i >= region_start || p.j >= region_start);
    let has_3prime_in_loop = loop_start >= 0 && loop_start as usize >= region_start;

    Some(StructureDecomposition {
        stem_pairs: sorted,
        innermost,
        loop_start,
        loop_end,
        loop_sequence,
        has_3prime_in_stem,
        has_3prime_in_loop,
    })
}
