use serde::{Deserialize, Serialize};

use crate::error::PrimerError;

/// 参考温度（℃）
pub const REFERENCE_TEMP: f64 = 37.0;

/// 单条序列内的碱基对 (i, j)，0 起始，i < j
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasePair {
    pub i: usize,
    pub j: usize,
}

impl BasePair {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    #[inline]
    pub fn span(&self) -> usize {
        self.j.saturating_sub(self.i)
    }

    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.i == pos || self.j == pos
    }
}

impl From<(usize, usize)> for BasePair {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

/// 外部折叠引擎的输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    /// kcal/mol，可能为非有限值
    pub free_energy: f64,
    pub pairs: Vec<BasePair>,
}

impl FoldResult {
    /// 非有限自由能归零
    pub fn sanitized(mut self) -> Self {
        self.free_energy = crate::structure::profile::finite_or_zero(self.free_energy);
        self
    }
}

/// 外部最近邻热力学折叠引擎（本 crate 不实现折叠）
pub trait FoldEngine {
    fn fold(&self, seq: &[u8], temperature: f64) -> FoldResult;
}

/// 窗口自由能函数，供位置能量剖面逐窗口调用
pub trait WindowEnergy {
    fn window_energy(&self, seq: &[u8], temperature: f64) -> f64;
}

impl<F> WindowEnergy for F
where
    F: Fn(&[u8], f64) -> f64,
{
    fn window_energy(&self, seq: &[u8], temperature: f64) -> f64 {
        self(seq, temperature)
    }
}

/// 校验碱基对列表：越界、i >= j、索引重复、交叉（假结）
pub fn validate_pairs(len: usize, pairs: &[BasePair]) -> Result<(), PrimerError> {
    let mut partner: Vec<Option<usize>> = vec![None; len];
    for p in pairs {
        if p.i >= p.j {
            return Err(PrimerError::InvalidPair { i: p.i, j: p.j });
        }
        if p.j >= len {
            return Err(PrimerError::PairOutOfBounds { i: p.i, j: p.j, len });
        }
        for idx in [p.i, p.j] {
            if partner[idx].is_some() {
                return Err(PrimerError::DuplicateIndex(idx));
            }
        }
        partner[p.i] = Some(p.j);
        partner[p.j] = Some(p.i);
    }

    // 栈扫描检查嵌套
    let mut stack: Vec<usize> = Vec::new();
    for (pos, q) in partner.iter().enumerate() {
        match *q {
            Some(j) if j > pos => stack.push(pos),
            Some(i) => {
                if stack.pop() != Some(i) {
                    return Err(PrimerError::CrossingPairs);
                }
            }
            None => {}
        }
    }
    Ok(())
}

/// 解析点括号结构，返回按 5′ 索引排序的碱基对
pub fn parse_dot_bracket(structure: &[u8]) -> Result<Vec<BasePair>, PrimerError> {
    let mut stack: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();
    for (pos, &c) in structure.iter().enumerate() {
        match c {
            b'(' => stack.push(pos),
            b')' => {
                let i = stack.pop().ok_or(PrimerError::UnbalancedBracket(pos))?;
                pairs.push(BasePair::new(i, pos));
            }
            b'.' => {}
            _ => return Err(PrimerError::UnbalancedBracket(pos)),
        }
    }
    if let Some(&open) = stack.last() {
        return Err(PrimerError::UnbalancedBracket(open));
    }
    pairs.sort_unstable();
    Ok(pairs)
}

pub fn to_dot_bracket(len: usize, pairs: &[BasePair]) -> String {
    let mut out = vec![b'.'; len];
    for p in pairs {
        if p.i < p.j && p.j < len {
            out[p.i] = b'(';
            out[p.j] = b')';
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
