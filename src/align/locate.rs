use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::index::TemplateIndex;
use crate::util::dna;

/// 双锚点距离容差
const ANCHOR_TOLERANCE: isize = 2;
/// 锚点最短长度下限
const MIN_ANCHOR_LEN: usize = 8;
/// 3′ 近端区域长度
const THREE_PRIME_LEN: usize = 10;
/// 3′ 近端区域最少匹配数
const MIN_THREE_PRIME_MATCHES: usize = 7;
/// 反向引物：估计 3′ 端位于突变位点上游的距离
const REVERSE_MUTATION_OFFSET: isize = 10;
const MUTATION_ANCHOR_CONFIDENCE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimerDirection {
    #[default]
    Forward,
    /// 以反向互补序列在模板上搜索
    Reverse,
}

/// 定位提示参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateOptions {
    /// 调用方已知的精确区间 [start, end)，无条件采用（仅截断到模板长度内）
    pub position_hint: Option<(usize, usize)>,
    /// 突变位点的模板坐标；需同时设置 `is_mutagenesis`
    pub mutation_position: Option<usize>,
    /// 定点突变引物：启用按突变位点估计结合区间
    pub is_mutagenesis: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingMethod {
    #[serde(rename = "explicit")]
    Explicit,
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "mutation_anchor")]
    MutationAnchor,
    #[serde(rename = "dual_anchor")]
    DualAnchor,
    #[serde(rename = "anchor_3prime")]
    Anchor3Prime,
    #[serde(rename = "weighted_alignment")]
    WeightedAlignment,
}

impl BindingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Exact => "exact",
            Self::MutationAnchor => "mutation_anchor",
            Self::DualAnchor => "dual_anchor",
            Self::Anchor3Prime => "anchor_3prime",
            Self::WeightedAlignment => "weighted_alignment",
        }
    }
}

/// 引物在模板上的结合区间 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BindingSpan {
    pub start: usize,
    pub end: usize,
    pub match_length: usize,
    /// [0, 1]
    pub confidence: f64,
    pub method: BindingMethod,
}

impl BindingSpan {
    fn new(start: usize, end: usize, confidence: f64, method: BindingMethod) -> Self {
        Self {
            start,
            end,
            match_length: end - start,
            confidence: confidence.clamp(0.0, 1.0),
            method,
        }
    }
}

/// 各策略共享的只读上下文；未传入预建索引时按需构建一次
struct LocateContext<'a> {
    template: &'a [u8],
    search: &'a [u8],
    direction: PrimerDirection,
    opts: &'a LocateOptions,
    prebuilt: Option<&'a TemplateIndex>,
    index: OnceCell<TemplateIndex>,
}

impl LocateContext<'_> {
    fn index(&self) -> &TemplateIndex {
        match self.prebuilt {
            Some(index) => index,
            None => self.index.get_or_init(|| TemplateIndex::new(self.template)),
        }
    }

    fn min_anchor(&self) -> usize {
        MIN_ANCHOR_LEN.max(self.search.len() * 2 / 5)
    }
}

type Strategy = fn(&LocateContext<'_>) -> Option<BindingSpan>;

/// 严格按优先级排列：前一级成功即返回
const STRATEGIES: [(BindingMethod, Strategy); 6] = [
    (BindingMethod::Explicit, explicit_hint),
    (BindingMethod::Exact, exact_match),
    (BindingMethod::MutationAnchor, mutation_anchor),
    (BindingMethod::DualAnchor, dual_anchor),
    (BindingMethod::Anchor3Prime, anchor_3prime),
    (BindingMethod::WeightedAlignment, weighted_alignment),
];

/// 在模板上定位引物结合区间，六级回退搜索。
///
/// 反向引物以其反向互补序列搜索。空模板或空引物、以及所有策略均失败时返回 None。
pub fn locate_primer(
    template: &[u8],
    primer: &[u8],
    direction: PrimerDirection,
    opts: &LocateOptions,
) -> Option<BindingSpan> {
    run_strategies(template, None, primer, direction, opts)
}

/// 同 [`locate_primer`]，复用已构建的模板索引（多条引物共用同一模板时）
pub fn locate_primer_indexed(
    index: &TemplateIndex,
    primer: &[u8],
    direction: PrimerDirection,
    opts: &LocateOptions,
) -> Option<BindingSpan> {
    run_strategies(index.text(), Some(index), primer, direction, opts)
}

fn run_strategies(
    template: &[u8],
    prebuilt: Option<&TemplateIndex>,
    primer: &[u8],
    direction: PrimerDirection,
    opts: &LocateOptions,
) -> Option<BindingSpan> {
    if template.is_empty() || primer.is_empty() {
        return None;
    }
    let norm = dna::normalize_seq(primer);
    let search = match direction {
        PrimerDirection::Forward => norm,
        PrimerDirection::Reverse => dna::revcomp(&norm),
    };
    let ctx = LocateContext {
        template,
        search: &search,
        direction,
        opts,
        prebuilt,
        index: OnceCell::new(),
    };

    for (method, strategy) in STRATEGIES.iter() {
        trace!(method = method.as_str(), "trying binding strategy");
        if let Some(span) = strategy(&ctx) {
            debug!(
                method = span.method.as_str(),
                start = span.start,
                end = span.end,
                confidence = span.confidence,
                "primer located"
            );
            return Some(span);
        }
    }
    debug!(primer_len = primer.len(), template_len = template.len(), "primer not found");
    None
}

fn explicit_hint(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    let (start, end) = ctx.opts.position_hint?;
    let end = end.min(ctx.template.len());
    let start = start.min(end);
    Some(BindingSpan::new(start, end, 1.0, BindingMethod::Explicit))
}

fn exact_match(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    let pos = ctx.index().leftmost(ctx.search)?;
    Some(BindingSpan::new(pos, pos + ctx.search.len(), 1.0, BindingMethod::Exact))
}

fn mutation_anchor(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    if !ctx.opts.is_mutagenesis {
        return None;
    }
    let mutation = ctx.opts.mutation_position? as isize;
    let len = ctx.search.len();
    let tlen = ctx.template.len();

    let estimated_start = match ctx.direction {
        // 突变位点落在引物 5′ 端起约 40% 处
        PrimerDirection::Forward => mutation - (len * 2 / 5) as isize,
        PrimerDirection::Reverse => mutation - REVERSE_MUTATION_OFFSET - len as isize,
    };
    let max_start = tlen.saturating_sub(len) as isize;
    let start = estimated_start.clamp(0, max_start) as usize;
    let end = (start + len).min(tlen);
    Some(BindingSpan::new(start, end, MUTATION_ANCHOR_CONFIDENCE, BindingMethod::MutationAnchor))
}

fn dual_anchor(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    let search = ctx.search;
    let len = search.len();
    let index = ctx.index();

    for anchor in (ctx.min_anchor()..=len / 2).rev() {
        let five = index.occurrences(&search[..anchor]);
        if five.is_empty() {
            continue;
        }
        let three = index.occurrences(&search[len - anchor..]);
        let expected = (len - anchor) as isize;

        for &p5 in &five {
            for &p3 in &three {
                let distance = p3 as isize - p5 as isize;
                if (distance - expected).abs() <= ANCHOR_TOLERANCE {
                    let confidence = 2.0 * anchor as f64 / len as f64;
                    return Some(BindingSpan::new(p5, p3 + anchor, confidence, BindingMethod::DualAnchor));
                }
            }
        }
    }
    None
}

fn anchor_3prime(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    let search = ctx.search;
    let len = search.len();
    let index = ctx.index();

    for anchor in (ctx.min_anchor()..len).rev() {
        if let Some(pos) = index.leftmost(&search[len - anchor..]) {
            let start = pos.saturating_sub(len - anchor);
            let confidence = anchor as f64 / len as f64;
            return Some(BindingSpan::new(start, pos + anchor, confidence, BindingMethod::Anchor3Prime));
        }
    }
    None
}

fn weighted_alignment(ctx: &LocateContext<'_>) -> Option<BindingSpan> {
    let search = ctx.search;
    let len = search.len();
    let text = ctx.index().text();
    if len > text.len() {
        return None;
    }
    let three_prime_from = len.saturating_sub(THREE_PRIME_LEN);

    let mut best: Option<(usize, usize)> = None;
    for pos in 0..=text.len() - len {
        let mut score = 0usize;
        let mut three_prime_matches = 0usize;
        for (k, (&t, &s)) in text[pos..pos + len].iter().zip(search).enumerate() {
            if t != s {
                continue;
            }
            if k >= three_prime_from {
                score += 2;
                three_prime_matches += 1;
            } else {
                score += 1;
            }
        }
        if three_prime_matches < MIN_THREE_PRIME_MATCHES {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
        }
    }

    let (pos, score) = best?;
    let confidence = score as f64 / (len + THREE_PRIME_LEN) as f64;
    Some(BindingSpan::new(pos, pos + len, confidence, BindingMethod::WeightedAlignment))
}
