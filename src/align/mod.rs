use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::index::TemplateIndex;
use crate::io::fasta::FastaRecord;

pub mod dimer;
pub mod locate;

pub use dimer::{find_dimer, find_self_dimer, DimerAlignment, PairedPosition};
pub use locate::{locate_primer, locate_primer_indexed, BindingMethod, BindingSpan, LocateOptions, PrimerDirection};

/// 带名称的寡核苷酸
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oligo {
    pub name: String,
    pub seq: Vec<u8>,
}

impl Oligo {
    pub fn new(name: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
        }
    }
}

impl From<FastaRecord> for Oligo {
    fn from(rec: FastaRecord) -> Self {
        Self {
            name: rec.id,
            seq: rec.seq,
        }
    }
}

/// 批量二聚体筛查参数
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenOpt {
    /// 0 表示使用 rayon 默认线程数
    pub threads: usize,
    /// 最长连续配对低于该值的结果不报告
    pub min_run: usize,
    /// 是否包含自二聚体
    pub include_self: bool,
}

impl Default for ScreenOpt {
    fn default() -> Self {
        Self {
            threads: 0,
            min_run: 4,
            include_self: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DimerHit {
    pub primer1: String,
    pub primer2: String,
    pub alignment: DimerAlignment,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateHit {
    pub primer: String,
    pub span: Option<BindingSpan>,
}

/// 在指定线程数的局部线程池中执行；threads == 0 时直接使用全局池
fn run_in_pool<T, F>(threads: usize, f: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if threads == 0 {
        return Ok(f());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool with {} threads: {}", threads, e))?;
    Ok(pool.install(f))
}

/// 两两筛查引物组内的交叉二聚体（可选自二聚体）。
/// 结果按得分降序；同分保持输入顺序，与线程数无关。
pub fn screen_dimers(primers: &[Oligo], opt: &ScreenOpt) -> Result<Vec<DimerHit>> {
    let mut jobs: Vec<(usize, usize)> = Vec::new();
    for a in 0..primers.len() {
        let first = if opt.include_self { a } else { a + 1 };
        for b in first..primers.len() {
            jobs.push((a, b));
        }
    }

    let mut hits: Vec<DimerHit> = run_in_pool(opt.threads, || {
        jobs.par_iter()
            .filter_map(|&(a, b)| {
                let (p1, p2) = (&primers[a], &primers[b]);
                find_dimer(&p1.seq, &p2.seq)
                    .filter(|d| d.max_consecutive_run >= opt.min_run)
                    .map(|alignment| DimerHit {
                        primer1: p1.name.clone(),
                        primer2: p2.name.clone(),
                        alignment,
                    })
            })
            .collect()
    })?;

    hits.sort_by(|x, y| y.alignment.score.total_cmp(&x.alignment.score));
    Ok(hits)
}

/// 在同一模板上定位多条引物，输出顺序与输入一致
pub fn locate_all(
    template: &[u8],
    primers: &[Oligo],
    direction: PrimerDirection,
    opts: &LocateOptions,
    threads: usize,
) -> Result<Vec<LocateHit>> {
    let index = TemplateIndex::new(template);
    run_in_pool(threads, || {
        primers
            .par_iter()
            .map(|p| LocateHit {
                primer: p.name.clone(),
                span: locate_primer_indexed(&index, &p.seq, direction, opts),
            })
            .collect()
    })
}
