//! # primer-align
//!
//! 引物设计中的比对与结构推断核心。
//!
//! 本 crate 提供五个相互独立、无副作用的算法组件：
//!
//! - **二聚体搜索**：在所有偏移上寻找两条单链序列的最佳互补对齐（交叉 / 自二聚体）
//! - **结合位点定位**：六级回退策略定位引物在模板上的结合区间
//! - **茎环分解**：将外部折叠引擎给出的碱基对列表分解为茎 / 环
//! - **位置能量剖面**：逐位置滑动窗口调用外部引擎计算自由能
//! - **配对风险估计**：基于碱基对列表或局部组成的逐位置配对概率
//!
//! 热力学折叠本身不在本 crate 范围内，通过 [`structure::FoldEngine`] 与
//! [`structure::WindowEnergy`] 两个 trait 接入。
//!
//! ## 快速示例
//!
//! ```rust
//! use primer_align::align::{find_dimer, locate_primer, BindingMethod, LocateOptions, PrimerDirection};
//! use primer_align::structure::{decompose, BasePair};
//!
//! // 交叉二聚体
//! let d = find_dimer(b"AAAAACCCCC", b"GGGGGTTTTT").unwrap();
//! assert_eq!(d.max_consecutive_run, 10);
//!
//! // 结合位点
//! let span = locate_primer(b"ATCGATCGGGGCCCATG", b"CCCATG", PrimerDirection::Forward, &LocateOptions::default()).unwrap();
//! assert_eq!((span.start, span.end, span.method), (11, 17, BindingMethod::Exact));
//!
//! // 茎环分解
//! let pairs: Vec<BasePair> = [(0, 11), (1, 10), (2, 9), (3, 8)].into_iter().map(BasePair::from).collect();
//! let s = decompose(b"GGGGAAAACCCC", &pairs).unwrap();
//! assert_eq!(s.loop_sequence, "AAAA");
//! ```
//!
//! ## 模块说明
//!
//! - [`align`] — 二聚体搜索、结合位点定位及其批量版本
//! - [`structure`] — 外部折叠接口、茎环分解、能量剖面、配对风险
//! - [`index`] — 模板后缀数组索引
//! - [`io`] — FASTA 解析
//! - [`util`] — 互补、反向互补、配对能量等工具函数

pub mod align;
pub mod error;
pub mod index;
pub mod io;
pub mod structure;
pub mod util;

pub use error::PrimerError;
