use crate::error::PrimerError;

pub mod decompose;
pub mod fold;
pub mod pairing;
pub mod profile;

pub use decompose::{decompose, StructureDecomposition};
pub use fold::{BasePair, FoldEngine, FoldResult, WindowEnergy, REFERENCE_TEMP};
pub use pairing::{pairing_probability, pairing_profile};
pub use profile::{energy_profile, energy_profile_par, finite_or_zero, ProfileOpt};

/// 调用外部引擎折叠后直接做茎环分解。
///
/// 引擎返回的碱基对先经 [`fold::validate_pairs`] 校验（越界、重复索引、交叉），
/// 不合法时返回错误；自由能非有限时归零。
pub fn decompose_folded<E: FoldEngine + ?Sized>(
    engine: &E,
    seq: &[u8],
    temperature: f64,
) -> Result<(FoldResult, Option<StructureDecomposition>), PrimerError> {
    let folded = engine.fold(seq, temperature).sanitized();
    fold::validate_pairs(seq.len(), &folded.pairs)?;
    let decomposition = decompose(seq, &folded.pairs);
    Ok((folded, decomposition))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHairpin;

    impl FoldEngine for FixedHairpin {
        fn fold(&self, _seq: &[u8], _temperature: f64) -> FoldResult {
            FoldResult {
                free_energy: f64::NEG_INFINITY,
                pairs: vec![(0, 11), (1, 10), (2, 9), (3, 8)]
                    .into_iter()
                    .map(BasePair::from)
                    .collect(),
            }
        }
    }

    struct Pseudoknot;

    impl FoldEngine for Pseudoknot {
        fn fold(&self, _seq: &[u8], _temperature: f64) -> FoldResult {
            FoldResult {
                free_energy: -3.2,
                pairs: vec![BasePair::new(0, 6), BasePair::new(3, 10)],
            }
        }
    }

    #[test]
    fn decompose_folded_sanitizes_and_decomposes() {
        let (folded, d) = decompose_folded(&FixedHairpin, b"GGGGAAAACCCC", REFERENCE_TEMP).unwrap();
        assert_eq!(folded.free_energy, 0.0);
        let d = d.expect("structure");
        assert_eq!(d.loop_sequence, "AAAA");
    }

    #[test]
    fn decompose_folded_rejects_invalid_engine_pairs() {
        assert_eq!(
            decompose_folded(&Pseudoknot, b"GGGGAAAACCCC", REFERENCE_TEMP),
            Err(PrimerError::CrossingPairs)
        );
        // 引擎给出的配对超出序列长度
        assert_eq!(
            decompose_folded(&FixedHairpin, b"GGGGAAAA", REFERENCE_TEMP),
            Err(PrimerError::PairOutOfBounds { i: 0, j: 11, len: 8 })
        );
    }
}
