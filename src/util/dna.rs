use crate::error::PrimerError;

/// 3′ 端判定窗口（二聚体末端标记使用）
pub const TERMINUS_WINDOW: usize = 5;

/// 将序列统一为大写，U 视为 T；其他字符原样保留（大写）
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        let up = b.to_ascii_uppercase();
        out.push(if up == b'U' { b'T' } else { up });
    }
    out
}

/// 规范化并校验序列：仅允许 {A,C,G,T}，且非空
pub fn validate_seq(seq: &[u8]) -> Result<Vec<u8>, PrimerError> {
    if seq.is_empty() {
        return Err(PrimerError::EmptySequence);
    }
    let norm = normalize_seq(seq);
    if let Some((position, &base)) = norm
        .iter()
        .enumerate()
        .find(|(_, b)| !matches!(**b, b'A' | b'C' | b'G' | b'T'))
    {
        return Err(PrimerError::InvalidBase {
            position,
            base: base as char,
        });
    }
    Ok(norm)
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}

/// Watson–Crick 配对（A↔T, G↔C），不含 G·T 摆动配对
#[inline]
pub fn can_pair(a: u8, b: u8) -> bool {
    matches!(
        (a.to_ascii_uppercase(), b.to_ascii_uppercase()),
        (b'A', b'T') | (b'T', b'A') | (b'G', b'C') | (b'C', b'G')
    )
}

/// 碱基对能量幅值（kcal/mol），按配对类型对称
pub fn pair_energy(a: u8, b: u8) -> f64 {
    match (a.to_ascii_uppercase(), b.to_ascii_uppercase()) {
        (b'G', b'C') | (b'C', b'G') => 2.4,
        (b'A', b'T') | (b'T', b'A') => 1.5,
        (b'G', b'T') | (b'T', b'G') => 0.5,
        (b'A', b'A') | (b'T', b'T') | (b'G', b'G') | (b'C', b'C') => 0.5,
        // 嘌呤–嘧啶错配及其他
        _ => 0.0,
    }
}

#[inline]
pub fn is_gc(b: u8) -> bool {
    matches!(b.to_ascii_uppercase(), b'G' | b'C')
}

pub fn gc_count(seq: &[u8]) -> usize {
    seq.iter().filter(|&&b| is_gc(b)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

    #[test]
    fn can_pair_is_symmetric() {
        for &a in &BASES {
            for &b in &BASES {
                assert_eq!(can_pair(a, b), can_pair(b, a), "{}{}", a as char, b as char);
            }
        }
    }

    #[test]
    fn can_pair_rejects_wobble_and_identity() {
        assert!(can_pair(b'A', b'T'));
        assert!(can_pair(b'c', b'g'));
        assert!(!can_pair(b'G', b'T'));
        assert!(!can_pair(b'A', b'A'));
    }

    #[test]
    fn pair_energy_table() {
        assert_eq!(pair_energy(b'G', b'C'), 2.4);
        assert_eq!(pair_energy(b'T', b'A'), 1.5);
        assert_eq!(pair_energy(b'T', b'G'), 0.5);
        assert_eq!(pair_energy(b'C', b'C'), 0.5);
        assert_eq!(pair_energy(b'G', b'A'), 0.0);
        assert_eq!(pair_energy(b'C', b'T'), 0.0);
        for &a in &BASES {
            for &b in &BASES {
                assert_eq!(pair_energy(a, b), pair_energy(b, a));
            }
        }
    }

    #[test]
    fn revcomp_basic() {
        assert_eq!(revcomp(b"GGGGGTTTTT"), b"AAAAACCCCC");
        assert_eq!(revcomp(b""), b"");
    }

    #[test]
    fn validate_seq_normalizes_and_rejects() {
        assert_eq!(validate_seq(b"acgu").unwrap(), b"ACGT");
        assert!(matches!(validate_seq(b""), Err(PrimerError::EmptySequence)));
        match validate_seq(b"ACNT") {
            Err(PrimerError::InvalidBase { position, base }) => {
                assert_eq!(position, 2);
                assert_eq!(base, 'N');
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn gc_counting() {
        assert_eq!(gc_count(b"GGAATTCC"), 4);
        assert_eq!(gc_count(b"gcAT"), 2);
    }
}
