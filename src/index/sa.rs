use crate::util::dna;

/// 构建后缀数组（基于倍增法，O(n log n) 排序）。
/// 输入为任意字节文本（模板统一大写后的 ASCII 碱基）。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i32> = text.iter().map(|&b| b as i32).collect();
    let mut tmp: Vec<i32> = vec![0; n];

    let mut k = 1usize;
    loop {
        sa.sort_unstable_by(|&i, &j| {
            let r1 = rank[i];
            let r2 = rank[j];
            if r1 != r2 {
                return r1.cmp(&r2);
            }
            let r1n = if i + k < n { rank[i + k] } else { -1 };
            let r2n = if j + k < n { rank[j + k] } else { -1 };
            r1n.cmp(&r2n)
        });

        tmp[sa[0]] = 0;
        for i in 1..n {
            let a = sa[i - 1];
            let b = sa[i];
            let prev = (rank[a], if a + k < n { rank[a + k] } else { -1 });
            let curr = (rank[b], if b + k < n { rank[b + k] } else { -1 });
            tmp[b] = tmp[a] + i32::from(curr != prev);
        }

        rank.copy_from_slice(&tmp);
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

/// 模板序列的后缀数组索引。
/// 定位器的精确匹配与锚点匹配都通过它枚举出现位置，每次调用只构建一次。
#[derive(Debug, Clone)]
pub struct TemplateIndex {
    text: Vec<u8>,
    sa: Vec<u32>,
}

impl TemplateIndex {
    pub fn new(template: &[u8]) -> Self {
        let text = dna::normalize_seq(template);
        let sa = build_sa(&text);
        Self { text, sa }
    }

    /// 大写后的模板
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// 模式串在 SA 上的区间 [l, r)
    fn interval(&self, pat: &[u8]) -> (usize, usize) {
        let m = pat.len();
        let n = self.text.len();
        let prefix = |p: u32| {
            let p = p as usize;
            &self.text[p..(p + m).min(n)]
        };
        let l = self.sa.partition_point(|&p| prefix(p) < pat);
        let r = self.sa.partition_point(|&p| prefix(p) <= pat);
        (l, r.max(l))
    }

    /// 模式串的全部出现位置（升序）。空模式返回空集。
    pub fn occurrences(&self, pat: &[u8]) -> Vec<usize> {
        if pat.is_empty() || pat.len() > self.text.len() {
            return Vec::new();
        }
        let (l, r) = self.interval(pat);
        let mut pos: Vec<usize> = self.sa[l..r].iter().map(|&p| p as usize).collect();
        pos.sort_unstable();
        pos
    }

    /// 最左出现位置
    pub fn leftmost(&self, pat: &[u8]) -> Option<usize> {
        if pat.is_empty() || pat.len() > self.text.len() {
            return None;
        }
        let (l, r) = self.interval(pat);
        self.sa[l..r].iter().map(|&p| p as usize).min()
    }
}
