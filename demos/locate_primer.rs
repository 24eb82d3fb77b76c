//! 演示如何在 library 模式下使用 primer-align。
//!
//! 运行方式：
//! ```bash
//! cargo run --example locate_primer
//! ```

use primer_align::align::{self, LocateOptions, PrimerDirection};
use primer_align::structure::{self, fold, ProfileOpt};

fn main() {
    // 1. 模板与一对引物
    let template = b"GATTACAGGCTTCAGCCTAGGTACCGATCGTTGACAACGTGCAGTCCATGAAGCTTGCAT";
    let forward = b"GTACCGATCGATGACAACGT"; // 第 10 位错配
    let reverse = b"ATGCAAGCTTCATGGACTGC";
    println!("模板长度: {} bp", template.len());

    // 2. 结合位点定位
    let opts = LocateOptions::default();
    for (name, primer, dir) in [
        ("forward", &forward[..], PrimerDirection::Forward),
        ("reverse", &reverse[..], PrimerDirection::Reverse),
    ] {
        match align::locate_primer(template, primer, dir, &opts) {
            Some(s) => println!(
                "{}: [{}, {}) 方法={} 置信度={:.2}",
                name,
                s.start,
                s.end,
                s.method.as_str(),
                s.confidence
            ),
            None => println!("{}: 未找到", name),
        }
    }

    // 3. 引物间二聚体
    match align::find_dimer(forward, reverse) {
        Some(d) => {
            println!("二聚体: offset={} score={:.2} max_run={}", d.offset, d.score, d.max_consecutive_run);
            for line in d.duplex_lines(forward, reverse) {
                println!("  {}", line);
            }
        }
        None => println!("无二聚体"),
    }

    // 4. 发夹结构（点括号由外部折叠工具给出）
    let hairpin = b"GGGGAAAACCCC";
    let pairs = match fold::parse_dot_bracket(b"((((....))))") {
        Ok(p) => p,
        Err(e) => {
            eprintln!("结构解析失败: {}", e);
            return;
        }
    };
    if let Some(d) = structure::decompose(hairpin, &pairs) {
        println!("环: [{}, {}) {}", d.loop_start, d.loop_end, d.loop_sequence);
    }

    // 5. 位置能量剖面（此处用 GC 计数代替真实热力学引擎）
    let engine = |w: &[u8], _t: f64| -0.8 * w.iter().filter(|&&b| b == b'G' || b == b'C').count() as f64;
    let profile = structure::energy_profile(template, ProfileOpt::default(), &engine);
    let min = profile.iter().copied().fold(f64::INFINITY, f64::min);
    println!("能量剖面: {} 个位置，最低 {:.2} kcal/mol", profile.len(), min);
}
