use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

/// 逐条读取 FASTA；序列统一大写，空白与 ';' 注释行被忽略
pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
        }
        Ok(n > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done && self.peek_header.is_none() {
            return Ok(None);
        }

        let header = match self.peek_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    return Ok(None);
                }
                if let Some(rest) = self.buf.strip_prefix('>') {
                    break rest.trim().to_string();
                }
            },
        };

        let (id, desc) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => {
                let rest = rest.trim();
                (id.to_string(), (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (header, None),
        };

        let mut seq: Vec<u8> = Vec::new();
        while self.read_line()? {
            if let Some(rest) = self.buf.strip_prefix('>') {
                self.peek_header = Some(rest.trim().to_string());
                break;
            }
            if self.buf.starts_with(';') {
                continue;
            }
            seq.extend(
                self.buf
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }

    pub fn read_all(mut self) -> Result<Vec<FastaRecord>> {
        let mut out = Vec::new();
        while let Some(rec) = self.next_record()? {
            out.push(rec);
        }
        Ok(out)
    }
}

/// 读取整个 FASTA 文件
pub fn load_records(path: &Path) -> Result<Vec<FastaRecord>> {
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open FASTA '{}'", path.display()))?;
    FastaReader::new(std::io::BufReader::new(fh))
        .read_all()
        .with_context(|| format!("cannot read FASTA '{}'", path.display()))
}

/// 命令行序列参数：存在同名文件时取其第一条记录，否则视为字面序列
pub fn sequence_or_file(arg: &str) -> Result<FastaRecord> {
    let path = Path::new(arg);
    if path.is_file() {
        let mut records = load_records(path)?;
        if records.is_empty() {
            anyhow::bail!("FASTA file '{}' contains no sequences", arg);
        }
        return Ok(records.swap_remove(0));
    }
    Ok(FastaRecord {
        id: "input".to_string(),
        desc: None,
        seq: arg.trim().as_bytes().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_primer_set() {
        let data = b">fwd_1 forward primer\nacgtAC\nGT\n>rev_1\nTTTT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "fwd_1");
        assert_eq!(r1.desc.as_deref(), Some("forward primer"));
        assert_eq!(r1.seq, b"ACGTACGT");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "rev_1");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"TTTT");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_with_crlf_comments_and_blank_lines() {
        let data = b"\n\n>tpl desc\r\n;comment line\r\nAC g t\r\n acgt\r\n>p2 \r\n GG \r\n";
        let recs = FastaReader::new(Cursor::new(&data[..])).read_all().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, "tpl");
        assert_eq!(recs[0].seq, b"ACGTACGT");
        assert_eq!(recs[1].id, "p2");
        assert_eq!(recs[1].desc, None);
        assert_eq!(recs[1].seq, b"GG");
    }

    #[test]
    fn header_without_sequence() {
        let recs = FastaReader::new(Cursor::new(&b">empty\n>next\nA\n"[..])).read_all().unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs[0].seq.is_empty());
        assert_eq!(recs[1].seq, b"A");
    }

    #[test]
    fn literal_sequence_argument() {
        let rec = sequence_or_file("ACGTACGTNOTAFILE").unwrap();
        assert_eq!(rec.id, "input");
        assert_eq!(rec.seq, b"ACGTACGTNOTAFILE");
    }
}
