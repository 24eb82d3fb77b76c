use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use primer_align::align::{self, DimerAlignment, LocateOptions, Oligo, PrimerDirection, ScreenOpt};
use primer_align::error::PrimerError;
use primer_align::io::fasta;
use primer_align::structure::{self, fold, StructureDecomposition};
use primer_align::util::dna;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "primer-align",
    author,
    version,
    about = "Primer dimer search, binding-site location and hairpin decomposition",
    arg_required_else_help = true
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the best cross-dimer alignment (self-dimer if SEQ2 is omitted)
    Dimer {
        /// First primer (5'->3')
        seq1: String,
        /// Second primer (5'->3')
        seq2: Option<String>,
    },
    /// Screen every primer pair in a FASTA file for dimers
    Screen {
        /// Primer set FASTA file
        primers: PathBuf,
        #[arg(short = 't', long = "threads", default_value_t = 0)]
        threads: usize,
        /// Only report alignments with at least this many consecutive pairs
        #[arg(long = "min-run", default_value_t = 4)]
        min_run: usize,
        /// Skip self-dimers
        #[arg(long = "no-self")]
        no_self: bool,
    },
    /// Locate a primer's binding span on a template
    Locate {
        /// Template sequence or FASTA file (first record is used)
        template: String,
        /// Primer sequence (5'->3')
        primer: String,
        /// Treat the primer as a reverse primer
        #[arg(long)]
        reverse: bool,
        /// Known binding span, trusted as given
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        hint: Option<Vec<usize>>,
        /// Mutation position on the template (used with --mutagenesis)
        #[arg(long = "mutation-pos")]
        mutation_pos: Option<usize>,
        /// Primer is a site-directed mutagenesis primer
        #[arg(long)]
        mutagenesis: bool,
    },
    /// Decompose a dot-bracket structure into stem and loop
    Structure {
        /// Sequence (5'->3')
        seq: String,
        /// Dot-bracket structure of the same length
        structure: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("primer_align=debug,info")
    } else {
        EnvFilter::new("primer_align=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Dimer { seq1, seq2 } => run_dimer(&seq1, seq2.as_deref(), cli.format),
        Commands::Screen {
            primers,
            threads,
            min_run,
            no_self,
        } => {
            let opt = ScreenOpt {
                threads,
                min_run,
                include_self: !no_self,
            };
            run_screen(&primers, opt, cli.format)
        }
        Commands::Locate {
            template,
            primer,
            reverse,
            hint,
            mutation_pos,
            mutagenesis,
        } => {
            let opts = LocateOptions {
                position_hint: hint.map(|h| (h[0], h[1])),
                mutation_position: mutation_pos,
                is_mutagenesis: mutagenesis,
            };
            let direction = if reverse {
                PrimerDirection::Reverse
            } else {
                PrimerDirection::Forward
            };
            run_locate(&template, &primer, direction, &opts, cli.format)
        }
        Commands::Structure { seq, structure } => run_structure(&seq, &structure, cli.format),
    }
}

fn checked(label: &str, seq: &[u8]) -> Result<Vec<u8>> {
    dna::validate_seq(seq).with_context(|| format!("invalid {}", label))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_dimer(d: &DimerAlignment, seq1: &[u8], seq2: &[u8]) {
    println!("offset: {}", d.offset);
    println!("score: {:.2}", d.score);
    println!("energy: {:.2}", d.energy_score);
    println!("max_run: {}", d.max_consecutive_run);
    println!(
        "termini: seq1 5'={} 3'={} | seq2 5'={} 3'={}",
        d.involves_5prime_seq1, d.involves_3prime_seq1, d.involves_5prime_seq2, d.involves_3prime_seq2
    );
    let [top, mid, bottom] = d.duplex_lines(seq1, seq2);
    println!("5' {} 3'", top);
    println!("   {}", mid);
    println!("3' {} 5'", bottom);
}

fn run_dimer(seq1: &str, seq2: Option<&str>, format: OutputFormat) -> Result<()> {
    let s1 = checked("SEQ1", seq1.as_bytes())?;
    let s2 = match seq2 {
        Some(s) => checked("SEQ2", s.as_bytes())?,
        None => s1.clone(),
    };
    let result = align::find_dimer(&s1, &s2);

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => match &result {
            Some(d) => print_dimer(d, &s1, &s2),
            None => println!("no dimer"),
        },
    }
    Ok(())
}

#[derive(Serialize)]
struct ScreenReport<'a> {
    generated_at: String,
    source: String,
    primers: usize,
    options: ScreenOpt,
    hits: &'a [align::DimerHit],
}

fn run_screen(path: &std::path::Path, opt: ScreenOpt, format: OutputFormat) -> Result<()> {
    let records = fasta::load_records(path)?;
    if records.is_empty() {
        anyhow::bail!("FASTA file '{}' contains no sequences", path.display());
    }
    let mut primers: Vec<Oligo> = Vec::with_capacity(records.len());
    for rec in records {
        let seq = checked(&format!("primer '{}'", rec.id), &rec.seq)?;
        primers.push(Oligo::new(rec.id, seq));
    }

    let hits = align::screen_dimers(&primers, &opt)?;

    match format {
        OutputFormat::Json => print_json(&ScreenReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: path.display().to_string(),
            primers: primers.len(),
            options: opt,
            hits: &hits,
        })?,
        OutputFormat::Text => {
            println!("primer1\tprimer2\toffset\tscore\tmax_run\t3prime");
            for h in &hits {
                println!(
                    "{}\t{}\t{}\t{:.2}\t{}\t{}",
                    h.primer1,
                    h.primer2,
                    h.alignment.offset,
                    h.alignment.score,
                    h.alignment.max_consecutive_run,
                    h.alignment.is_extensible()
                );
            }
        }
    }
    Ok(())
}

fn run_locate(
    template: &str,
    primer: &str,
    direction: PrimerDirection,
    opts: &LocateOptions,
    format: OutputFormat,
) -> Result<()> {
    let rec = fasta::sequence_or_file(template)?;
    let template = checked("template", &rec.seq)?;
    let primer = checked("primer", primer.as_bytes())?;

    let span = align::locate_primer(&template, &primer, direction, opts);

    match format {
        OutputFormat::Json => print_json(&span)?,
        OutputFormat::Text => match span {
            Some(s) => println!(
                "{}\t{}\t{}\t{:.3}\t{}",
                s.start,
                s.end,
                s.match_length,
                s.confidence,
                s.method.as_str()
            ),
            None => println!("not found"),
        },
    }
    Ok(())
}

#[derive(Serialize)]
struct StructureReport {
    dot_bracket: String,
    decomposition: Option<StructureDecomposition>,
    pairing_probability: Vec<f64>,
}

fn run_structure(seq: &str, dot_bracket: &str, format: OutputFormat) -> Result<()> {
    let seq = checked("sequence", seq.as_bytes())?;
    if dot_bracket.len() != seq.len() {
        return Err(PrimerError::LengthMismatch {
            seq: seq.len(),
            structure: dot_bracket.len(),
        }
        .into());
    }
    let pairs = fold::parse_dot_bracket(dot_bracket.as_bytes()).context("invalid structure")?;

    let report = StructureReport {
        dot_bracket: fold::to_dot_bracket(seq.len(), &pairs),
        decomposition: structure::decompose(&seq, &pairs),
        pairing_probability: structure::pairing_profile(&seq, &pairs),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("{}", String::from_utf8_lossy(&seq));
            println!("{}", report.dot_bracket);
            match &report.decomposition {
                Some(d) => {
                    println!("stem_pairs: {}", d.stem_pairs.len());
                    if d.has_loop() {
                        println!("loop: [{}, {}) {}", d.loop_start, d.loop_end, d.loop_sequence);
                    } else {
                        println!("loop: none");
                    }
                    println!("3prime_in_stem: {}", d.has_3prime_in_stem);
                    println!("3prime_in_loop: {}", d.has_3prime_in_loop);
                }
                None => println!("no structure"),
            }
            let probs: Vec<String> = report
                .pairing_probability
                .iter()
                .map(|p| format!("{:.2}", p))
                .collect();
            println!("pairing: {}", probs.join(" "));
        }
    }
    Ok(())
}
