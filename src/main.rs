use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use varnorm::model::{SampleData, StudyEntry};
use varnorm::normalizer::{AlleleLayout, FieldNumber, Genotype};
use varnorm::{vcf, NormalizerConfig, VariantNormalizer};

#[derive(Parser, Debug)]
#[command(name = "varnorm", about = "Normalize variant calls into a canonical minimal representation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize the data lines of a VCF-style file and print the result.
    Normalize {
        /// Input file (`-` for stdin).
        input: PathBuf,
        /// Study identifier attached to every record.
        #[arg(long, default_value = "study")]
        study: String,
        /// Fill uncovered reference spans with reference blocks.
        #[arg(long)]
        reference_blocks: bool,
        /// Decompose MNVs into phased fragments.
        #[arg(long)]
        decompose_mnvs: bool,
        /// Sort alleles of unphased genotypes.
        #[arg(long)]
        normalize_alleles: bool,
        /// Copy number treated as neutral for `<CNn>` alleles.
        #[arg(long, default_value_t = varnorm::normalizer::DEFAULT_BASELINE_COPY_NUMBER)]
        baseline_copy_number: u32,
        /// Normalize records on all cores.
        #[arg(long)]
        parallel: bool,
    },
    /// Show how a genotype and its likelihoods are rewritten for one alternate.
    SplitGt {
        /// Number of alternates in the original call.
        #[arg(long)]
        alternates: usize,
        /// Zero-based alternate that becomes the primary allele.
        #[arg(long)]
        primary: usize,
        /// Genotype, e.g. `1/2`.
        genotype: String,
        /// Optional genotype likelihoods (`Number=G`), comma separated.
        #[arg(long)]
        likelihoods: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            input,
            study,
            reference_blocks,
            decompose_mnvs,
            normalize_alleles,
            baseline_copy_number,
            parallel,
        } => {
            let config = NormalizerConfig::default()
                .with_reference_blocks(reference_blocks)
                .with_mnv_decomposition(decompose_mnvs)
                .with_allele_normalization(normalize_alleles)
                .with_baseline_copy_number(baseline_copy_number);
            run_normalize(input, &study, config, parallel)?
        }
        Commands::SplitGt {
            alternates,
            primary,
            genotype,
            likelihoods,
        } => run_split_gt(alternates, primary, &genotype, likelihoods.as_deref())?,
    }

    Ok(())
}

fn run_normalize(input: PathBuf, study: &str, config: NormalizerConfig, parallel: bool) -> Result<()> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&input).with_context(|| {
            format!("failed to open input file {}", input.display())
        })?))
    };
    let (samples, records) = vcf::read_vcf(reader, study)
        .with_context(|| format!("failed to read records from {}", input.display()))?;

    let normalizer = VariantNormalizer::new(config);
    let outcome = if parallel {
        normalizer.normalize_par(&records)
    } else {
        normalizer.normalize(&records)
    };

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    vcf::write_vcf(&mut writer, &samples, &outcome.records).context("failed to write records")?;

    for failure in &outcome.failures {
        eprintln!("skipped record {} ({}): {}", failure.index + 1, failure.record_id, failure.error);
    }
    Ok(())
}

fn run_split_gt(alternates: usize, primary: usize, genotype: &str, likelihoods: Option<&str>) -> Result<()> {
    if primary >= alternates {
        bail!("primary alternate {primary} out of range for {alternates} alternates");
    }
    let parsed = Genotype::parse(genotype).with_context(|| format!("invalid genotype '{genotype}'"))?;

    let mut study = StudyEntry::new("cli", ["GT"]);
    let mut values = vec![genotype.to_string()];
    if let Some(likelihoods) = likelihoods {
        study.format.push("GL".to_string());
        values.push(likelihoods.to_string());
    }
    study.samples.push(SampleData {
        id: "sample".to_string(),
        values,
    });

    let slots: Vec<usize> = (0..alternates).collect();
    let layout = AlleleLayout::for_primary(primary, &slots);
    let config = NormalizerConfig::default().with_allele_indexed_field("GL", FieldNumber::Genotypes);
    let rewritten = varnorm::normalizer::rewrite_samples(&study, &layout, &config)
        .context("failed to rewrite sample")?;

    let sample = rewritten.first().context("no sample was rewritten")?;

    println!("alleles\t{:?}", layout.target_to_original());
    println!("GT\t{}\t->\t{}", parsed, sample.values[0]);
    if let (Some(before), Some(after)) = (likelihoods, sample.values.get(1)) {
        println!("GL\t{before}\t->\t{after}");
    }
    Ok(())
}
