//! Minimal tab-separated VCF codec for normalized records.
//!
//! Only data lines and the `#CHROM` header are interpreted; `##` meta lines are
//! skipped on input. Empty alleles, which plain VCF cannot express, are written
//! as `-` and read back as empty.

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};

use crate::model::{StudyEntry, VariantRecord, VariantType};

const HEADER: &str = "##fileformat=VCFv4.3\n##source=varnorm\n";
const FIXED_COLUMNS: [&str; 8] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];
const EMPTY_ALLELE: &str = "-";
const MISSING: &str = ".";

/// Attribute keys holding the QUAL and FILTER columns.
pub const QUAL_ATTRIBUTE: &str = "QUAL";
/// See [`QUAL_ATTRIBUTE`].
pub const FILTER_ATTRIBUTE: &str = "FILTER";
const END_ATTRIBUTE: &str = "END";
const CALL_ATTRIBUTE: &str = "CALL";
const SECONDARY_ATTRIBUTE: &str = "SECALT";

/// Sample names declared by a `#CHROM` header line.
pub fn parse_header_line(line: &str) -> Result<Vec<String>> {
    let columns: Vec<&str> = line.trim_end().split('\t').collect();
    if columns.len() < FIXED_COLUMNS.len() || columns[0] != FIXED_COLUMNS[0] {
        bail!("not a #CHROM header line: {line}");
    }
    Ok(columns.iter().skip(FIXED_COLUMNS.len() + 1).map(|name| name.to_string()).collect())
}

/// Parse one data line into a record with a single study.
pub fn parse_record(line: &str, samples: &[String], study_id: &str) -> Result<VariantRecord> {
    let columns: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if columns.len() < FIXED_COLUMNS.len() {
        bail!("expected at least {} columns, found {}", FIXED_COLUMNS.len(), columns.len());
    }

    let start: i64 = columns[1]
        .parse()
        .with_context(|| format!("invalid position '{}'", columns[1]))?;
    let reference = decode_allele(columns[3]);

    let mut study = StudyEntry::new(study_id, Vec::<String>::new());
    for (key, column) in [(QUAL_ATTRIBUTE, columns[5]), (FILTER_ATTRIBUTE, columns[6])] {
        if column != MISSING {
            study.file_attributes.insert(key.to_string(), column.to_string());
        }
    }
    if columns[7] != MISSING {
        for entry in columns[7].split(';').filter(|entry| !entry.is_empty()) {
            let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
            study.file_attributes.insert(key.to_string(), value.to_string());
        }
    }

    let end = match study.file_attributes.remove(END_ATTRIBUTE) {
        Some(end) => end
            .parse()
            .with_context(|| format!("invalid END '{end}'"))?,
        None => start + reference.len() as i64 - 1,
    };

    if let Some(format) = columns.get(8) {
        study.format = format.split(':').map(str::to_string).collect();
        for (idx, column) in columns.iter().skip(9).enumerate() {
            let id = samples
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("SAMPLE{}", idx + 1));
            study = study.with_sample(id, column.split(':'));
        }
    }

    let mut record = VariantRecord::with_end(columns[0], start, end, reference, columns[4]);
    for alternate in &mut record.alternates {
        *alternate = decode_allele(alternate);
    }
    record.variant_type = VariantType::infer(&record.reference, record.alternate());
    Ok(record.with_study(study))
}

/// Read every data line of a VCF stream.
pub fn read_vcf<R: BufRead>(reader: R, study_id: &str) -> Result<(Vec<String>, Vec<VariantRecord>)> {
    let mut samples = Vec::new();
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", line_no + 1))?;
        if line.starts_with("##") || line.trim().is_empty() {
            continue;
        }
        if line.starts_with('#') {
            samples = parse_header_line(&line).with_context(|| format!("line {}", line_no + 1))?;
            continue;
        }
        let record = parse_record(&line, &samples, study_id)
            .with_context(|| format!("failed to parse line {}", line_no + 1))?;
        records.push(record);
    }
    Ok((samples, records))
}

/// Write records, first study only, in VCF layout.
pub fn write_vcf<W: Write>(writer: &mut W, samples: &[String], records: &[VariantRecord]) -> Result<()> {
    writer.write_all(HEADER.as_bytes())?;
    let mut header = FIXED_COLUMNS.join("\t");
    if !samples.is_empty() {
        header.push_str("\tFORMAT");
        for sample in samples {
            header.push('\t');
            header.push_str(sample);
        }
    }
    writeln!(writer, "{header}")?;

    for record in records {
        writeln!(writer, "{}", render_record(record, samples)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render records into a VCF string (useful for tests and snapshots).
pub fn render_vcf(samples: &[String], records: &[VariantRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_vcf(&mut buffer, samples, records)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered VCF is not valid UTF-8"))
}

/// One data line, without the trailing newline.
pub fn render_record(record: &VariantRecord, samples: &[String]) -> Result<String> {
    let study = record.study();
    let attribute = |key: &str| study.and_then(|study| study.attribute(key)).unwrap_or(MISSING);

    let mut info = vec![format!("{END_ATTRIBUTE}={}", record.end)];
    if let Some(study) = study {
        info.extend(
            study
                .file_attributes
                .iter()
                .filter(|(key, _)| ![QUAL_ATTRIBUTE, FILTER_ATTRIBUTE, END_ATTRIBUTE].contains(&key.as_str()))
                .map(|(key, value)| {
                    if value.is_empty() {
                        key.clone()
                    } else {
                        format!("{key}={value}")
                    }
                }),
        );
        if let Some(call) = &study.call {
            info.push(format!("{CALL_ATTRIBUTE}={call}"));
        }
        if !study.secondary_alternates.is_empty() {
            let secondaries: Vec<String> = study
                .secondary_alternates
                .iter()
                .map(|alt| {
                    format!(
                        "{}:{}:{}:{}",
                        alt.start,
                        alt.end,
                        encode_allele(&alt.reference),
                        encode_allele(&alt.alternate)
                    )
                })
                .collect();
            info.push(format!("{SECONDARY_ATTRIBUTE}={}", secondaries.join(",")));
        }
    }

    let alternates: Vec<&str> = record.alternates.iter().map(|alt| encode_allele(alt)).collect();
    let mut columns = vec![
        record.chromosome.clone(),
        record.start.to_string(),
        MISSING.to_string(),
        encode_allele(&record.reference).to_string(),
        alternates.join(","),
        attribute(QUAL_ATTRIBUTE).to_string(),
        attribute(FILTER_ATTRIBUTE).to_string(),
        info.join(";"),
    ];

    if !samples.is_empty() {
        let study = study.ok_or_else(|| anyhow!("record {} has no study to render samples from", record.id()))?;
        columns.push(study.format.join(":"));
        for name in samples {
            let sample = study
                .samples
                .iter()
                .find(|sample| &sample.id == name)
                .with_context(|| format!("record {} lacks sample {name}", record.id()))?;
            columns.push(sample.values.join(":"));
        }
    }

    Ok(columns.join("\t"))
}

fn decode_allele(allele: &str) -> String {
    if allele == EMPTY_ALLELE {
        String::new()
    } else {
        allele.to_string()
    }
}

fn encode_allele(allele: &str) -> &str {
    if allele.is_empty() {
        EMPTY_ALLELE
    } else {
        allele
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_LINE: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2";

    #[test]
    fn header_declares_samples() {
        assert_eq!(parse_header_line(HEADER_LINE).unwrap(), vec!["S1", "S2"]);
        assert!(parse_header_line("CHROM\tPOS").is_err());
    }

    #[test]
    fn parses_symbolic_record() {
        let samples = parse_header_line(HEADER_LINE).unwrap();
        let line = "1\t100\t.\tC\t<CN0>\t50\tPASS\tEND=200;CIPOS=-14,50;IMPRECISE\tGT:CN\t0/1:0\t0/0:2";
        let record = parse_record(line, &samples, "study").unwrap();
        assert_eq!((record.start, record.end), (100, 200));
        assert_eq!(record.alternates, vec!["<CN0>"]);

        let study = record.study().unwrap();
        assert_eq!(study.attribute("CIPOS"), Some("-14,50"));
        assert_eq!(study.attribute("IMPRECISE"), Some(""));
        assert_eq!(study.attribute("END"), None);
        assert_eq!(study.sample_value("S2", "CN"), Some("2"));
    }

    #[test]
    fn rendered_line_reads_back() {
        let samples = vec!["S1".to_string()];
        let line = "1\t101\t.\t-\tT\t.\t.\tEND=100\tGT\t0/1";
        let record = parse_record(line, &samples, "study").unwrap();
        assert_eq!(record.reference, "");
        assert_eq!(render_record(&record, &samples).unwrap(), line);
    }

    #[test]
    fn rejects_short_lines() {
        assert!(parse_record("1\t100\t.\tA", &[], "study").is_err());
        assert!(parse_record("1\tX\t.\tA\tT\t.\t.\t.", &[], "study").is_err());
    }
}
