#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use varnorm::model::StudyEntry;
use varnorm::VariantRecord;

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("VARNORM_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set VARNORM_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

/// Study `s` with the given format and `(sample, values)` rows.
pub fn study(format: &[&str], samples: &[(&str, &[&str])]) -> StudyEntry {
    samples.iter().fold(
        StudyEntry::new("s", format.iter().copied()),
        |study, (id, values)| study.with_sample(*id, values.iter().copied()),
    )
}

/// Value of `field` for `sample` in the first study.
pub fn value<'a>(record: &'a VariantRecord, sample: &str, field: &str) -> &'a str {
    record
        .study()
        .and_then(|study| study.sample_value(sample, field))
        .unwrap_or_else(|| panic!("{record} has no {field} for {sample}"))
}

/// `start:ref:alt` of every record, empty alleles rendered as-is.
pub fn keys(records: &[VariantRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| format!("{}:{}:{}", record.start, record.reference, record.alternates.join(",")))
        .collect()
}
