use crate::domain::model::{
    Combo, FilterName, FilterOutcome, OutputFormat, ScoredCombo, StageCount, VTracMatch,
};
use crate::utils::error::{Result, TrapError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// One output table row; field names are the column headers.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Combo")]
    pub combo: Combo,
    #[serde(rename = "F1: Consecutive ≥4")]
    pub consecutive: bool,
    #[serde(rename = "F2: Spread < 4")]
    pub spread: bool,
    #[serde(rename = "F3: All 0–5")]
    pub all_low: bool,
    #[serde(rename = "F4: 4 in ±2 Range")]
    pub window: bool,
    #[serde(rename = "F5: Both V-Tracs Match")]
    pub vtrac_both: bool,
    #[serde(rename = "Hot Digit Match")]
    pub hot_match: bool,
    #[serde(rename = "Cold Digit Match")]
    pub cold_match: bool,
    #[serde(rename = "Due Digit Match")]
    pub due_match: bool,
    #[serde(rename = "Combo Sum")]
    pub combo_sum: u8,
    #[serde(rename = "Seed Sum")]
    pub seed_sum: u8,
    #[serde(rename = "V-Trac Match Category")]
    pub vtrac: VTracMatch,
    #[serde(rename = "Trap V3 Score")]
    pub trap_score: u8,
}

impl From<&ScoredCombo> for ExportRow {
    fn from(scored: &ScoredCombo) -> Self {
        let flags = &scored.flags;
        Self {
            combo: scored.combo,
            consecutive: flags.consecutive,
            spread: flags.spread,
            all_low: flags.all_low,
            window: flags.window,
            vtrac_both: flags.vtrac_both,
            hot_match: flags.hot_match,
            cold_match: flags.cold_match,
            due_match: flags.due_match,
            combo_sum: scored.combo_sum,
            seed_sum: scored.seed_sum,
            vtrac: scored.vtrac,
            trap_score: scored.trap_score,
        }
    }
}

pub const COLUMNS: [&str; 13] = [
    "Combo",
    "F1: Consecutive ≥4",
    "F2: Spread < 4",
    "F3: All 0–5",
    "F4: 4 in ±2 Range",
    "F5: Both V-Tracs Match",
    "Hot Digit Match",
    "Cold Digit Match",
    "Due Digit Match",
    "Combo Sum",
    "Seed Sum",
    "V-Trac Match Category",
    "Trap V3 Score",
];

fn render_delimited(rows: &[ScoredCombo], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // 空結果也要有表頭
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(ExportRow::from(row))?;
    }

    let bytes = writer.into_inner().map_err(|e| TrapError::ProcessingError {
        message: format!("Failed to flush table writer: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| TrapError::ProcessingError {
        message: format!("Table output is not valid UTF-8: {}", e),
    })
}

pub fn render_csv(rows: &[ScoredCombo]) -> Result<String> {
    render_delimited(rows, b',')
}

pub fn render_tsv(rows: &[ScoredCombo]) -> Result<String> {
    render_delimited(rows, b'\t')
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub strategy: &'static str,
    pub stages: Vec<StageCount>,
    pub selected_filters: Vec<FilterName>,
    pub threshold: u8,
    pub initial_count: usize,
    pub remaining_count: usize,
    pub combos: Vec<ExportRow>,
}

impl From<&FilterOutcome> for RunReport {
    fn from(outcome: &FilterOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            strategy: outcome.report.strategy,
            stages: outcome.report.stages.clone(),
            selected_filters: outcome.selected.clone(),
            threshold: outcome.threshold,
            initial_count: outcome.initial_count,
            remaining_count: outcome.remaining_count,
            combos: outcome.combos.iter().map(ExportRow::from).collect(),
        }
    }
}

pub fn render_json(outcome: &FilterOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(&RunReport::from(outcome))?)
}

pub fn render(format: OutputFormat, outcome: &FilterOutcome) -> Result<String> {
    match format {
        OutputFormat::Csv => render_csv(&outcome.combos),
        OutputFormat::Tsv => render_tsv(&outcome.combos),
        OutputFormat::Json => render_json(outcome),
    }
}

/// Bundles (filename, contents) pairs into one ZIP archive.
pub fn bundle_zip(files: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(contents.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Annotator;
    use crate::domain::model::{DigitPools, DigitSet, GenerationReport, TrapInputs};

    fn outcome(combos: &[&str]) -> FilterOutcome {
        let annotator = Annotator::new(TrapInputs {
            seed: "13579".parse().unwrap(),
            pools: DigitPools {
                hot: DigitSet::from_digits([0, 5, 9]),
                cold: DigitSet::from_digits([2, 3, 7]),
                due: DigitSet::from_digits([1, 4]),
            },
        });
        let rows: Vec<ScoredCombo> = combos
            .iter()
            .map(|c| annotator.annotate(c.parse().unwrap()))
            .collect();
        FilterOutcome {
            initial_count: rows.len(),
            remaining_count: rows.len(),
            combos: rows,
            selected: vec![FilterName::HotMatch],
            threshold: 0,
            report: GenerationReport::new("test"),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = render_csv(&outcome(&["00007", "13579"]).combos).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], COLUMNS.join(","));
        assert!(lines[1].starts_with("00007,"));
        assert!(lines[1].contains("Both V-Tracs Match"));
        assert!(lines[2].starts_with("13579,"));
        // seed and combo sums are both 25 -> {3,1}
        assert!(lines[2].ends_with(",25,25,Both V-Tracs Match,5"));
    }

    #[test]
    fn test_empty_result_still_has_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let tsv = render_tsv(&outcome(&["01234"]).combos).unwrap();
        let row = tsv.lines().nth(1).unwrap();
        assert!(row.starts_with("01234\t"));
        assert_eq!(row.split('\t').count(), COLUMNS.len());
    }

    #[test]
    fn test_json_report_counts() {
        let json = render_json(&outcome(&["01234", "98765"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["remaining_count"], 2);
        assert_eq!(value["selected_filters"][0], "Hot Digit Match");
        assert_eq!(value["combos"][0]["Combo"], "01234");
        assert_eq!(value["combos"][1]["Combo Sum"], 35);
    }

    #[test]
    fn test_bundle_zip_contains_files() {
        let files = vec![
            ("a.csv".to_string(), "x".to_string()),
            ("b.json".to_string(), "{}".to_string()),
        ];
        let bytes = bundle_zip(&files).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
