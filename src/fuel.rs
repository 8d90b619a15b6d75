//! Fuel log parsing and consumption anomaly detection.
//!
//! Input is the fixed-format ABA fill-up report exported by the PRAXIO
//! fleet system (latin-1 text, Brazilian decimal separators). Records
//! are flagged against the km/L median of their vehicle model, or
//! against externally supplied per-model reference values.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

/// km/L below this share of the model reference is a high-severity flag.
const VERY_LOW_PERCENT: f64 = 60.0;
const LOW_PERCENT: f64 = 75.0;
const HIGH_PERCENT: f64 = 150.0;
const VERY_HIGH_PERCENT: f64 = 200.0;

/// One fill-up record from the report.
#[derive(Debug, Clone, Serialize)]
pub struct FuelRecord {
    /// Vehicle fleet number (7 digits).
    pub prefix: String,
    pub date: NaiveDate,
    pub time: String,
    pub kind: String,
    pub tank: u32,
    pub pump: u32,
    pub liters: f64,
    pub odometer_start: f64,
    pub odometer_end: f64,
    pub km: f64,
    pub km_accumulated: f64,
    pub km_per_liter: f64,
    /// `*` marker emitted by the source system.
    pub system_flagged: bool,
    pub garage: String,
    pub model: String,
}

/// A parsed report: header metadata plus records in file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FuelReport {
    pub company: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub records: Vec<FuelRecord>,
}

fn data_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(\d{7})\s+(\d{2}/\d{2}/\d{4})\s+(\d{2}:\d{2})\s+(\w)\s+(\d+)\s+(\d+)\s+([\d.,]+)\s+([\d.,]+)\s+([\d.,]+)\s+(-?[\d.,]+)\s+([\d.,]+)\s+(-?[\d.,]+)",
        )
        .expect("valid regex")
    })
}

fn model_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{3})\s+(\d{3}-.+?)\s*$").expect("valid regex"))
}

fn company_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Empresa inicial:\s*\d+\s+(.+?)(?:\s{2,}|$)").expect("valid regex")
    })
}

fn period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Datas:\s*(\d{2}/\d{2}/\d{4}).*?a\s+(\d{2}/\d{2}/\d{4})").expect("valid regex")
    })
}

/// Parses a Brazilian-formatted decimal ("1.234,56"). Blank or
/// unparseable input yields 0.
pub fn parse_float_br(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .replace('.', "")
        .replace(',', ".")
        .parse()
        .unwrap_or(0.0)
}

fn parse_date_br(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y").ok()
}

/// Parses the report content. Lines that do not match the record layout
/// are scanned only for header metadata.
pub fn parse_report(content: &str) -> FuelReport {
    let mut report = FuelReport::default();

    for line in content.lines() {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.contains("Empresa inicial:") {
            if let Some(capture) = company_re().captures(line) {
                report.company = capture[1].trim().to_string();
            }
        }

        if line.contains("Datas:") {
            if let Some(capture) = period_re().captures(line) {
                report.period_start = parse_date_br(&capture[1]);
                report.period_end = parse_date_br(&capture[2]);
            }
        }

        let Some(data) = data_line_re().captures(line) else {
            continue;
        };
        let Some(date) = parse_date_br(&data[2]) else {
            continue;
        };

        let model_match = model_re().captures(line);
        let (garage, model) = match &model_match {
            Some(capture) => (capture[1].to_string(), capture[2].trim().to_string()),
            None => (String::new(), String::new()),
        };

        // The `*` marker sits between the numeric block and the garage.
        let data_end = data.get(0).map(|m| m.end()).unwrap_or(0);
        let model_start = model_match
            .as_ref()
            .and_then(|capture| capture.get(0))
            .map(|m| m.start())
            .unwrap_or(line.len());
        let system_flagged = line
            .get(data_end..model_start)
            .is_some_and(|rest| rest.contains('*'));

        report.records.push(FuelRecord {
            prefix: data[1].to_string(),
            date,
            time: data[3].to_string(),
            kind: data[4].to_string(),
            tank: data[5].parse().unwrap_or(0),
            pump: data[6].parse().unwrap_or(0),
            liters: parse_float_br(&data[7]),
            odometer_start: parse_float_br(&data[8]),
            odometer_end: parse_float_br(&data[9]),
            km: parse_float_br(&data[10]),
            km_accumulated: parse_float_br(&data[11]),
            km_per_liter: parse_float_br(&data[12]),
            system_flagged,
            garage,
            model,
        });
    }

    report
}

/// Alert severity, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// What a record was flagged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    InvalidDistance,
    OdometerDecreasing,
    ConsumptionVeryLow,
    ConsumptionLow,
    ConsumptionVeryHigh,
    ConsumptionHigh,
    OdometerInconsistent,
    SystemFlag,
}

impl AlertKind {
    /// Report code, kept in the source system's vocabulary.
    pub fn code(&self) -> &'static str {
        match self {
            AlertKind::InvalidDistance => "KM_INVALIDO",
            AlertKind::OdometerDecreasing => "HODOMETRO_DECRESCENTE",
            AlertKind::ConsumptionVeryLow => "KML_MUITO_BAIXO",
            AlertKind::ConsumptionLow => "KML_BAIXO",
            AlertKind::ConsumptionVeryHigh => "KML_MUITO_ALTO",
            AlertKind::ConsumptionHigh => "KML_ALTO",
            AlertKind::OdometerInconsistent => "HODOMETRO_INCONSISTENTE",
            AlertKind::SystemFlag => "FLAG_SISTEMA",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub kind: AlertKind,
    pub description: String,
    pub severity: Severity,
}

/// All problems found for one record.
#[derive(Debug, Clone, Serialize)]
pub struct FuelAlert {
    pub record_index: usize,
    pub prefix: String,
    pub problems: Vec<Problem>,
    pub max_severity: Severity,
}

/// Per-model km/L statistics over valid records (km > 0, km/L > 0).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelStats {
    pub mean_kml: f64,
    pub median_kml: f64,
    pub min_kml: f64,
    pub max_kml: f64,
    pub total_liters: f64,
    pub total_km: f64,
    pub record_count: usize,
    pub vehicle_count: usize,
    pub overall_kml: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FuelSummary {
    pub record_count: usize,
    pub vehicle_count: usize,
    pub model_count: usize,
    pub total_liters: f64,
    pub total_km: f64,
    pub mean_kml: f64,
    pub alert_count: usize,
    pub high_alerts: usize,
    pub medium_alerts: usize,
    pub low_alerts: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FuelAnalysis {
    pub summary: FuelSummary,
    pub models: BTreeMap<String, ModelStats>,
    pub alerts: Vec<FuelAlert>,
}

const UNKNOWN_MODEL: &str = "UNKNOWN";

fn model_label(record: &FuelRecord) -> &str {
    if record.model.is_empty() {
        UNKNOWN_MODEL
    } else {
        &record.model
    }
}

/// Analyzes records against each model's computed km/L median.
pub fn analyze(records: &[FuelRecord]) -> FuelAnalysis {
    analyze_with_reference(records, &BTreeMap::new())
}

/// Like [`analyze`], but entries in `reference_kml` override the
/// computed median for that model.
pub fn analyze_with_reference(
    records: &[FuelRecord],
    reference_kml: &BTreeMap<String, f64>,
) -> FuelAnalysis {
    if records.is_empty() {
        return FuelAnalysis::default();
    }

    let mut by_model: BTreeMap<String, Vec<&FuelRecord>> = BTreeMap::new();
    for record in records {
        by_model
            .entry(model_label(record).to_string())
            .or_default()
            .push(record);
    }

    let mut models = BTreeMap::new();
    for (model, group) in &by_model {
        models.insert(model.clone(), model_stats(group));
    }

    // Previous record of the same vehicle, in import order.
    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    let mut previous_index: Vec<Option<usize>> = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        previous_index.push(last_seen.get(record.prefix.as_str()).copied());
        last_seen.insert(&record.prefix, idx);
    }

    let mut alerts = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let label = model_label(record);
        let stats = models.get(label);
        let reference = reference_kml
            .get(label)
            .copied()
            .unwrap_or_else(|| stats.map(|s| s.median_kml).unwrap_or(0.0));

        let mut problems = Vec::new();

        if record.km <= 0.0 {
            problems.push(Problem {
                kind: AlertKind::InvalidDistance,
                description: format!("distance {:.1} km (zero or negative)", record.km),
                severity: Severity::High,
            });
        }

        if record.odometer_end < record.odometer_start {
            problems.push(Problem {
                kind: AlertKind::OdometerDecreasing,
                description: format!(
                    "closing odometer ({:.0}) below opening ({:.0})",
                    record.odometer_end, record.odometer_start
                ),
                severity: Severity::High,
            });
        }

        if reference > 0.0 && record.km_per_liter > 0.0 && record.km > 0.0 {
            let percent = record.km_per_liter / reference * 100.0;

            if percent < VERY_LOW_PERCENT {
                problems.push(Problem {
                    kind: AlertKind::ConsumptionVeryLow,
                    description: format!(
                        "km/L {:.2} is {:.0}% below the model reference ({:.2} km/L)",
                        record.km_per_liter,
                        100.0 - percent,
                        reference
                    ),
                    severity: Severity::High,
                });
            } else if percent < LOW_PERCENT {
                problems.push(Problem {
                    kind: AlertKind::ConsumptionLow,
                    description: format!(
                        "km/L {:.2} is {:.0}% below the model reference ({:.2} km/L)",
                        record.km_per_liter,
                        100.0 - percent,
                        reference
                    ),
                    severity: Severity::Medium,
                });
            }

            if percent > VERY_HIGH_PERCENT {
                problems.push(Problem {
                    kind: AlertKind::ConsumptionVeryHigh,
                    description: format!(
                        "km/L {:.2} is {:.0}% above the model reference ({:.2} km/L)",
                        record.km_per_liter,
                        percent - 100.0,
                        reference
                    ),
                    severity: Severity::High,
                });
            } else if percent > HIGH_PERCENT {
                problems.push(Problem {
                    kind: AlertKind::ConsumptionHigh,
                    description: format!(
                        "km/L {:.2} is {:.0}% above the model reference ({:.2} km/L)",
                        record.km_per_liter,
                        percent - 100.0,
                        reference
                    ),
                    severity: Severity::Medium,
                });
            }
        }

        if let Some(prev_idx) = previous_index[idx] {
            let previous = &records[prev_idx];
            if record.odometer_start < previous.odometer_end {
                problems.push(Problem {
                    kind: AlertKind::OdometerInconsistent,
                    description: format!(
                        "opening odometer ({:.0}) below the previous fill-up's closing ({:.0})",
                        record.odometer_start, previous.odometer_end
                    ),
                    severity: Severity::High,
                });
            }
        }

        // The source system's own marker is noise when a concrete
        // problem was already found for the record.
        if record.system_flagged && problems.is_empty() {
            problems.push(Problem {
                kind: AlertKind::SystemFlag,
                description: "flagged by the source system (*)".to_string(),
                severity: Severity::Low,
            });
        }

        if let Some(max_severity) = problems.iter().map(|p| p.severity).max() {
            alerts.push(FuelAlert {
                record_index: idx,
                prefix: record.prefix.clone(),
                problems,
                max_severity,
            });
        }
    }

    let total_liters: f64 = records.iter().map(|r| r.liters).sum();
    let total_km: f64 = records.iter().filter(|r| r.km > 0.0).map(|r| r.km).sum();
    let vehicle_count = records
        .iter()
        .map(|r| r.prefix.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    let summary = FuelSummary {
        record_count: records.len(),
        vehicle_count,
        model_count: by_model.len(),
        total_liters: round2(total_liters),
        total_km: round2(total_km),
        mean_kml: if total_liters > 0.0 {
            round2(total_km / total_liters)
        } else {
            0.0
        },
        alert_count: alerts.len(),
        high_alerts: alerts
            .iter()
            .filter(|a| a.max_severity == Severity::High)
            .count(),
        medium_alerts: alerts
            .iter()
            .filter(|a| a.max_severity == Severity::Medium)
            .count(),
        low_alerts: alerts
            .iter()
            .filter(|a| a.max_severity == Severity::Low)
            .count(),
    };

    FuelAnalysis {
        summary,
        models,
        alerts,
    }
}

fn model_stats(group: &[&FuelRecord]) -> ModelStats {
    let mut valid: Vec<f64> = group
        .iter()
        .filter(|r| r.km_per_liter > 0.0 && r.km > 0.0)
        .map(|r| r.km_per_liter)
        .collect();

    let (mean, median_value, min, max) = if valid.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        let mean = valid.iter().sum::<f64>() / valid.len() as f64;
        let median_value = median(&mut valid);
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (mean, median_value, min, max)
    };

    let total_liters: f64 = group.iter().map(|r| r.liters).sum();
    let total_km: f64 = group.iter().filter(|r| r.km > 0.0).map(|r| r.km).sum();
    let vehicle_count = group
        .iter()
        .map(|r| r.prefix.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    ModelStats {
        mean_kml: round2(mean),
        median_kml: round2(median_value),
        min_kml: round2(min),
        max_kml: round2(max),
        total_liters: round2(total_liters),
        total_km: round2(total_km),
        record_count: group.len(),
        vehicle_count,
        overall_kml: if total_liters > 0.0 {
            round2(total_km / total_liters)
        } else {
            0.0
        },
    }
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = values.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str, model: &str, km: f64, liters: f64, kml: f64) -> FuelRecord {
        FuelRecord {
            prefix: prefix.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            time: "06:30".to_string(),
            kind: "A".to_string(),
            tank: 1,
            pump: 1,
            liters,
            odometer_start: 10_000.0,
            odometer_end: 10_000.0 + km.max(0.0),
            km,
            km_accumulated: km.max(0.0),
            km_per_liter: kml,
            system_flagged: false,
            garage: "001".to_string(),
            model: model.to_string(),
        }
    }

    /// Five baseline records establishing a median of 10 km/L, plus the
    /// record under test.
    fn with_baseline(subject: FuelRecord) -> Vec<FuelRecord> {
        let mut records: Vec<FuelRecord> = (0..5)
            .map(|i| record(&format!("000100{}", i), "123-TORINO U", 400.0, 40.0, 10.0))
            .collect();
        records.push(subject);
        records
    }

    fn alerts_for<'a>(analysis: &'a FuelAnalysis, index: usize) -> Option<&'a FuelAlert> {
        analysis.alerts.iter().find(|a| a.record_index == index)
    }

    #[test]
    fn test_parse_float_br() {
        assert_eq!(parse_float_br("1.234,56"), 1234.56);
        assert_eq!(parse_float_br("12,5"), 12.5);
        assert_eq!(parse_float_br("-3,0"), -3.0);
        assert_eq!(parse_float_br(""), 0.0);
        assert_eq!(parse_float_br("abc"), 0.0);
    }

    #[test]
    fn test_parse_report_line() {
        let content = "\
Empresa inicial: 001  TRANSPORTES NOVA ERA LTDA
Datas: 01/02/2024  a 29/02/2024
0001001 01/02/2024 06:30 A 1 2 100,00 10.000,0 10.500,0 500,0 500,0 5,00  001 123-TORINO U
0001002 01/02/2024 07:10 A 1 2 80,00 20.000,0 20.400,0 400,0 400,0 5,00 * 001 123-TORINO U
";
        let report = parse_report(content);

        assert_eq!(report.company, "TRANSPORTES NOVA ERA LTDA");
        assert_eq!(
            report.period_start,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(
            report.period_end,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(report.records.len(), 2);

        let first = &report.records[0];
        assert_eq!(first.prefix, "0001001");
        assert_eq!(first.liters, 100.0);
        assert_eq!(first.odometer_start, 10_000.0);
        assert_eq!(first.km, 500.0);
        assert_eq!(first.km_per_liter, 5.0);
        assert_eq!(first.model, "123-TORINO U");
        assert_eq!(first.garage, "001");
        assert!(!first.system_flagged);
        assert!(report.records[1].system_flagged);
    }

    #[test]
    fn test_parse_skips_non_record_lines() {
        let content = "HEADER\n--------\nTotais gerais 123\n";
        assert!(parse_report(content).records.is_empty());
    }

    #[test]
    fn test_half_of_median_is_very_low() {
        let records = with_baseline(record("0009999", "123-TORINO U", 200.0, 40.0, 5.0));
        let analysis = analyze(&records);

        let alert = alerts_for(&analysis, 5).expect("record should be flagged");
        assert_eq!(alert.max_severity, Severity::High);
        assert!(alert
            .problems
            .iter()
            .any(|p| p.kind == AlertKind::ConsumptionVeryLow));
        assert_eq!(alert.problems[0].kind.code(), "KML_MUITO_BAIXO");
    }

    #[test]
    fn test_ninety_percent_of_median_is_not_flagged() {
        let records = with_baseline(record("0009999", "123-TORINO U", 360.0, 40.0, 9.0));
        let analysis = analyze(&records);
        assert!(alerts_for(&analysis, 5).is_none());
    }

    #[test]
    fn test_seventy_percent_is_medium_low() {
        let records = with_baseline(record("0009999", "123-TORINO U", 280.0, 40.0, 7.0));
        let analysis = analyze(&records);
        let alert = alerts_for(&analysis, 5).unwrap();
        assert_eq!(alert.max_severity, Severity::Medium);
        assert_eq!(alert.problems[0].kind, AlertKind::ConsumptionLow);
    }

    #[test]
    fn test_high_and_very_high_thresholds() {
        let records = with_baseline(record("0009998", "123-TORINO U", 640.0, 40.0, 16.0));
        let analysis = analyze(&records);
        let alert = alerts_for(&analysis, 5).unwrap();
        assert_eq!(alert.problems[0].kind, AlertKind::ConsumptionHigh);
        assert_eq!(alert.max_severity, Severity::Medium);

        let records = with_baseline(record("0009999", "123-TORINO U", 1000.0, 40.0, 25.0));
        let analysis = analyze(&records);
        let alert = alerts_for(&analysis, 5).unwrap();
        assert_eq!(alert.problems[0].kind, AlertKind::ConsumptionVeryHigh);
        assert_eq!(alert.max_severity, Severity::High);
    }

    #[test]
    fn test_invalid_distance_flagged_and_excluded_from_stats() {
        let records = with_baseline(record("0009999", "123-TORINO U", 0.0, 40.0, 0.0));
        let analysis = analyze(&records);

        let alert = alerts_for(&analysis, 5).unwrap();
        assert!(alert
            .problems
            .iter()
            .any(|p| p.kind == AlertKind::InvalidDistance));

        // Median unaffected by the invalid record
        assert_eq!(analysis.models["123-TORINO U"].median_kml, 10.0);
    }

    #[test]
    fn test_odometer_decreasing() {
        let mut subject = record("0009999", "123-TORINO U", 400.0, 40.0, 10.0);
        subject.odometer_end = subject.odometer_start - 100.0;
        let records = with_baseline(subject);
        let analysis = analyze(&records);
        let alert = alerts_for(&analysis, 5).unwrap();
        assert!(alert
            .problems
            .iter()
            .any(|p| p.kind == AlertKind::OdometerDecreasing));
    }

    #[test]
    fn test_odometer_inconsistent_with_previous_record() {
        let mut records = with_baseline(record("0001000", "123-TORINO U", 400.0, 40.0, 10.0));
        // Same vehicle as baseline record 0; opens below its closing odometer
        records[5].odometer_start = records[0].odometer_end - 50.0;
        records[5].odometer_end = records[5].odometer_start + 400.0;

        let analysis = analyze(&records);
        let alert = alerts_for(&analysis, 5).unwrap();
        assert!(alert
            .problems
            .iter()
            .any(|p| p.kind == AlertKind::OdometerInconsistent));
    }

    #[test]
    fn test_system_flag_only_without_specific_problems() {
        let mut clean = record("0009999", "123-TORINO U", 400.0, 40.0, 10.0);
        clean.system_flagged = true;
        let analysis = analyze(&with_baseline(clean));
        let alert = alerts_for(&analysis, 5).unwrap();
        assert_eq!(alert.problems.len(), 1);
        assert_eq!(alert.problems[0].kind, AlertKind::SystemFlag);
        assert_eq!(alert.max_severity, Severity::Low);

        let mut dirty = record("0009999", "123-TORINO U", 200.0, 40.0, 5.0);
        dirty.system_flagged = true;
        let analysis = analyze(&with_baseline(dirty));
        let alert = alerts_for(&analysis, 5).unwrap();
        assert!(alert.problems.iter().all(|p| p.kind != AlertKind::SystemFlag));
    }

    #[test]
    fn test_reference_override_replaces_median() {
        // 10 km/L against an overridden reference of 20 → 50% → very low
        let records = with_baseline(record("0009999", "123-TORINO U", 400.0, 40.0, 10.0));
        let reference = BTreeMap::from([("123-TORINO U".to_string(), 20.0)]);
        let analysis = analyze_with_reference(&records, &reference);

        let alert = alerts_for(&analysis, 5).expect("override should trigger flags");
        assert!(alert
            .problems
            .iter()
            .any(|p| p.kind == AlertKind::ConsumptionVeryLow));
    }

    #[test]
    fn test_summary_counts() {
        let mut records = with_baseline(record("0009999", "123-TORINO U", 200.0, 40.0, 5.0));
        let mut flagged = record("0009998", "123-TORINO U", 400.0, 40.0, 10.0);
        flagged.system_flagged = true;
        records.push(flagged);

        let analysis = analyze(&records);
        assert_eq!(analysis.summary.record_count, 7);
        assert_eq!(analysis.summary.alert_count, 2);
        assert_eq!(analysis.summary.high_alerts, 1);
        assert_eq!(analysis.summary.low_alerts, 1);
        assert_eq!(analysis.summary.model_count, 1);
    }

    #[test]
    fn test_empty_records() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.summary.record_count, 0);
        assert!(analysis.alerts.is_empty());
        assert!(analysis.models.is_empty());
    }
}
