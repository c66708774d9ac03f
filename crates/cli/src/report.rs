//! Plain-text rendering of pipeline results

use crate::evaluation::EngineGrade;
use rankdup_dedup::DetectionReport;
use rankdup_eval::{MetricRecord, SummaryStats};
use std::collections::BTreeMap;

/// One row per engine: `N min max mean median first_quartile third_quartile`
pub fn stats_table<'a>(
    title: &str,
    rows: impl IntoIterator<Item = (&'a str, &'a SummaryStats)>,
) -> String {
    let mut lines = vec![
        title.to_string(),
        "N\tmin\tmax\tmean\tmedian\tfirst_quartile\tthird_quartile".to_string(),
    ];
    for (name, stats) in rows {
        lines.push(format!(
            "{name}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t\t{:.2}",
            stats.min,
            stats.max,
            stats.mean,
            stats.median,
            stats.first_quartile,
            stats.third_quartile
        ));
    }
    lines.join("\n")
}

/// Precision table, recall table and mean F-scores for graded engines
pub fn grade_report(grades: &[EngineGrade], k: usize) -> String {
    let precision = stats_table(
        &format!("Precision at {k}"),
        grades.iter().map(|g| (g.name.as_str(), &g.precision)),
    );
    let recall = stats_table(
        &format!("Recall at {k}"),
        grades.iter().map(|g| (g.name.as_str(), &g.recall)),
    );

    let mut f_scores = vec!["F-score:".to_string()];
    for grade in grades {
        let value = grade
            .mean_f_score
            .map_or_else(|| "undefined".to_string(), |f| format!("{f:.2}"));
        f_scores.push(format!("{}\t{value}", grade.name));
    }

    [precision, recall, f_scores.join("\n")].join("\n\n")
}

/// Best configurations per dataset, ranked by MRR
pub fn top_configurations(top: &BTreeMap<&str, Vec<&MetricRecord>>) -> String {
    let mut lines = Vec::new();
    for (dataset, records) in top {
        lines.push(format!("Top {} configurations on {dataset}:", records.len()));
        for (rank, record) in records.iter().enumerate() {
            lines.push(format!(
                "  {}. {} (MRR {:.3})",
                rank + 1,
                record.label(),
                record.mrr()
            ));
        }
    }
    lines.join("\n")
}

pub fn detection_report(report: &DetectionReport) -> String {
    format!(
        "Detection probability: {}\nFalse positives: {}\nFalse negatives: {}",
        report.detection_probability, report.false_positives, report.false_negatives
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(value: f64) -> SummaryStats {
        SummaryStats::from_values(&[value]).unwrap()
    }

    #[test]
    fn test_stats_table() {
        let table = stats_table("Precision at 4", [("SE_1", &stats(0.5))]);
        assert_eq!(
            table,
            "Precision at 4\n\
             N\tmin\tmax\tmean\tmedian\tfirst_quartile\tthird_quartile\n\
             SE_1\t0.50\t0.50\t0.50\t0.50\t0.50\t\t0.50"
        );
    }

    #[test]
    fn test_grade_report_marks_undefined_f_score() {
        let grades = vec![
            EngineGrade {
                name: "SE_1".to_string(),
                precision: stats(0.5),
                recall: stats(1.0),
                mean_f_score: Some(2.0 / 3.0),
            },
            EngineGrade {
                name: "SE_2".to_string(),
                precision: stats(0.0),
                recall: stats(0.0),
                mean_f_score: None,
            },
        ];

        let report = grade_report(&grades, 4);
        assert!(report.contains("Recall at 4"));
        assert!(report.ends_with("F-score:\nSE_1\t0.67\nSE_2\tundefined"));
    }

    #[test]
    fn test_detection_report() {
        let report = DetectionReport {
            detection_probability: 1.0,
            false_positives: 0,
            false_negatives: 2,
        };
        assert_eq!(
            detection_report(&report),
            "Detection probability: 1\nFalse positives: 0\nFalse negatives: 2"
        );
    }
}
