//! Count and ratio arithmetic for the report endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::contest::{RecruiterStatRow, StatusCount};

/// One literal rejection reason with its share of all rejections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonTally {
    pub reason: String,
    pub count: u64,
    pub percentage: String,
}

/// Tallies literal reason strings, sorted descending by count.
/// Accumulation goes through a `BTreeMap`, so ties come out alphabetically.
pub fn tally_reasons(reasons: &[String]) -> Vec<ReasonTally> {
    let total = reasons.len() as u64;

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for reason in reasons {
        *counts.entry(reason.as_str()).or_insert(0) += 1;
    }

    let mut tallies: Vec<ReasonTally> = counts
        .into_iter()
        .map(|(reason, count)| ReasonTally {
            reason: reason.to_string(),
            count,
            percentage: percent_1dp(count, total),
        })
        .collect();

    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

/// `count / total * 100` to one decimal place; zero totals yield "0.0".
pub fn percent_1dp(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}

/// L1-per-submission conversion, two decimals with a percent suffix.
/// Zero submissions yield the literal "0.00%".
pub fn conversion_ratio(l1: i64, submitted: i64) -> String {
    if submitted <= 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", l1 as f64 / submitted as f64 * 100.0)
}

/// Funnel-stage rates derived from the lowercased status counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelRates {
    pub total_candidates: i64,
    pub rejection_rate: String,
    pub shortlist_rate: String,
    pub l1_conversion: String,
}

pub fn funnel_rates(counts: &[StatusCount]) -> FunnelRates {
    let total: i64 = counts.iter().map(|c| c.count).sum();
    let get = |status: &str| {
        counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    };

    let rejected = get("rejected");
    let shortlisted = get("shortlisted");
    let l1 = get("l1");

    FunnelRates {
        total_candidates: total,
        rejection_rate: rate_1dp(rejected, total),
        shortlist_rate: rate_1dp(shortlisted, total),
        l1_conversion: rate_1dp(l1, shortlisted),
    }
}

fn rate_1dp(part: i64, whole: i64) -> String {
    if whole <= 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part as f64 / whole as f64 * 100.0)
}

/// Per-recruiter funnel counts with the derived conversion ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterSummary {
    pub recruiter: String,
    pub submitted: i64,
    pub shortlisted: i64,
    pub l1: i64,
    pub conversion: String,
}

pub fn summarize_recruiters(rows: Vec<RecruiterStatRow>) -> Vec<RecruiterSummary> {
    rows.into_iter()
        .map(|row| RecruiterSummary {
            recruiter: row.recruiter.unwrap_or_else(|| "Unassigned".to_string()),
            conversion: conversion_ratio(row.l1, row.submitted),
            submitted: row.submitted,
            shortlisted: row.shortlisted,
            l1: row.l1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: &str, count: i64) -> StatusCount {
        StatusCount {
            status: status.to_string(),
            count,
        }
    }

    #[test]
    fn test_single_reason_is_full_share() {
        let tallies = tally_reasons(&["skills missing".to_string()]);
        assert_eq!(tallies.len(), 1);
        assert_eq!(tallies[0].reason, "skills missing");
        assert_eq!(tallies[0].count, 1);
        assert_eq!(tallies[0].percentage, "100.0");
    }

    #[test]
    fn test_tallies_sorted_descending_by_count() {
        let reasons = vec![
            "too junior".to_string(),
            "salary mismatch".to_string(),
            "salary mismatch".to_string(),
            "no show".to_string(),
            "salary mismatch".to_string(),
            "too junior".to_string(),
        ];
        let tallies = tally_reasons(&reasons);
        assert_eq!(tallies[0].reason, "salary mismatch");
        assert_eq!(tallies[0].count, 3);
        assert_eq!(tallies[1].reason, "too junior");
        assert_eq!(tallies[2].reason, "no show");
    }

    #[test]
    fn test_percentages_sum_to_one_hundred_within_tolerance() {
        let reasons = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];
        let tallies = tally_reasons(&reasons);
        let sum: f64 = tallies
            .iter()
            .map(|t| t.percentage.parse::<f64>().unwrap())
            .sum();
        assert!(
            (sum - 100.0).abs() <= 0.1 * tallies.len() as f64,
            "Sum was {sum}"
        );
    }

    #[test]
    fn test_empty_reasons_yield_empty_tally() {
        assert!(tally_reasons(&[]).is_empty());
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent_1dp(0, 0), "0.0");
        assert_eq!(percent_1dp(5, 0), "0.0");
    }

    #[test]
    fn test_conversion_ratio_formatting() {
        assert_eq!(conversion_ratio(1, 3), "33.33%");
        assert_eq!(conversion_ratio(2, 2), "100.00%");
    }

    #[test]
    fn test_zero_submissions_is_literal_zero_percent() {
        assert_eq!(conversion_ratio(0, 0), "0.00%");
        assert_eq!(conversion_ratio(4, 0), "0.00%");
    }

    #[test]
    fn test_funnel_rates() {
        let counts = vec![
            status("rejected", 6),
            status("shortlisted", 3),
            status("l1", 1),
        ];
        let rates = funnel_rates(&counts);
        assert_eq!(rates.total_candidates, 10);
        assert_eq!(rates.rejection_rate, "60.0");
        assert_eq!(rates.shortlist_rate, "30.0");
        // L1 conversion is measured against the shortlist, not the total.
        assert_eq!(rates.l1_conversion, "33.3");
    }

    #[test]
    fn test_funnel_rates_zero_denominators() {
        let rates = funnel_rates(&[]);
        assert_eq!(rates.total_candidates, 0);
        assert_eq!(rates.rejection_rate, "0.0");
        assert_eq!(rates.l1_conversion, "0.0");
    }

    #[test]
    fn test_recruiter_summary_fills_unassigned() {
        let rows = vec![RecruiterStatRow {
            recruiter: None,
            submitted: 4,
            shortlisted: 2,
            l1: 1,
        }];
        let summaries = summarize_recruiters(rows);
        assert_eq!(summaries[0].recruiter, "Unassigned");
        assert_eq!(summaries[0].conversion, "25.00%");
    }
}
