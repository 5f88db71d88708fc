use std::collections::HashMap;

use chrono::Month;

use crate::error::{PipelineError, Result};
use crate::models::{EnrichedRecord, KpiSet, MonthlySummary, RankedGroup, TimeSeriesPoint};

/// Calendar position of a month-year bucket: `(year, month index 1-12)`.
/// Buckets sort by this key, never by their label text.
pub fn chronological_key(month_year: &str) -> Result<(i32, u32)> {
    let parsed = month_year.rsplit_once(' ').and_then(|(month, year)| {
        let month = month.parse::<Month>().ok()?;
        let year = year.parse::<i32>().ok()?;
        Some((year, month.number_from_month()))
    });
    parsed.ok_or_else(|| PipelineError::UnknownMonth {
        key: month_year.to_string(),
    })
}

pub fn total_predicted_sales(records: &[EnrichedRecord]) -> f64 {
    records.iter().map(|r| r.predicted_sales).sum()
}

/// Per-bucket predicted-sales sums in calendar order.
pub fn time_series(records: &[EnrichedRecord]) -> Result<Vec<TimeSeriesPoint>> {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for record in records {
        *sums.entry(record.month_year.as_str()).or_insert(0.0) += record.predicted_sales;
    }

    let mut points = Vec::with_capacity(sums.len());
    for (month_year, predicted_sales) in sums {
        let key = chronological_key(month_year)?;
        points.push((
            key,
            TimeSeriesPoint {
                month_year: month_year.to_string(),
                predicted_sales,
            },
        ));
    }
    points.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.month_year.cmp(&b.1.month_year))
    });
    Ok(points.into_iter().map(|(_, point)| point).collect())
}

pub fn top_distributor(records: &[EnrichedRecord]) -> Result<RankedGroup> {
    top_group(records, |r| r.record.distributor.as_str())
}

pub fn top_product(records: &[EnrichedRecord]) -> Result<RankedGroup> {
    top_group(records, |r| r.record.product_name.as_str())
}

/// Group by the given key, sum predicted sales, and pick the leading group.
/// Ties on the sum go to the lexicographically smallest name.
fn top_group<F>(records: &[EnrichedRecord], group: F) -> Result<RankedGroup>
where
    F: Fn(&EnrichedRecord) -> &str,
{
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for record in records {
        *sums.entry(group(record)).or_insert(0.0) += record.predicted_sales;
    }

    let mut ranked: Vec<RankedGroup> = sums
        .into_iter()
        .map(|(name, total)| RankedGroup {
            name: name.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.into_iter().next().ok_or(PipelineError::NoData)
}

/// Compute the KPI set and the calendar-ordered series for a filtered
/// dataset. Zero records is a reported outcome, not a panic.
pub fn summarize(records: &[EnrichedRecord]) -> Result<MonthlySummary> {
    if records.is_empty() {
        return Err(PipelineError::NoData);
    }

    let series = time_series(records)?;
    // A monthly average over bucket sums: a bucket with many small rows and
    // a bucket with one large row count equally.
    let average_monthly_sales =
        series.iter().map(|p| p.predicted_sales).sum::<f64>() / series.len() as f64;

    let kpis = KpiSet {
        total_predicted_sales: total_predicted_sales(records),
        average_monthly_sales,
        top_distributor: top_distributor(records)?,
        top_product: top_product(records)?,
    };
    Ok(MonthlySummary { kpis, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich;
    use crate::models::SalesRecord;

    fn record(month: &str, year: i32, distributor: &str, product: &str) -> SalesRecord {
        SalesRecord {
            month: month.to_string(),
            year,
            country: "Germany".to_string(),
            channel: "Pharmacy".to_string(),
            product_class: "Analgesics".to_string(),
            sales_team: "Delta".to_string(),
            distributor: distributor.to_string(),
            customer_name: "Mueller Pharma".to_string(),
            product_name: product.to_string(),
            quantity: 100.0,
            price: 4.5,
        }
    }

    fn enriched(rows: Vec<(SalesRecord, f64)>) -> Vec<EnrichedRecord> {
        let (records, predictions): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        enrich::merge(records, predictions).unwrap()
    }

    #[test]
    fn chronological_key_parses_month_and_year() {
        assert_eq!(chronological_key("January 2021").unwrap(), (2021, 1));
        assert_eq!(chronological_key("December 2020").unwrap(), (2020, 12));
        assert_eq!(chronological_key("September 1999").unwrap(), (1999, 9));
    }

    #[test]
    fn chronological_key_rejects_unknown_labels() {
        for key in ["Smarch 2021", "January", "2021", "January 20x1", ""] {
            let err = chronological_key(key).unwrap_err();
            match err {
                PipelineError::UnknownMonth { key: reported } => assert_eq!(reported, key),
                other => panic!("expected UnknownMonth, got {other:?}"),
            }
        }
    }

    #[test]
    fn summary_matches_reference_figures() {
        let records = enriched(vec![
            (record("January", 2021, "A", "Ibuprofen"), 100.0),
            (record("January", 2021, "B", "Paracetamol"), 50.0),
            (record("February", 2021, "A", "Ibuprofen"), 30.0),
        ]);
        let summary = summarize(&records).unwrap();

        assert!((summary.kpis.total_predicted_sales - 180.0).abs() < 0.001);
        assert!((summary.kpis.average_monthly_sales - 90.0).abs() < 0.001);
        assert_eq!(summary.kpis.top_distributor.name, "A");
        assert!((summary.kpis.top_distributor.total - 130.0).abs() < 0.001);
        assert_eq!(summary.kpis.top_product.name, "Ibuprofen");
        assert!((summary.kpis.top_product.total - 130.0).abs() < 0.001);

        let labels: Vec<&str> = summary.series.iter().map(|p| p.month_year.as_str()).collect();
        assert_eq!(labels, vec!["January 2021", "February 2021"]);
        assert!((summary.series[0].predicted_sales - 150.0).abs() < 0.001);
        assert!((summary.series[1].predicted_sales - 30.0).abs() < 0.001);
    }

    #[test]
    fn series_orders_calendar_wise_not_lexically() {
        let records = enriched(vec![
            (record("March", 2021, "A", "Ibuprofen"), 1.0),
            (record("January", 2022, "A", "Ibuprofen"), 2.0),
            (record("December", 2020, "A", "Ibuprofen"), 3.0),
        ]);
        let series = time_series(&records).unwrap();
        let labels: Vec<&str> = series.iter().map(|p| p.month_year.as_str()).collect();
        assert_eq!(labels, vec!["December 2020", "March 2021", "January 2022"]);
    }

    #[test]
    fn total_matches_series_sum() {
        let records = enriched(vec![
            (record("January", 2021, "A", "Ibuprofen"), 10.5),
            (record("March", 2021, "B", "Paracetamol"), 20.25),
            (record("March", 2021, "A", "Ibuprofen"), 30.0),
        ]);
        let series = time_series(&records).unwrap();
        let series_sum: f64 = series.iter().map(|p| p.predicted_sales).sum();
        assert!((total_predicted_sales(&records) - series_sum).abs() < 0.001);
    }

    #[test]
    fn tied_groups_rank_smallest_name_first() {
        let records = enriched(vec![
            (record("January", 2021, "Zeta", "Zyrtec"), 100.0),
            (record("January", 2021, "Alpha", "Aspirin"), 100.0),
        ]);
        assert_eq!(top_distributor(&records).unwrap().name, "Alpha");
        assert_eq!(top_product(&records).unwrap().name, "Aspirin");
    }

    #[test]
    fn empty_input_reports_no_data() {
        assert!(matches!(summarize(&[]), Err(PipelineError::NoData)));
        assert!(matches!(top_distributor(&[]), Err(PipelineError::NoData)));
        assert!(matches!(top_product(&[]), Err(PipelineError::NoData)));
        assert!(total_predicted_sales(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_month_fails_aggregation() {
        let records = enriched(vec![(record("Smarch", 2021, "A", "Ibuprofen"), 1.0)]);
        let err = summarize(&records).unwrap_err();
        match err {
            PipelineError::UnknownMonth { key } => assert_eq!(key, "Smarch 2021"),
            other => panic!("expected UnknownMonth, got {other:?}"),
        }
    }
}
