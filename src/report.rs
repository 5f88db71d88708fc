use std::fmt::Write;

use crate::analytics;
use crate::detail;
use crate::error::{PipelineError, Result};
use crate::filter::FilterCriteria;
use crate::models::EnrichedRecord;

const DETAIL_ROW_LIMIT: usize = 15;

pub fn build_report(criteria: &FilterCriteria, records: &[EnrichedRecord]) -> Result<String> {
    let summary = match analytics::summarize(records) {
        Ok(summary) => Some(summary),
        Err(PipelineError::NoData) => None,
        Err(err) => return Err(err),
    };
    let rows = detail::project(records)?;

    let mut output = String::new();
    let _ = writeln!(output, "# Sales Prediction Report");
    let _ = writeln!(
        output,
        "Generated {} for {}",
        chrono::Utc::now().date_naive(),
        criteria.describe()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Figures");

    match &summary {
        None => {
            let _ = writeln!(output, "No records match the current filter.");
        }
        Some(summary) => {
            let kpis = &summary.kpis;
            let _ = writeln!(
                output,
                "- Total predicted sales: ${:.0}",
                kpis.total_predicted_sales
            );
            let _ = writeln!(
                output,
                "- Average monthly sales: ${:.0}",
                kpis.average_monthly_sales
            );
            let _ = writeln!(
                output,
                "- Top distributor: {} (${:.0} in sales)",
                kpis.top_distributor.name, kpis.top_distributor.total
            );
            let _ = writeln!(
                output,
                "- Best-selling product: {} (${:.0} in sales)",
                kpis.top_product.name, kpis.top_product.total
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Predicted Monthly Sales");

    match &summary {
        None => {
            let _ = writeln!(output, "No records match the current filter.");
        }
        Some(summary) => {
            for point in &summary.series {
                let _ = writeln!(output, "- {}: ${:.0}", point.month_year, point.predicted_sales);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Detailed Data View");

    if rows.is_empty() {
        let _ = writeln!(output, "No records match the current filter.");
    } else {
        let _ = writeln!(
            output,
            "| Month | Distributor | Customer | Country | Channel | Product | Class | Quantity | Price | Predicted |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|---|");
        for row in rows.iter().take(DETAIL_ROW_LIMIT) {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {:.0} | {:.2} | {:.2} |",
                row.month_year,
                row.distributor,
                row.customer_name,
                row.country,
                row.channel,
                row.product_name,
                row.product_class,
                row.quantity,
                row.price,
                row.predicted_sales
            );
        }
        if rows.len() > DETAIL_ROW_LIMIT {
            let _ = writeln!(output, "({} more rows not shown)", rows.len() - DETAIL_ROW_LIMIT);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich;
    use crate::models::SalesRecord;

    fn record(month: &str, year: i32, distributor: &str) -> SalesRecord {
        SalesRecord {
            month: month.to_string(),
            year,
            country: "Germany".to_string(),
            channel: "Pharmacy".to_string(),
            product_class: "Analgesics".to_string(),
            sales_team: "Delta".to_string(),
            distributor: distributor.to_string(),
            customer_name: "Mueller Pharma".to_string(),
            product_name: "Ibuprofen".to_string(),
            quantity: 100.0,
            price: 4.5,
        }
    }

    #[test]
    fn report_covers_kpis_series_and_detail() {
        let records = enrich::merge(
            vec![
                record("January", 2021, "A"),
                record("January", 2021, "B"),
                record("February", 2021, "A"),
            ],
            vec![100.0, 50.0, 30.0],
        )
        .unwrap();
        let report = build_report(&FilterCriteria::default(), &records).unwrap();

        assert!(report.contains("# Sales Prediction Report"));
        assert!(report.contains("for all records"));
        assert!(report.contains("- Total predicted sales: $180"));
        assert!(report.contains("- Average monthly sales: $90"));
        assert!(report.contains("- Top distributor: A ($130 in sales)"));
        assert!(report.contains("- January 2021: $150"));
        assert!(report.contains("- February 2021: $30"));
        assert!(report.contains("| January 2021 | A |"));
    }

    #[test]
    fn empty_dataset_renders_no_data_sections() {
        let report = build_report(&FilterCriteria::default(), &[]).unwrap();
        assert!(report.contains("## Key Figures"));
        assert!(report.contains("## Predicted Monthly Sales"));
        assert!(report.contains("## Detailed Data View"));
        assert_eq!(
            report.matches("No records match the current filter.").count(),
            3
        );
    }

    #[test]
    fn long_detail_views_are_truncated() {
        let mut rows = Vec::new();
        let mut predictions = Vec::new();
        for i in 0..20 {
            rows.push(record("January", 2021, &format!("D{i:02}")));
            predictions.push(1.0);
        }
        let records = enrich::merge(rows, predictions).unwrap();
        let report = build_report(&FilterCriteria::default(), &records).unwrap();
        assert!(report.contains("(5 more rows not shown)"));
    }
}
