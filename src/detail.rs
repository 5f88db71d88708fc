use crate::analytics;
use crate::error::Result;
use crate::models::{DetailRow, EnrichedRecord};

/// Project the display columns and order rows calendar-wise. The sort is
/// stable, so rows within one bucket keep their original relative order.
pub fn project(records: &[EnrichedRecord]) -> Result<Vec<DetailRow>> {
    let mut rows = Vec::with_capacity(records.len());
    for enriched in records {
        let key = analytics::chronological_key(&enriched.month_year)?;
        rows.push((
            key,
            DetailRow {
                month_year: enriched.month_year.clone(),
                distributor: enriched.record.distributor.clone(),
                customer_name: enriched.record.customer_name.clone(),
                country: enriched.record.country.clone(),
                channel: enriched.record.channel.clone(),
                product_name: enriched.record.product_name.clone(),
                product_class: enriched.record.product_class.clone(),
                quantity: enriched.record.quantity,
                price: enriched.record.price,
                predicted_sales: enriched.predicted_sales,
            },
        ));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}
