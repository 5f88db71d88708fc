use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the uploaded sales CSV, keyed by the upstream export's exact
/// column names. Unknown columns are ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Product Class")]
    pub product_class: String,
    #[serde(rename = "Sales Team")]
    pub sales_team: String,
    #[serde(rename = "Distributor")]
    pub distributor: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// An uploaded dataset held in memory for one pipeline run. Each submission
/// owns its bytes and rows and carries its own id, so concurrent submissions
/// never share storage.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub csv: Vec<u8>,
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub record: SalesRecord,
    pub predicted_sales: f64,
    pub month_year: String,
}

/// Selectable values per filterable dimension, wildcard first.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionValues {
    pub countries: Vec<String>,
    pub channels: Vec<String>,
    pub product_classes: Vec<String>,
    pub sales_teams: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedGroup {
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiSet {
    pub total_predicted_sales: f64,
    pub average_monthly_sales: f64,
    pub top_distributor: RankedGroup,
    pub top_product: RankedGroup,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesPoint {
    pub month_year: String,
    pub predicted_sales: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub kpis: KpiSet,
    pub series: Vec<TimeSeriesPoint>,
}

/// The fixed column subset shown in the detailed data view.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    pub month_year: String,
    pub distributor: String,
    pub customer_name: String,
    pub country: String,
    pub channel: String,
    pub product_name: String,
    pub product_class: String,
    pub quantity: f64,
    pub price: f64,
    pub predicted_sales: f64,
}
