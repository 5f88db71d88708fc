use std::collections::BTreeSet;

use crate::models::{DimensionValues, EnrichedRecord, SalesRecord};

/// Sentinel understood by the selection surface as "no constraint".
pub const WILDCARD: &str = "All";

/// Conjunctive equality constraints over the four filterable dimensions.
/// `None` leaves a dimension unconstrained; matches are case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub country: Option<String>,
    pub channel: Option<String>,
    pub product_class: Option<String>,
    pub sales_team: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from raw selections, treating the wildcard sentinel
    /// the same as no selection.
    pub fn from_selections(
        country: Option<String>,
        channel: Option<String>,
        product_class: Option<String>,
        sales_team: Option<String>,
    ) -> Self {
        Self {
            country: normalize(country),
            channel: normalize(channel),
            product_class: normalize(product_class),
            sales_team: normalize(sales_team),
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        dimension_ok(&self.country, &record.country)
            && dimension_ok(&self.channel, &record.channel)
            && dimension_ok(&self.product_class, &record.product_class)
            && dimension_ok(&self.sales_team, &record.sales_team)
    }

    /// Human-readable label for reports and log lines.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(value) = &self.country {
            parts.push(format!("country {value}"));
        }
        if let Some(value) = &self.channel {
            parts.push(format!("channel {value}"));
        }
        if let Some(value) = &self.product_class {
            parts.push(format!("product class {value}"));
        }
        if let Some(value) = &self.sales_team {
            parts.push(format!("sales team {value}"));
        }
        if parts.is_empty() {
            "all records".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn normalize(selection: Option<String>) -> Option<String> {
    selection.filter(|value| value != WILDCARD)
}

fn dimension_ok(criterion: &Option<String>, value: &str) -> bool {
    criterion.as_deref().map_or(true, |wanted| wanted == value)
}

/// Keep the records satisfying every constraint, in their original order.
pub fn apply(records: &[EnrichedRecord], criteria: &FilterCriteria) -> Vec<EnrichedRecord> {
    records
        .iter()
        .filter(|enriched| criteria.matches(&enriched.record))
        .cloned()
        .collect()
}

/// Selectable values per dimension for the current dataset. Computed from
/// the observed rows, not from static configuration.
pub fn dimension_values(records: &[SalesRecord]) -> DimensionValues {
    DimensionValues {
        countries: distinct(records, |r| r.country.as_str()),
        channels: distinct(records, |r| r.channel.as_str()),
        product_classes: distinct(records, |r| r.product_class.as_str()),
        sales_teams: distinct(records, |r| r.sales_team.as_str()),
    }
}

fn distinct<F>(records: &[SalesRecord], field: F) -> Vec<String>
where
    F: Fn(&SalesRecord) -> &str,
{
    let observed: BTreeSet<&str> = records.iter().map(&field).collect();
    let mut values = vec![WILDCARD.to_string()];
    values.extend(observed.into_iter().map(str::to_string));
    values
}
