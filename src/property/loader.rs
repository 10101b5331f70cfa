//! Load property catalogs from CSV
//!
//! Expected header:
//! `id,name,kind,ready_price,price_per_sqm,private_area,condo_fee,annual_property_tax,`
//! `monthly_rent,construction_phase,developer_rating,liquidity_score,discount_score,tags`
//!
//! Optional columns may be left empty; tags are `;`-separated.

use csv::Reader;
use log::info;
use std::path::Path;

use super::{ConstructionPhase, PropertyKind, PropertyRecord};
use crate::error::LoadError;

/// Raw CSV row matching the catalog columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    kind: String,
    ready_price: Option<f64>,
    price_per_sqm: Option<f64>,
    // Empty cells read as zero
    private_area: Option<f64>,
    condo_fee: Option<f64>,
    annual_property_tax: Option<f64>,
    monthly_rent: Option<f64>,
    construction_phase: Option<String>,
    developer_rating: Option<f64>,
    liquidity_score: Option<f64>,
    discount_score: Option<f64>,
    #[serde(default)]
    tags: String,
}

impl CsvRow {
    fn into_record(self, line: u64) -> Result<PropertyRecord, LoadError> {
        let invalid = |reason: String| LoadError::Record { line, reason };

        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "ready" => PropertyKind::Ready,
            "off_plan" | "offplan" | "under_construction" => PropertyKind::OffPlan,
            other => return Err(invalid(format!("Unknown property kind: {}", other))),
        };

        let construction_phase = match self.construction_phase.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(phase) => Some(parse_phase(phase).ok_or_else(|| {
                invalid(format!("Unknown construction phase: {}", phase))
            })?),
        };

        let tags = self
            .tags
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Ok(PropertyRecord {
            id: self.id,
            name: self.name,
            kind,
            ready_price: self.ready_price,
            price_per_sqm: self.price_per_sqm,
            private_area: self.private_area.unwrap_or(0.0),
            condo_fee: self.condo_fee.unwrap_or(0.0),
            annual_property_tax: self.annual_property_tax.unwrap_or(0.0),
            monthly_rent: self.monthly_rent,
            construction_phase,
            developer_rating: self.developer_rating,
            liquidity_score: self.liquidity_score,
            discount_score: self.discount_score,
            tags,
        })
    }
}

fn parse_phase(phase: &str) -> Option<ConstructionPhase> {
    match phase.to_ascii_lowercase().as_str() {
        "launch" => Some(ConstructionPhase::Launch),
        "foundation" => Some(ConstructionPhase::Foundation),
        "structure" => Some(ConstructionPhase::Structure),
        "finishing" => Some(ConstructionPhase::Finishing),
        "delivered" => Some(ConstructionPhase::Delivered),
        _ => None,
    }
}

/// Load all properties from a CSV file
pub fn load_properties<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyRecord>, LoadError> {
    let path = path.as_ref();
    let records = load_properties_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} properties from {}", records.len(), path.display());
    Ok(records)
}

/// Load properties from any reader (e.g., string buffer, network stream)
pub fn load_properties_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PropertyRecord>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        records.push(row.into_record(idx as u64 + 2)?);
    }

    Ok(records)
}
