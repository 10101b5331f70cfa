//! Property data structures consumed by the analyzer

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Whether the unit is finished or bought off-plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Finished unit sold at a listed price
    Ready,
    /// Under construction, priced per m²
    OffPlan,
}

/// Construction progress of an off-plan unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionPhase {
    Launch,
    Foundation,
    Structure,
    Finishing,
    Delivered,
}

/// One catalogued property with the financial attributes the engine needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    pub name: String,
    pub kind: PropertyKind,

    /// Listed price, for ready units
    pub ready_price: Option<f64>,
    /// Price per m², for off-plan units
    pub price_per_sqm: Option<f64>,
    /// Private area in m²
    pub private_area: f64,

    /// Monthly condo fee
    pub condo_fee: f64,
    /// Annual property tax (IPTU)
    pub annual_property_tax: f64,

    /// Monthly rent estimate; defaults from preferences when absent
    pub monthly_rent: Option<f64>,

    pub construction_phase: Option<ConstructionPhase>,
    /// Developer rating on a 0-10 scale
    pub developer_rating: Option<f64>,

    /// Caller-judged liquidity in [0, 1]
    pub liquidity_score: Option<f64>,
    /// Caller-judged discount to market in [0, 1]
    pub discount_score: Option<f64>,

    pub tags: Vec<String>,
}

impl PropertyRecord {
    /// Minimal ready-unit record
    pub fn ready(id: impl Into<String>, name: impl Into<String>, price: f64, private_area: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: PropertyKind::Ready,
            ready_price: Some(price),
            price_per_sqm: None,
            private_area,
            condo_fee: 0.0,
            annual_property_tax: 0.0,
            monthly_rent: None,
            construction_phase: None,
            developer_rating: None,
            liquidity_score: None,
            discount_score: None,
            tags: Vec::new(),
        }
    }

    /// Minimal off-plan record
    pub fn off_plan(
        id: impl Into<String>,
        name: impl Into<String>,
        price_per_sqm: f64,
        private_area: f64,
        phase: ConstructionPhase,
    ) -> Self {
        Self {
            kind: PropertyKind::OffPlan,
            ready_price: None,
            price_per_sqm: Some(price_per_sqm),
            construction_phase: Some(phase),
            ..Self::ready(id, name, 0.0, private_area)
        }
    }

    /// Purchase price: listed price for ready units, price/m² × area off-plan
    pub fn total_price(&self) -> EngineResult<f64> {
        let price = match self.kind {
            PropertyKind::Ready => self.ready_price.unwrap_or(0.0),
            PropertyKind::OffPlan => self.price_per_sqm.unwrap_or(0.0) * self.private_area,
        };

        if price.is_finite() && price > 0.0 {
            Ok(price)
        } else {
            Err(EngineError::invalid_input(format!(
                "property {} has no usable price ({})",
                self.id, price
            )))
        }
    }

    /// Effective price per m², if the area is known
    pub fn effective_price_per_sqm(&self) -> Option<f64> {
        if self.private_area <= 0.0 {
            return None;
        }
        match self.kind {
            PropertyKind::OffPlan => self.price_per_sqm,
            PropertyKind::Ready => self.ready_price.map(|p| p / self.private_area),
        }
    }
}
