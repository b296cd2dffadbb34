//! # Asphalt Tonnage Estimator
//!
//! Hot-mix asphalt tonnage by zone: `tons = area * (thickness/12) * density
//! / 2000`, where density varies by mix type and a compaction factor varies
//! by surface preparation. Density is never a single constant: standard,
//! premium, and recycled mixes compact differently.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Pounds per US short ton
const LB_PER_TON: f64 = 2000.0;

/// Hot-mix asphalt blend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixType {
    Standard,
    Premium,
    Recycled,
}

impl MixType {
    /// Compacted density in pounds per cubic foot.
    pub fn density_lb_per_cuft(&self) -> f64 {
        match self {
            MixType::Standard => 145.0,
            MixType::Premium => 148.0,
            MixType::Recycled => 140.0,
        }
    }
}

/// How the zone is being paved, which drives a compaction allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSurfaceType {
    /// Full-depth new pavement
    New,
    /// Overlay on existing pavement; slightly less material lost to voids
    Overlay,
    /// Patch repair; irregular edges waste material
    Patch,
}

impl ZoneSurfaceType {
    /// Material multiplier applied to the geometric volume.
    pub fn compaction_factor(&self) -> f64 {
        match self {
            ZoneSurfaceType::New => 1.0,
            ZoneSurfaceType::Overlay => 0.95,
            ZoneSurfaceType::Patch => 1.10,
        }
    }
}

/// One paving zone in a material estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialZone {
    /// Zone label (e.g., "Main lot", "Drive lane")
    pub zone_name: String,
    /// Zone length in feet
    pub length_ft: f64,
    /// Zone width in feet
    pub width_ft: f64,
    /// Compacted lift thickness in inches
    pub thickness_in: f64,
    /// Surface preparation
    pub surface_type: ZoneSurfaceType,
    /// Mix blend for this zone
    pub mix_type: MixType,
    /// Display/processing order, unique within the estimate
    pub zone_order: u32,
}

/// Input parameters for a multi-zone asphalt estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsphaltInput {
    /// All zones in the estimate
    pub zones: Vec<MaterialZone>,
    /// Delivered mix price per ton, supplied by the caller
    pub cost_per_ton: f64,
}

impl AsphaltInput {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.zones.is_empty() {
            return Err(EstimateError::invalid_input(
                "zones",
                "[]",
                "At least one zone is required",
            ));
        }
        if self.cost_per_ton < 0.0 {
            return Err(EstimateError::invalid_input(
                "cost_per_ton",
                self.cost_per_ton.to_string(),
                "Cost rate cannot be negative",
            ));
        }

        let mut orders: Vec<u32> = Vec::with_capacity(self.zones.len());
        for (i, zone) in self.zones.iter().enumerate() {
            if zone.length_ft <= 0.0 {
                return Err(EstimateError::invalid_input(
                    format!("zones[{}].length_ft", i),
                    zone.length_ft.to_string(),
                    "Zone length must be positive",
                ));
            }
            if zone.width_ft <= 0.0 {
                return Err(EstimateError::invalid_input(
                    format!("zones[{}].width_ft", i),
                    zone.width_ft.to_string(),
                    "Zone width must be positive",
                ));
            }
            if zone.thickness_in <= 0.0 {
                return Err(EstimateError::invalid_input(
                    format!("zones[{}].thickness_in", i),
                    zone.thickness_in.to_string(),
                    "Zone thickness must be positive",
                ));
            }
            if orders.contains(&zone.zone_order) {
                return Err(EstimateError::invalid_input(
                    format!("zones[{}].zone_order", i),
                    zone.zone_order.to_string(),
                    "Zone order values must be unique",
                ));
            }
            orders.push(zone.zone_order);
        }
        Ok(())
    }
}

/// Per-zone result, reported in `zone_order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub zone_order: u32,
    pub zone_name: String,
    pub mix_type: MixType,
    /// Zone area in square feet
    pub area_sqft: f64,
    /// Geometric volume in cubic feet
    pub volume_cuft: f64,
    /// Tons of mix including the compaction allowance
    pub tons: f64,
    /// Mix cost for this zone
    pub cost: f64,
}

/// Results from an asphalt estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsphaltOutput {
    /// Per-zone breakdown, sorted by `zone_order`
    pub zones: Vec<ZoneResult>,
    /// Sum of zone areas in square feet
    pub total_area_sqft: f64,
    /// Sum of geometric volumes in cubic feet
    pub total_volume_cuft: f64,
    /// Total mix tonnage
    pub total_tons: f64,
    /// Total mix cost
    pub total_cost: f64,
    /// Human-readable description for the history ledger
    pub formula_text: String,
}

/// Tonnage for a single area at a given thickness and mix.
///
/// The building block the zone estimate sums over; exposed for quick
/// single-surface checks.
pub fn tonnage(area_sqft: f64, thickness_in: f64, mix: MixType) -> EstimateResult<f64> {
    if area_sqft <= 0.0 {
        return Err(EstimateError::invalid_input(
            "area_sqft",
            area_sqft.to_string(),
            "Area must be positive",
        ));
    }
    if thickness_in <= 0.0 {
        return Err(EstimateError::invalid_input(
            "thickness_in",
            thickness_in.to_string(),
            "Thickness must be positive",
        ));
    }
    Ok(area_sqft * (thickness_in / 12.0) * mix.density_lb_per_cuft() / LB_PER_TON)
}

/// Estimate mix tonnage and cost across all zones.
pub fn calculate(input: &AsphaltInput) -> EstimateResult<AsphaltOutput> {
    input.validate()?;

    let mut ordered: Vec<&MaterialZone> = input.zones.iter().collect();
    ordered.sort_by_key(|z| z.zone_order);

    let mut zones = Vec::with_capacity(ordered.len());
    let mut total_area = 0.0;
    let mut total_volume = 0.0;
    let mut total_tons = 0.0;

    for zone in ordered {
        let area = zone.length_ft * zone.width_ft;
        let volume = area * zone.thickness_in / 12.0;
        let tons = volume * zone.mix_type.density_lb_per_cuft() / LB_PER_TON
            * zone.surface_type.compaction_factor();
        let cost = tons * input.cost_per_ton;

        total_area += area;
        total_volume += volume;
        total_tons += tons;

        zones.push(ZoneResult {
            zone_order: zone.zone_order,
            zone_name: zone.zone_name.clone(),
            mix_type: zone.mix_type,
            area_sqft: area,
            volume_cuft: volume,
            tons,
            cost,
        });
    }

    Ok(AsphaltOutput {
        zones,
        total_area_sqft: total_area,
        total_volume_cuft: total_volume,
        total_tons,
        total_cost: total_tons * input.cost_per_ton,
        formula_text: format!(
            "tons = area x (thickness/12) x mix density / 2000 over {} zones",
            input.zones.len()
        ),
    })
}
