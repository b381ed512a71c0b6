//! Intrinsic property types and their unit vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Closed enumeration of intrinsic physicochemical property kinds.
///
/// Mirrors the `property_type` SQL enum; one `chemical_properties` header
/// row exists per (chemical, property type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    MolecularMass,
    Solubility,
    Viscosity,
    TgPrime,
    PartitionCoefficient,
    DielectricConstant,
    ThermalConductivity,
    HeatCapacity,
    ThermalExpansionCoefficient,
    CrystallizationTemperature,
    DiffusionCoefficient,
    HydrogenBondDonorsAcceptors,
    SourceOfCompound,
    GrasCertification,
    MeltingPoint,
    Hydrophobicity,
    Density,
    RefractiveIndex,
    SurfaceTension,
    Ph,
    OsmolalityOsmolarity,
    PolarSurfaceArea,
}

impl PropertyType {
    /// Database/wire representation (matches the SQL enum labels).
    pub fn as_str(&self) -> &'static str {
        use PropertyType::*;
        match self {
            MolecularMass => "MOLECULAR_MASS",
            Solubility => "SOLUBILITY",
            Viscosity => "VISCOSITY",
            TgPrime => "TG_PRIME",
            PartitionCoefficient => "PARTITION_COEFFICIENT",
            DielectricConstant => "DIELECTRIC_CONSTANT",
            ThermalConductivity => "THERMAL_CONDUCTIVITY",
            HeatCapacity => "HEAT_CAPACITY",
            ThermalExpansionCoefficient => "THERMAL_EXPANSION_COEFFICIENT",
            CrystallizationTemperature => "CRYSTALLIZATION_TEMPERATURE",
            DiffusionCoefficient => "DIFFUSION_COEFFICIENT",
            HydrogenBondDonorsAcceptors => "HYDROGEN_BOND_DONORS_ACCEPTORS",
            SourceOfCompound => "SOURCE_OF_COMPOUND",
            GrasCertification => "GRAS_CERTIFICATION",
            MeltingPoint => "MELTING_POINT",
            Hydrophobicity => "HYDROPHOBICITY",
            Density => "DENSITY",
            RefractiveIndex => "REFRACTIVE_INDEX",
            SurfaceTension => "SURFACE_TENSION",
            Ph => "PH",
            OsmolalityOsmolarity => "OSMOLALITY_OSMOLARITY",
            PolarSurfaceArea => "POLAR_SURFACE_AREA",
        }
    }

    /// Allowed units for this property type, or `None` when the type
    /// carries no unit constraint (dimensionless or free-form).
    pub fn allowed_units(&self) -> Option<&'static [&'static str]> {
        use PropertyType::*;
        match self {
            MolecularMass => Some(&["g/mol", "Da", "kDa"]),
            Solubility => Some(&["mg/mL", "g/100 mL", "% w/v"]),
            Viscosity => Some(&["mPa.s", "cP"]),
            TgPrime => Some(&["degC", "degK"]),
            PartitionCoefficient => Some(&["logP"]),
            DielectricConstant => None,
            ThermalConductivity => Some(&["W/(m.K)"]),
            HeatCapacity => Some(&["J/(g.K)", "J/(mol.K)"]),
            ThermalExpansionCoefficient => Some(&["1/K"]),
            CrystallizationTemperature => Some(&["degC", "degK"]),
            DiffusionCoefficient => Some(&["m2/s", "cm2/s"]),
            HydrogenBondDonorsAcceptors => Some(&["count"]),
            SourceOfCompound => Some(&["text"]),
            GrasCertification => Some(&["boolean"]),
            MeltingPoint => Some(&["degC", "degK"]),
            Hydrophobicity => Some(&["qualitative"]),
            Density => Some(&["g/cm3", "kg/m3"]),
            RefractiveIndex => None,
            SurfaceTension => Some(&["mN/m", "dyn/cm"]),
            Ph => None,
            OsmolalityOsmolarity => Some(&["Osmol/kg", "Osmol/L"]),
            PolarSurfaceArea => Some(&["A2"]),
        }
    }

    /// Validate a supplied unit against the allowed list.
    ///
    /// A missing unit is always accepted; a unit outside the list fails
    /// that single fact, never the whole document.
    pub fn validate_unit(&self, unit: Option<&str>) -> Result<()> {
        let Some(unit) = unit else {
            return Ok(());
        };
        match self.allowed_units() {
            Some(units) if !units.contains(&unit) => Err(IngestError::InvalidUnit {
                unit: unit.to_string(),
                property_type: *self,
            }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
