//! The closed set of supported spectral indices.
//!
//! Each index carries everything the pipeline needs to stay generic: the
//! source catalog, the per-observation band math, and the display palette.
//! NDVI, NDWI and SAVI come from Sentinel-2 surface reflectance; RVI comes
//! from Sentinel-1 radar backscatter.

use std::fmt;

/// Sentinel-2 surface reflectance catalog (optical indices).
pub const OPTICAL_COLLECTION: &str = "COPERNICUS/S2_SR";
/// Sentinel-1 ground-range-detected catalog (radar indices).
pub const RADAR_COLLECTION: &str = "COPERNICUS/S1_GRD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Ndvi,
    Rvi,
    Ndwi,
    Savi,
}

/// Per-observation band math, evaluated inside the compute service.
#[derive(Debug, Clone, Copy)]
pub enum BandMath {
    /// `(a - b) / (a + b)` over two named bands.
    NormalizedDifference { a: &'static str, b: &'static str },
    /// Free-form expression over named inputs. `inputs` maps expression
    /// variables to source bands; `constants` supplies scalar variables.
    Expression {
        formula: &'static str,
        inputs: &'static [(&'static str, &'static str)],
        constants: &'static [(&'static str, f64)],
    },
}

/// Everything that distinguishes one index pipeline from another.
#[derive(Debug, Clone, Copy)]
pub struct IndexDefinition {
    pub kind: IndexKind,
    pub collection: &'static str,
    pub band_math: BandMath,
    pub palette: &'static [&'static str],
}

const WARM_PALETTE: &[&str] = &["blue", "green", "yellow", "orange", "red"];
const RADAR_PALETTE: &[&str] = &["blue", "cyan", "green", "yellow", "orange", "red"];

impl IndexKind {
    pub const ALL: [IndexKind; 4] = [IndexKind::Ndvi, IndexKind::Rvi, IndexKind::Ndwi, IndexKind::Savi];

    /// Output band name, also the prefix of the statistic keys
    /// (`NDVI_mean`, `NDVI_stdDev`, ...).
    pub fn band(&self) -> &'static str {
        match self {
            IndexKind::Ndvi => "NDVI",
            IndexKind::Rvi => "RVI",
            IndexKind::Ndwi => "NDWI",
            IndexKind::Savi => "SAVI",
        }
    }

    pub fn definition(&self) -> IndexDefinition {
        match self {
            IndexKind::Ndvi => IndexDefinition {
                kind: *self,
                collection: OPTICAL_COLLECTION,
                band_math: BandMath::NormalizedDifference { a: "B8", b: "B4" },
                palette: WARM_PALETTE,
            },
            IndexKind::Ndwi => IndexDefinition {
                kind: *self,
                collection: OPTICAL_COLLECTION,
                band_math: BandMath::NormalizedDifference { a: "B3", b: "B8" },
                palette: WARM_PALETTE,
            },
            IndexKind::Savi => IndexDefinition {
                kind: *self,
                collection: OPTICAL_COLLECTION,
                band_math: BandMath::Expression {
                    formula: "((NIR - RED) / (NIR + RED + L)) * (1 + L)",
                    inputs: &[("NIR", "B8"), ("RED", "B4")],
                    constants: &[("L", 0.5)],
                },
                palette: WARM_PALETTE,
            },
            IndexKind::Rvi => IndexDefinition {
                kind: *self,
                collection: RADAR_COLLECTION,
                band_math: BandMath::Expression {
                    formula: "4 * VH / (VV + VH)",
                    inputs: &[("VH", "VH"), ("VV", "VV")],
                    constants: &[],
                },
                palette: RADAR_PALETTE,
            },
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.band())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radar_index_uses_radar_collection() {
        assert_eq!(IndexKind::Rvi.definition().collection, RADAR_COLLECTION);
        for kind in [IndexKind::Ndvi, IndexKind::Ndwi, IndexKind::Savi] {
            assert_eq!(kind.definition().collection, OPTICAL_COLLECTION);
        }
    }

    #[test]
    fn rvi_palette_includes_cyan() {
        assert!(IndexKind::Rvi.definition().palette.contains(&"cyan"));
        assert_eq!(IndexKind::Rvi.definition().palette.len(), 6);
        assert_eq!(IndexKind::Ndvi.definition().palette.len(), 5);
    }

    #[test]
    fn ndwi_inverts_ndvi_band_order() {
        match IndexKind::Ndwi.definition().band_math {
            BandMath::NormalizedDifference { a, b } => {
                assert_eq!((a, b), ("B3", "B8"));
            }
            _ => panic!("NDWI should be a normalized difference"),
        }
    }

    #[test]
    fn display_matches_band_name() {
        for kind in IndexKind::ALL {
            assert_eq!(kind.to_string(), kind.band());
        }
    }
}
