use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::catalog::{crop_record, CropRequirements, CROP_DOMAIN, SCHEME_DOMAIN};
use super::{
    CropKnowledgeBase, CropTraits, KnowledgeBase, KnowledgeBaseError, SchemeKnowledgeBase,
    SchemeRecord,
};
use crate::advisory::criterion::normalize_text;
use crate::advisory::crops::ToleranceBands;

/// Reads a flat crop requirement table (one crop per CSV row).
pub struct CropTableImporter;

impl CropTableImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        bands: &ToleranceBands,
    ) -> Result<CropKnowledgeBase, KnowledgeBaseError> {
        let file = File::open(path)?;
        Self::from_reader(file, bands)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        bands: &ToleranceBands,
    ) -> Result<CropKnowledgeBase, KnowledgeBaseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entities = Vec::new();

        for row in csv_reader.deserialize::<CropRow>() {
            let row = row?;
            let soils = row
                .soils
                .split('|')
                .map(normalize_text)
                .filter(|soil| !soil.is_empty())
                .collect();

            entities.push(crop_record(
                row.name,
                row.description,
                CropRequirements {
                    soils,
                    ph: (row.ph_min, row.ph_max),
                    rainfall: (row.rainfall_min, row.rainfall_max),
                    temperature: (row.temperature_min, row.temperature_max),
                },
                CropTraits {
                    drought_tolerant: row.drought_tolerant,
                },
                bands,
            ));
        }

        debug!(crops = entities.len(), "crop table parsed");
        KnowledgeBase::try_new(CROP_DOMAIN, entities)
    }
}

#[derive(Debug, Deserialize)]
struct CropRow {
    name: String,
    soils: String,
    ph_min: f64,
    ph_max: f64,
    rainfall_min: f64,
    rainfall_max: f64,
    temperature_min: f64,
    temperature_max: f64,
    #[serde(default)]
    drought_tolerant: bool,
    #[serde(default)]
    description: String,
}

/// Reads a JSON array of scheme records with their criteria.
pub struct SchemeTableImporter;

impl SchemeTableImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SchemeKnowledgeBase, KnowledgeBaseError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SchemeKnowledgeBase, KnowledgeBaseError> {
        let entities: Vec<SchemeRecord> = serde_json::from_reader(reader)?;
        debug!(schemes = entities.len(), "scheme table parsed");
        KnowledgeBase::try_new(SCHEME_DOMAIN, entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::criterion::{Criterion, SetMatching, Tolerance};
    use crate::advisory::observation::ObservationField;
    use std::io::Cursor;

    const CROP_CSV: &str = "name,soils,ph_min,ph_max,rainfall_min,rainfall_max,temperature_min,temperature_max,drought_tolerant,description\n\
Finger Millet (Ragi), Red | Sandy Loam ,5.0,8.2,500,900,20,30,true,Hardy cereal for red soils.\n\
Paddy,clay|loamy,5.5,7.0,1000,2000,22,32,false,\n";

    #[test]
    fn crop_table_rows_become_banded_records() {
        let table = CropTableImporter::from_reader(Cursor::new(CROP_CSV), &ToleranceBands::default())
            .expect("crop table parses");

        assert_eq!(table.domain(), "crops");
        assert_eq!(table.len(), 2);

        let ragi = table.get("Finger Millet (Ragi)").expect("ragi present");
        assert!(ragi.metadata.drought_tolerant);
        assert_eq!(
            ragi.criterion_for(ObservationField::SoilType),
            Some(&Criterion::Set {
                field: ObservationField::SoilType,
                allowed: vec!["red".to_string(), "sandy loam".to_string()],
                matching: SetMatching::Contains,
            })
        );
        assert_eq!(
            ragi.criterion_for(ObservationField::Rainfall),
            Some(&Criterion::Range {
                field: ObservationField::Rainfall,
                min: 500.0,
                max: 900.0,
                tolerance: Some(Tolerance::Relative(0.2)),
            })
        );

        let paddy = table.get("Paddy").expect("paddy present");
        assert!(!paddy.metadata.drought_tolerant);
        assert!(paddy.description.is_empty());
    }

    #[test]
    fn crop_table_rejects_inverted_ranges() {
        let csv = "name,soils,ph_min,ph_max,rainfall_min,rainfall_max,temperature_min,temperature_max\n\
Broken,loamy,8.0,6.0,100,200,20,30\n";

        match CropTableImporter::from_reader(Cursor::new(csv), &ToleranceBands::default()) {
            Err(KnowledgeBaseError::Invalid { domain, reason }) => {
                assert_eq!(domain, "crops");
                assert!(reason.contains("Broken"));
            }
            other => panic!("expected invalid table, got {other:?}"),
        }
    }

    #[test]
    fn crop_table_surfaces_malformed_numbers() {
        let csv = "name,soils,ph_min,ph_max,rainfall_min,rainfall_max,temperature_min,temperature_max\n\
Broken,loamy,acidic,6.0,100,200,20,30\n";

        assert!(matches!(
            CropTableImporter::from_reader(Cursor::new(csv), &ToleranceBands::default()),
            Err(KnowledgeBaseError::Csv(_))
        ));
    }

    #[test]
    fn scheme_table_reads_tagged_criteria() {
        let json = r#"[
            {
                "name": "State Drip Subsidy",
                "description": "Micro-irrigation support",
                "criteria": [
                    { "kind": "set", "field": "land_ownership", "allowed": ["own"] },
                    { "kind": "threshold_max", "field": "land_size", "limit": 5.0 },
                    { "kind": "always_true" }
                ],
                "metadata": { "benefits": "55% subsidy", "website": "https://example.org/drip" }
            }
        ]"#;

        let table = SchemeTableImporter::from_reader(Cursor::new(json)).expect("scheme table parses");
        let scheme = table.get("State Drip Subsidy").expect("scheme present");

        assert_eq!(scheme.criteria.len(), 3);
        assert_eq!(
            scheme.criteria[0],
            Criterion::set(ObservationField::LandOwnership, ["own"])
        );
        assert_eq!(scheme.criteria[2], Criterion::AlwaysTrue { note: None });
        assert_eq!(scheme.metadata.benefits, "55% subsidy");
    }

    #[test]
    fn scheme_table_rejects_blank_allowed_values() {
        let json = r#"[
            {
                "name": "Open Door",
                "description": "",
                "criteria": [
                    { "kind": "set", "field": "land_ownership", "allowed": ["  "], "matching": "contains" }
                ],
                "metadata": { "benefits": "", "website": "" }
            }
        ]"#;

        match SchemeTableImporter::from_reader(Cursor::new(json)) {
            Err(KnowledgeBaseError::Invalid { domain, reason }) => {
                assert_eq!(domain, "schemes");
                assert!(reason.contains("Open Door"), "{reason}");
                assert!(reason.contains("blank"), "{reason}");
            }
            other => panic!("expected invalid table, got {other:?}"),
        }
    }

    #[test]
    fn crop_table_without_soils_is_rejected() {
        let csv = "name,soils,ph_min,ph_max,rainfall_min,rainfall_max,temperature_min,temperature_max\n\
Bare, | ,6.0,7.0,100,200,20,30\n";

        assert!(matches!(
            CropTableImporter::from_reader(Cursor::new(csv), &ToleranceBands::default()),
            Err(KnowledgeBaseError::Invalid { .. })
        ));
    }

    #[test]
    fn scheme_table_rejects_duplicate_names() {
        let json = r#"[
            { "name": "Twin", "description": "", "metadata": { "benefits": "", "website": "" } },
            { "name": "Twin", "description": "", "metadata": { "benefits": "", "website": "" } }
        ]"#;

        assert!(matches!(
            SchemeTableImporter::from_reader(Cursor::new(json)),
            Err(KnowledgeBaseError::Invalid { .. })
        ));
    }
}
