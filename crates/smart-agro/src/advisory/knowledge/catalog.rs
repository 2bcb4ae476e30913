use std::sync::OnceLock;

use super::{
    CropKnowledgeBase, CropRecord, CropTraits, KnowledgeBase, SchemeDetails, SchemeKnowledgeBase,
    SchemeRecord,
};
use crate::advisory::criterion::{Criterion, SetMatching};
use crate::advisory::crops::ToleranceBands;
use crate::advisory::observation::ObservationField;

pub(crate) const CROP_DOMAIN: &str = "crops";
pub(crate) const SCHEME_DOMAIN: &str = "schemes";

struct CropRow {
    name: &'static str,
    soils: &'static [&'static str],
    ph: (f64, f64),
    rainfall: (f64, f64),
    temperature: (f64, f64),
    drought_tolerant: bool,
    description: &'static str,
}

static CROPS: [CropRow; 10] = [
    CropRow {
        name: "Pearl Millet (Bajra)",
        soils: &["sandy", "sandy loam", "loamy"],
        ph: (6.0, 7.5),
        rainfall: (200.0, 600.0),
        temperature: (25.0, 35.0),
        drought_tolerant: true,
        description: "Highly drought-resistant cereal crop that grows well in low rainfall areas.",
    },
    CropRow {
        name: "Sorghum (Jowar)",
        soils: &["sandy loam", "loamy", "clay loam"],
        ph: (5.5, 8.5),
        rainfall: (300.0, 650.0),
        temperature: (25.0, 32.0),
        drought_tolerant: true,
        description: "Drought-resistant crop, good for arid and semi-arid regions.",
    },
    CropRow {
        name: "Chickpea (Chana)",
        soils: &["sandy loam", "loamy", "black cotton"],
        ph: (6.0, 8.0),
        rainfall: (250.0, 600.0),
        temperature: (20.0, 30.0),
        drought_tolerant: true,
        description: "Legume crop that fixes nitrogen and is drought-tolerant.",
    },
    CropRow {
        name: "Pigeon Pea (Arhar/Toor)",
        soils: &["sandy loam", "loamy", "red"],
        ph: (6.0, 7.5),
        rainfall: (250.0, 800.0),
        temperature: (20.0, 35.0),
        drought_tolerant: true,
        description: "Deep-rooted legume, good for dryland farming.",
    },
    CropRow {
        name: "Moth Bean",
        soils: &["sandy", "sandy loam"],
        ph: (6.0, 8.0),
        rainfall: (200.0, 500.0),
        temperature: (25.0, 38.0),
        drought_tolerant: true,
        description: "One of the most drought-resistant pulses, grows in arid conditions.",
    },
    CropRow {
        name: "Cluster Bean (Guar)",
        soils: &["sandy", "sandy loam"],
        ph: (6.0, 8.5),
        rainfall: (150.0, 450.0),
        temperature: (25.0, 40.0),
        drought_tolerant: true,
        description: "Highly drought-resistant, used for vegetable, fodder, and guar gum.",
    },
    CropRow {
        name: "Castor",
        soils: &["sandy loam", "loamy", "clay loam"],
        ph: (5.0, 8.5),
        rainfall: (200.0, 500.0),
        temperature: (20.0, 35.0),
        drought_tolerant: true,
        description: "Oilseed crop that can grow in poor soils with low rainfall.",
    },
    CropRow {
        name: "Sesame (Til)",
        soils: &["sandy loam", "loamy"],
        ph: (5.5, 8.0),
        rainfall: (200.0, 500.0),
        temperature: (25.0, 35.0),
        drought_tolerant: true,
        description: "Drought-resistant oilseed crop, grows well in hot conditions.",
    },
    CropRow {
        name: "Cowpea (Lobia)",
        soils: &["sandy", "sandy loam", "loamy"],
        ph: (5.5, 7.5),
        rainfall: (250.0, 700.0),
        temperature: (20.0, 35.0),
        drought_tolerant: true,
        description: "Heat and drought-tolerant legume, good for dry regions.",
    },
    CropRow {
        name: "Mung Bean (Green Gram)",
        soils: &["sandy loam", "loamy"],
        ph: (6.0, 7.5),
        rainfall: (250.0, 600.0),
        temperature: (25.0, 35.0),
        drought_tolerant: true,
        description: "Short-duration crop, relatively drought-resistant.",
    },
];

/// Growing requirements of one crop, before tolerance bands are attached.
pub(crate) struct CropRequirements {
    pub(crate) soils: Vec<String>,
    pub(crate) ph: (f64, f64),
    pub(crate) rainfall: (f64, f64),
    pub(crate) temperature: (f64, f64),
}

pub(crate) fn crop_record(
    name: impl Into<String>,
    description: impl Into<String>,
    requirements: CropRequirements,
    traits: CropTraits,
    bands: &ToleranceBands,
) -> CropRecord {
    let CropRequirements {
        soils,
        ph,
        rainfall,
        temperature,
    } = requirements;

    CropRecord::new(name, description, traits)
        .with_criterion(
            Criterion::set(ObservationField::SoilType, soils).with_matching(SetMatching::Contains),
        )
        .with_criterion(
            Criterion::range(ObservationField::Ph, ph.0, ph.1).with_tolerance(bands.ph_band()),
        )
        .with_criterion(
            Criterion::range(ObservationField::Rainfall, rainfall.0, rainfall.1)
                .with_tolerance(bands.rainfall_band()),
        )
        .with_criterion(
            Criterion::range(ObservationField::Temperature, temperature.0, temperature.1)
                .with_tolerance(bands.temperature_band()),
        )
}

/// Dryland crop table built with the given near-miss bands.
pub fn crop_catalog(bands: &ToleranceBands) -> CropKnowledgeBase {
    let entities = CROPS
        .iter()
        .map(|row| {
            crop_record(
                row.name,
                row.description,
                CropRequirements {
                    soils: row.soils.iter().map(|soil| soil.to_string()).collect(),
                    ph: row.ph,
                    rainfall: row.rainfall,
                    temperature: row.temperature,
                },
                CropTraits {
                    drought_tolerant: row.drought_tolerant,
                },
                bands,
            )
        })
        .collect();

    KnowledgeBase::new(CROP_DOMAIN, entities)
}

/// Government schemes with their eligibility rules.
pub fn scheme_catalog() -> SchemeKnowledgeBase {
    let owners = || Criterion::set(ObservationField::LandOwnership, ["own", "lease"]);
    let bank_account = || Criterion::Flag {
        field: ObservationField::HasBankAccount,
        expected: true,
    };
    let aadhaar = || Criterion::Flag {
        field: ObservationField::AadhaarLinked,
        expected: true,
    };

    let entities = vec![
        SchemeRecord::new(
            "PM-KISAN",
            "Income support of ₹6,000 per year to all farmer families",
            details("₹6,000 per year in three installments", "https://pmkisan.gov.in/"),
        )
        .with_criterion(owners())
        .with_criterion(Criterion::ThresholdMax {
            field: ObservationField::AnnualIncome,
            limit: 150_000.0,
        })
        .with_criterion(Criterion::set(
            ObservationField::CasteCategory,
            ["general", "obc", "sc", "st"],
        ))
        .with_criterion(bank_account())
        .with_criterion(aadhaar()),
        SchemeRecord::new(
            "PM Fasal Bima Yojana",
            "Crop insurance scheme to protect against crop failure",
            details("Insurance coverage for crop failure", "https://pmfby.gov.in/"),
        )
        .with_criterion(owners())
        .with_criterion(Criterion::AlwaysTrue {
            note: Some("any crop type".to_string()),
        })
        .with_criterion(bank_account())
        .with_criterion(aadhaar()),
        SchemeRecord::new(
            "Kisan Credit Card (KCC)",
            "Easy credit access for farmers",
            details(
                "Low-interest loans up to ₹3 lakh",
                "https://www.iffcobank.com/kisan-credit-card.html",
            ),
        )
        .with_criterion(owners())
        .with_criterion(Criterion::ThresholdMin {
            field: ObservationField::Age,
            limit: 18.0,
        })
        .with_criterion(Criterion::ThresholdMax {
            field: ObservationField::Age,
            limit: 75.0,
        })
        .with_criterion(bank_account())
        .with_criterion(aadhaar()),
        SchemeRecord::new(
            "Soil Health Card Scheme",
            "Provides soil health cards to farmers",
            details(
                "Free soil testing and recommendations",
                "https://soilhealth.dac.gov.in/",
            ),
        )
        .with_criterion(Criterion::AlwaysTrue {
            note: Some("all farmers".to_string()),
        }),
        SchemeRecord::new(
            "National Mission for Sustainable Agriculture",
            "Promotes sustainable agriculture practices",
            details(
                "Subsidy on seeds, equipment, and training",
                "https://nmsa.dac.gov.in/",
            ),
        )
        .with_criterion(owners())
        .with_criterion(Criterion::ThresholdMax {
            field: ObservationField::AnnualIncome,
            limit: 500_000.0,
        }),
    ];

    KnowledgeBase::new(SCHEME_DOMAIN, entities)
}

fn details(benefits: &str, website: &str) -> SchemeDetails {
    SchemeDetails {
        benefits: benefits.to_string(),
        website: website.to_string(),
    }
}

/// Process-wide crop table with the default near-miss bands.
pub fn builtin_crops() -> &'static CropKnowledgeBase {
    static CROPS_TABLE: OnceLock<CropKnowledgeBase> = OnceLock::new();
    CROPS_TABLE.get_or_init(|| crop_catalog(&ToleranceBands::default()))
}

/// Process-wide scheme table.
pub fn builtin_schemes() -> &'static SchemeKnowledgeBase {
    static SCHEMES_TABLE: OnceLock<SchemeKnowledgeBase> = OnceLock::new();
    SCHEMES_TABLE.get_or_init(scheme_catalog)
}
