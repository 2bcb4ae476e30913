use serde::Serialize;

use super::CropRecommendation;
use crate::advisory::criterion::Criterion;
use crate::advisory::knowledge::{CropKnowledgeBase, CropRecord};
use crate::advisory::observation::ObservationField;

/// Display card for a crop, derived from its canonical knowledge-base record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropProfileView {
    pub name: String,
    pub soil: String,
    pub temperature: String,
    pub rainfall: String,
    pub ph_range: String,
    pub description: String,
    pub drought_tolerant: bool,
}

impl CropProfileView {
    pub fn from_record(record: &CropRecord) -> Self {
        let soil = match record.criterion_for(ObservationField::SoilType) {
            Some(Criterion::Set { allowed, .. }) => allowed
                .iter()
                .map(|soil| title_case(soil))
                .collect::<Vec<_>>()
                .join(", "),
            _ => "Any".to_string(),
        };

        Self {
            name: record.name.clone(),
            soil,
            temperature: range_label(record, ObservationField::Temperature, "°C", whole),
            rainfall: range_label(record, ObservationField::Rainfall, "mm", whole),
            ph_range: range_label(record, ObservationField::Ph, "", |value| {
                format!("{value:.1}")
            }),
            description: record.description.clone(),
            drought_tolerant: record.metadata.drought_tolerant,
        }
    }
}

/// Attach display cards to ranked crops, skipping names absent from the table.
pub fn recommendation_views(
    recommendations: &[CropRecommendation],
    knowledge_base: &CropKnowledgeBase,
) -> Vec<CropProfileView> {
    recommendations
        .iter()
        .filter_map(|recommendation| knowledge_base.get(&recommendation.name))
        .map(CropProfileView::from_record)
        .collect()
}

fn range_label(
    record: &CropRecord,
    field: ObservationField,
    unit: &str,
    render: impl Fn(f64) -> String,
) -> String {
    match record.criterion_for(field) {
        Some(Criterion::Range { min, max, .. }) => {
            format!("{}-{}{unit}", render(*min), render(*max))
        }
        _ => "Any".to_string(),
    }
}

fn whole(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::knowledge::builtin_crops;

    #[test]
    fn view_renders_requirements_from_the_record() {
        let chickpea = builtin_crops()
            .get("Chickpea (Chana)")
            .expect("chickpea present");
        let view = CropProfileView::from_record(chickpea);

        assert_eq!(view.soil, "Sandy Loam, Loamy, Black Cotton");
        assert_eq!(view.temperature, "20-30°C");
        assert_eq!(view.rainfall, "250-600mm");
        assert_eq!(view.ph_range, "6.0-8.0");
        assert!(view.drought_tolerant);
    }

    #[test]
    fn views_follow_recommendation_order() {
        let recommendations = ["Moth Bean", "Unknown Crop", "Castor"]
            .into_iter()
            .map(|name| CropRecommendation {
                name: name.to_string(),
                description: String::new(),
                score: 0,
                components: Vec::new(),
            })
            .collect::<Vec<_>>();

        let views = recommendation_views(&recommendations, builtin_crops());
        let names: Vec<_> = views.iter().map(|view| view.name.as_str()).collect();
        assert_eq!(names, ["Moth Bean", "Castor"]);
    }
}
