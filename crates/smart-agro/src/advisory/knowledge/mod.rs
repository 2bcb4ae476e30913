//! Static domain tables the evaluators match observations against.
//!
//! A knowledge base is loaded once at startup, either from the built-in catalog or from
//! configured table files, and is shared read-only by every evaluator and view afterwards.

mod catalog;
mod loader;

pub use catalog::{builtin_crops, builtin_schemes, crop_catalog, scheme_catalog};
pub use loader::{CropTableImporter, SchemeTableImporter};

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::criterion::{normalize_text, Criterion};
use super::observation::ObservationField;
use crate::config::CatalogConfig;

/// Named item in a domain bundled with its admissibility criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord<M> {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    pub metadata: M,
}

impl<M> EntityRecord<M> {
    pub fn new(name: impl Into<String>, description: impl Into<String>, metadata: M) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            criteria: Vec::new(),
            metadata,
        }
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criterion_for(&self, field: ObservationField) -> Option<&Criterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.field() == Some(field))
    }
}

/// Static agronomic traits of a crop record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropTraits {
    pub drought_tolerant: bool,
}

/// Presentation details of a government scheme record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeDetails {
    pub benefits: String,
    pub website: String,
}

pub type CropRecord = EntityRecord<CropTraits>;
pub type SchemeRecord = EntityRecord<SchemeDetails>;
pub type CropKnowledgeBase = KnowledgeBase<CropTraits>;
pub type SchemeKnowledgeBase = KnowledgeBase<SchemeDetails>;

/// Ordered, immutable table of entity records for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase<M> {
    domain: String,
    entities: Vec<EntityRecord<M>>,
}

impl<M> KnowledgeBase<M> {
    pub fn new(domain: impl Into<String>, entities: Vec<EntityRecord<M>>) -> Self {
        Self {
            domain: domain.into(),
            entities,
        }
    }

    /// Build and validate in one step.
    pub fn try_new(
        domain: impl Into<String>,
        entities: Vec<EntityRecord<M>>,
    ) -> Result<Self, KnowledgeBaseError> {
        let knowledge_base = Self::new(domain, entities);
        knowledge_base.validate()?;
        Ok(knowledge_base)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn entities(&self) -> &[EntityRecord<M>] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord<M>> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EntityRecord<M>> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        let mut seen = HashSet::new();

        for entity in &self.entities {
            if entity.name.trim().is_empty() {
                return Err(self.invalid("entity with an empty name".to_string()));
            }
            if !seen.insert(entity.name.as_str()) {
                return Err(self.invalid(format!("duplicate entity `{}`", entity.name)));
            }

            for criterion in &entity.criteria {
                match criterion {
                    Criterion::Range {
                        field, min, max, ..
                    } => {
                        if !min.is_finite() || !max.is_finite() || min > max {
                            return Err(self.invalid(format!(
                                "`{}` has an invalid {field} range {min}..{max}",
                                entity.name
                            )));
                        }
                    }
                    Criterion::Set { field, allowed, .. } if allowed.is_empty() => {
                        return Err(self.invalid(format!(
                            "`{}` allows no {field} values",
                            entity.name
                        )));
                    }
                    Criterion::Set { field, allowed, .. }
                        if allowed.iter().any(|value| normalize_text(value).is_empty()) =>
                    {
                        return Err(self.invalid(format!(
                            "`{}` allows a blank {field} value",
                            entity.name
                        )));
                    }
                    Criterion::ThresholdMax { field, limit }
                    | Criterion::ThresholdMin { field, limit }
                        if !limit.is_finite() =>
                    {
                        return Err(self.invalid(format!(
                            "`{}` has a non-finite {field} threshold",
                            entity.name
                        )));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> KnowledgeBaseError {
        KnowledgeBaseError::Invalid {
            domain: self.domain.clone(),
            reason,
        }
    }
}

impl<'a, M> IntoIterator for &'a KnowledgeBase<M> {
    type Item = &'a EntityRecord<M>;
    type IntoIter = std::slice::Iter<'a, EntityRecord<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Errors raised while loading or validating domain tables.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid crop table: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid scheme table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("knowledge base `{domain}` is invalid: {reason}")]
    Invalid { domain: String, reason: String },
}

/// Crop and scheme tables resolved at startup.
#[derive(Debug, Clone)]
pub struct AdvisoryCatalog {
    pub crops: Arc<CropKnowledgeBase>,
    pub schemes: Arc<SchemeKnowledgeBase>,
}

impl AdvisoryCatalog {
    pub fn builtin() -> Self {
        Self {
            crops: Arc::new(builtin_crops().clone()),
            schemes: Arc::new(builtin_schemes().clone()),
        }
    }

    pub fn load(config: &CatalogConfig) -> Result<Self, KnowledgeBaseError> {
        let crops = match &config.crop_table {
            Some(path) => CropTableImporter::from_path(path, &config.tolerances)?,
            None => crop_catalog(&config.tolerances),
        };
        let schemes = match &config.scheme_table {
            Some(path) => SchemeTableImporter::from_path(path)?,
            None => builtin_schemes().clone(),
        };

        info!(
            crops = crops.len(),
            schemes = schemes.len(),
            custom_crops = config.crop_table.is_some(),
            custom_schemes = config.scheme_table.is_some(),
            "advisory catalog loaded"
        );

        Ok(Self {
            crops: Arc::new(crops),
            schemes: Arc::new(schemes),
        })
    }
}
