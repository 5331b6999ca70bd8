//! Condition data loaded from the CSV data directory.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use super::csv::Table;
use super::text;
use crate::error::KnowledgeError;

pub const DATASET_FILE: &str = "dataset.csv";
pub const DESCRIPTION_FILE: &str = "symptom_Description.csv";
pub const PRECAUTION_FILE: &str = "symptom_precaution.csv";
pub const SEVERITY_FILE: &str = "Symptom-severity.csv";

const SYMPTOM_COLUMNS: usize = 17;
const PRECAUTION_COLUMNS: usize = 4;
const MISSING_DESCRIPTION: &str = "Description not available.";

/// A normalised symptom phrase and the tokens it matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomPhrase {
    /// Normalised phrase, e.g. `"skin rash"`; also the severity key.
    pub text: String,
    /// Content tokens that must all appear in the user's message.
    pub tokens: BTreeSet<String>,
}

impl SymptomPhrase {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = text::content_tokens(&text).map(str::to_string).collect();
        Self { text, tokens }
    }
}

/// A condition with its symptoms, description and precautions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub name: String,
    pub symptoms: Vec<SymptomPhrase>,
    pub description: String,
    pub precautions: Vec<String>,
}

/// Conditions plus per-symptom severity weights.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    conditions: Vec<Condition>,
    weights: HashMap<String, u32>,
}

impl KnowledgeBase {
    pub fn new(conditions: Vec<Condition>, weights: HashMap<String, u32>) -> Self {
        Self {
            conditions,
            weights,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the four data files from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, KnowledgeError> {
        let dataset = Table::read(&dir.join(DATASET_FILE))?;
        let descriptions = Table::read(&dir.join(DESCRIPTION_FILE))?;
        let precautions = Table::read(&dir.join(PRECAUTION_FILE))?;
        let severity = Table::read(&dir.join(SEVERITY_FILE))?;
        Self::from_tables(&dataset, &descriptions, &precautions, &severity)
    }

    /// Load from `dir`, falling back to an empty base on any error.
    pub fn load_or_empty(dir: &Path) -> Self {
        match Self::load_from_dir(dir) {
            Ok(kb) => {
                tracing::info!(
                    name: "knowledge.loaded",
                    conditions = kb.conditions.len(),
                    weights = kb.weights.len(),
                    dir = %dir.display(),
                    "Knowledge base loaded"
                );
                if kb.weights.is_empty() {
                    tracing::warn!("Symptom severity weights are empty, every symptom weighs 1");
                }
                kb
            }
            Err(e) => {
                tracing::error!(
                    name: "knowledge.load_failed",
                    error = %e,
                    dir = %dir.display(),
                    "Knowledge base could not be loaded, starting empty"
                );
                Self::empty()
            }
        }
    }

    /// Build from already parsed tables.
    pub fn from_tables(
        dataset: &Table,
        descriptions: &Table,
        precautions: &Table,
        severity: &Table,
    ) -> Result<Self, KnowledgeError> {
        let symptom_columns: Vec<String> = (1..=SYMPTOM_COLUMNS)
            .map(|i| format!("Symptom_{i}"))
            .collect();
        let precaution_columns: Vec<String> = (1..=PRECAUTION_COLUMNS)
            .map(|i| format!("Precaution_{i}"))
            .collect();

        dataset.require(&["Disease"])?;
        descriptions.require(&["Disease", "Description"])?;
        precautions.require(&["Disease"])?;
        severity.require(&["Symptom", "weight"])?;

        // BTreeMap keeps condition order stable across runs.
        let mut symptoms: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in dataset.records() {
            let disease = record.get("Disease").trim();
            if disease.is_empty() {
                continue;
            }
            let entry = symptoms.entry(disease.to_string()).or_default();
            for column in &symptom_columns {
                let phrase = text::normalize_phrase(record.get(column));
                if !phrase.is_empty() {
                    entry.insert(phrase);
                }
            }
        }

        let mut description_map = HashMap::new();
        for record in descriptions.records() {
            let disease = record.get("Disease").trim();
            if !disease.is_empty() {
                description_map.insert(
                    disease.to_string(),
                    record.get("Description").trim().to_string(),
                );
            }
        }

        let mut precaution_map = HashMap::new();
        for record in precautions.records() {
            let disease = record.get("Disease").trim();
            if disease.is_empty() {
                continue;
            }
            let items: Vec<String> = precaution_columns
                .iter()
                .map(|c| record.get(c).trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !items.is_empty() {
                precaution_map.insert(disease.to_string(), items);
            }
        }

        let mut weights = HashMap::new();
        for record in severity.records() {
            let raw = record.get("Symptom").trim();
            let weight = record.get("weight").trim();
            if raw.is_empty() || weight.is_empty() {
                continue;
            }
            let key = text::normalize_phrase(raw);
            if key.is_empty() {
                continue;
            }
            match weight.parse::<u32>() {
                Ok(w) => {
                    weights.insert(key, w);
                }
                Err(_) => {
                    tracing::warn!(symptom = %raw, weight = %weight, "Skipping unparseable severity weight");
                }
            }
        }

        let names: BTreeSet<String> = symptoms
            .keys()
            .chain(description_map.keys())
            .chain(precaution_map.keys())
            .cloned()
            .collect();

        let conditions = names
            .into_iter()
            .map(|name| Condition {
                symptoms: symptoms
                    .remove(&name)
                    .unwrap_or_default()
                    .into_iter()
                    .map(SymptomPhrase::new)
                    .collect(),
                description: description_map
                    .remove(&name)
                    .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
                precautions: precaution_map.remove(&name).unwrap_or_default(),
                name,
            })
            .collect();

        Ok(Self {
            conditions,
            weights,
        })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name == name)
    }

    /// Severity weight of a normalised phrase; 1 when unknown.
    pub fn weight(&self, phrase: &str) -> u32 {
        self.weights.get(phrase).copied().unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(file: &str, text: &str) -> Table {
        Table::parse(file, text).unwrap().unwrap()
    }

    fn sample() -> KnowledgeBase {
        KnowledgeBase::from_tables(
            &table(
                DATASET_FILE,
                "Disease,Symptom_1,Symptom_2,Symptom_3\n\
                 Fungal infection,itching, skin_rash,nodal_skin_eruptions\n\
                 Fungal infection,itching, skin_rash,\n\
                 Migraine,headache, blurred_and_distorted_vision,\n",
            ),
            &table(
                DESCRIPTION_FILE,
                "Disease,Description\nFungal infection,A fungus.\nCommon Cold,A virus.\n",
            ),
            &table(
                PRECAUTION_FILE,
                "Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n\
                 Migraine,meditation,,reduce stress,\n",
            ),
            &table(SEVERITY_FILE, "Symptom,weight\nitching,1\nskin_rash,3\nheadache,x\n"),
        )
        .unwrap()
    }

    #[test]
    fn merges_all_sources() {
        let kb = sample();
        let names: Vec<_> = kb.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Common Cold", "Fungal infection", "Migraine"]);

        let cold = kb.condition("Common Cold").unwrap();
        assert!(cold.symptoms.is_empty());
        assert_eq!(cold.description, "A virus.");

        let migraine = kb.condition("Migraine").unwrap();
        assert_eq!(migraine.description, MISSING_DESCRIPTION);
        assert_eq!(migraine.precautions, ["meditation", "reduce stress"]);
    }

    #[test]
    fn symptoms_are_deduplicated_and_normalised() {
        let kb = sample();
        let fungal = kb.condition("Fungal infection").unwrap();
        let texts: Vec<_> = fungal.symptoms.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["itching", "nodal skin eruption", "skin rash"]);
    }

    #[test]
    fn weights_skip_bad_values() {
        let kb = sample();
        assert_eq!(kb.weight("skin rash"), 3);
        assert_eq!(kb.weight("headache"), 1);
        assert_eq!(kb.weight("unknown"), 1);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = KnowledgeBase::from_tables(
            &table(DATASET_FILE, "Illness\nFlu\n"),
            &table(DESCRIPTION_FILE, "Disease,Description\n"),
            &table(PRECAUTION_FILE, "Disease\n"),
            &table(SEVERITY_FILE, "Symptom,weight\n"),
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingColumn { .. }));
    }
}
