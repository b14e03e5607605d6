//! Ingest for stimband: parsing persisted stat dictionaries and deriving the
//! per-stimulus mean statistics the grouping logic runs on.
//!
//! The upstream pipeline persists one dictionary per question, shaped
//! `{question: {stimulus: {"raw": [...], "n": n}}}`; stimband reads the JSON
//! serialization of that structure. Stimulus keys follow the
//! `<question>_Viewpoint_<n>_scale_<name>` convention, which is also where
//! the scale annotations for viewpoint-averaged reports come from.

use std::collections::BTreeMap;
use stimband_types::{StatDict, StimulusStat};

const VIEWPOINT_MARKER: &str = "_Viewpoint";
const SCALE_MARKER: &str = "_scale_";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to parse stat dictionary")]
    Parse(#[from] serde_json::Error),

    #[error("stimulus '{0}' has no raw observations")]
    EmptyObservations(String),

    #[error("stimulus key '{key}' is missing the '{marker}' marker")]
    MalformedStimulusKey { key: String, marker: &'static str },
}

/// Parse the JSON serialization of a persisted stat dictionary.
pub fn parse_stat_dict(bytes: &[u8]) -> Result<StatDict, IngestError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Mean rating per stimulus, across all questions in the dictionary.
///
/// Stimuli are emitted in the dictionary's (lexicographic) key order, which
/// downstream grouping preserves as discovery order. An empty observation
/// vector is a fatal integrity error, not a NaN.
pub fn stimulus_means(dict: &StatDict) -> Result<Vec<StimulusStat>, IngestError> {
    let mut stats = Vec::new();
    for stimuli in dict.values() {
        for (stimulus, obs) in stimuli {
            stats.push(StimulusStat::new(stimulus.clone(), mean(stimulus, &obs.raw)?));
        }
    }
    Ok(stats)
}

/// Mean rating per question, over the concatenated raw observations of all
/// of its viewpoints.
pub fn viewpoint_averaged_means(dict: &StatDict) -> Result<Vec<StimulusStat>, IngestError> {
    let mut stats = Vec::new();
    for (question, stimuli) in dict {
        let all: Vec<f64> = stimuli.values().flat_map(|obs| obs.raw.iter().copied()).collect();
        stats.push(StimulusStat::new(question.clone(), mean(question, &all)?));
    }
    Ok(stats)
}

/// Extract the scale name for each question from stimulus keys shaped
/// `<question>_Viewpoint_<n>_scale_<name>`.
///
/// Later viewpoints of the same question overwrite earlier ones; the scale
/// name is identical across viewpoints in well-formed data.
pub fn scales_by_question<'a, I>(keys: I) -> Result<BTreeMap<String, String>, IngestError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scales = BTreeMap::new();
    for key in keys {
        let question = key.find(VIEWPOINT_MARKER).map(|at| &key[..at]).ok_or_else(|| {
            IngestError::MalformedStimulusKey {
                key: key.to_string(),
                marker: VIEWPOINT_MARKER,
            }
        })?;
        let scale = key
            .find(SCALE_MARKER)
            .map(|at| &key[at + SCALE_MARKER.len()..])
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IngestError::MalformedStimulusKey {
                key: key.to_string(),
                marker: SCALE_MARKER,
            })?;
        scales.insert(question.to_string(), scale.to_string());
    }
    Ok(scales)
}

/// Parse an item/question association map and return its stimulus keys.
///
/// The association values (question texts) are not used by stimband; only
/// the keys carry the scale names.
pub fn parse_item_associations(bytes: &[u8]) -> Result<Vec<String>, IngestError> {
    let map: BTreeMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;
    Ok(map.into_keys().collect())
}

fn mean(id: &str, values: &[f64]) -> Result<f64, IngestError> {
    if values.is_empty() {
        return Err(IngestError::EmptyObservations(id.to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}
