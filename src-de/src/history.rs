//! Append-only ledger of generation snapshots.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// State of the population at the end of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// 0 for the evaluated seed population.
    pub generation: usize,
    pub population: Array2<f64>,
    #[serde(with = "non_finite::array")]
    pub scores: Array1<f64>,
    /// Lowest-scoring candidate seen so far.
    pub best_member: Array1<f64>,
    #[serde(with = "non_finite::scalar")]
    pub best_score: f64,
    pub mean_cr: f64,
    pub mean_f: f64,
    /// Trials accepted during this generation (0 for the seed record).
    pub accepted: usize,
}

/// Scores as JSON numbers, with `"inf"`, `"-inf"` and `"nan"` standing in
/// for the values JSON cannot represent.
mod non_finite {
    use ndarray::Array1;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(f64),
        Text(String),
    }

    fn to_repr(v: f64) -> Repr {
        if v.is_finite() {
            Repr::Num(v)
        } else if v.is_nan() {
            Repr::Text("nan".to_string())
        } else if v > 0.0 {
            Repr::Text("inf".to_string())
        } else {
            Repr::Text("-inf".to_string())
        }
    }

    fn from_repr<E: Error>(r: Repr) -> Result<f64, E> {
        match r {
            Repr::Num(v) => Ok(v),
            Repr::Text(t) => match t.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(E::custom(format!("invalid score: {}", other))),
            },
        }
    }

    pub mod scalar {
        use super::*;

        pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
            to_repr(*v).serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
            from_repr(Repr::deserialize(d)?)
        }
    }

    pub mod array {
        use super::*;

        pub fn serialize<S: Serializer>(v: &Array1<f64>, s: S) -> Result<S::Ok, S::Error> {
            s.collect_seq(v.iter().map(|&x| to_repr(x)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Array1<f64>, D::Error> {
            Vec::<Repr>::deserialize(d)?.into_iter().map(from_repr).collect()
        }
    }
}

/// Generation records in ascending order; records are never modified once pushed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: Vec<GenerationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: GenerationRecord) {
        debug_assert_eq!(record.generation, self.records.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, generation: usize) -> Option<&GenerationRecord> {
        self.records.get(generation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    pub fn best_member(&self) -> Option<&Array1<f64>> {
        self.last().map(|r| &r.best_member)
    }

    pub fn best_score(&self) -> Option<f64> {
        self.last().map(|r| r.best_score)
    }

    pub fn final_population(&self) -> Option<&Array2<f64>> {
        self.last().map(|r| &r.population)
    }

    pub fn final_scores(&self) -> Option<&Array1<f64>> {
        self.last().map(|r| &r.scores)
    }

    pub fn populations(&self) -> Vec<&Array2<f64>> {
        self.records.iter().map(|r| &r.population).collect()
    }

    pub fn scores(&self) -> Vec<&Array1<f64>> {
        self.records.iter().map(|r| &r.scores).collect()
    }

    pub fn best_members(&self) -> Vec<&Array1<f64>> {
        self.records.iter().map(|r| &r.best_member).collect()
    }

    pub fn best_scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.best_score).collect()
    }

    /// Pretty JSON of all records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a GenerationRecord;
    type IntoIter = std::slice::Iter<'a, GenerationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
