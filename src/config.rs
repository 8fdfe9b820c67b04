use rootcause::{Report, report};
use serde::{Deserialize, Serialize};

/// Tuning knobs of the prover. Every field has a default, so a partial JSON object is enough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Upper bound on MSM chunks running at once. Defaults to the size of the rayon pool.
    pub cpus: Option<usize>,
    /// The G2 MSM is cut in three once each third would hold more than this many points.
    pub g2_split_min_chunk: usize,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            cpus: None,
            g2_split_min_chunk: 10,
        }
    }
}

impl ProverConfig {
    pub fn from_json(json: &str) -> Result<Self, Report> {
        serde_json::from_str(json)
            .map_err(|err| report!("Invalid prover config").attach(err.to_string()))
    }

    pub fn cpus(&self) -> usize {
        self.cpus.unwrap_or_else(rayon::current_num_threads).max(1)
    }
}
