use crate::env::EnvError;

/// Number of observation fields describing one flow.
pub const FLOW_STRIDE: usize = 6;
/// Position of the age-of-information field inside a flow record.
pub const AOI_OFFSET: usize = 4;
/// Position of the channel-quality-indicator field inside a flow record.
pub const CQI_OFFSET: usize = 5;

/// One logical channel of one UE as reported by the scheduler.
///
/// Fields keep the order in which they appear on the wire:
/// `(rnti, lc_id, priority, hol_delay, aoi, cqi)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowRecord {
    pub rnti: f64,
    pub lc_id: f64,
    pub priority: f64,
    pub hol_delay: f64,
    pub aoi: f64,
    pub cqi: f64,
}

impl FlowRecord {
    /// Builds a record from exactly [`FLOW_STRIDE`] fields.
    #[must_use]
    pub fn from_fields(fields: &[f64; FLOW_STRIDE]) -> Self {
        Self {
            rnti: fields[0],
            lc_id: fields[1],
            priority: fields[2],
            hol_delay: fields[3],
            aoi: fields[AOI_OFFSET],
            cqi: fields[CQI_OFFSET],
        }
    }

    #[must_use]
    pub fn to_fields(&self) -> [f64; FLOW_STRIDE] {
        [
            self.rnti,
            self.lc_id,
            self.priority,
            self.hol_delay,
            self.aoi,
            self.cqi,
        ]
    }

    /// Number of flows in a flat observation.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedObservation`] when the length is not a
    /// multiple of [`FLOW_STRIDE`].
    pub fn count(observation: &[f64]) -> Result<usize, EnvError> {
        if observation.len() % FLOW_STRIDE != 0 {
            return Err(EnvError::MalformedObservation {
                len: observation.len(),
                stride: FLOW_STRIDE,
            });
        }
        Ok(observation.len() / FLOW_STRIDE)
    }

    /// Splits a flat observation into flow records, in order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FlowRecord::count`].
    pub fn parse_all(observation: &[f64]) -> Result<Vec<Self>, EnvError> {
        Self::count(observation)?;
        Ok(observation
            .chunks_exact(FLOW_STRIDE)
            .map(|chunk| {
                let mut fields = [0.0; FLOW_STRIDE];
                fields.copy_from_slice(chunk);
                Self::from_fields(&fields)
            })
            .collect())
    }

    /// Flattens records back into the wire layout.
    #[must_use]
    pub fn flatten(records: &[Self]) -> Vec<f64> {
        records.iter().flat_map(Self::to_fields).collect()
    }
}
