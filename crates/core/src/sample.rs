use serde::{Deserialize, Serialize};

/// One resource reading of the host process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// CPU utilisation over the preceding interval; 1.0 = one saturated core.
    pub cpu: f32,
    /// Resident memory in bytes.
    pub memory: u64,
}

/// Immutable snapshot of the sample history as two index-aligned series.
///
/// `memory[i]` and `cpu[i]` always describe the same sample, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub memory: Vec<u64>,
    pub cpu: Vec<f32>,
}

impl Report {
    /// Split an ordered run of samples into parallel series.
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Self {
        let (memory, cpu) = samples.into_iter().map(|s| (s.memory, s.cpu)).unzip();
        Self { memory, cpu }
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Re-pair the series into samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.memory
            .iter()
            .zip(&self.cpu)
            .map(|(&memory, &cpu)| Sample { cpu, memory })
    }

    /// Most recent sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        self.samples().last()
    }

    /// Mean CPU utilisation across the window.
    #[must_use]
    pub fn average_cpu(&self) -> f32 {
        if self.cpu.is_empty() {
            return 0.0;
        }
        self.cpu.iter().sum::<f32>() / self.cpu.len() as f32
    }

    /// Highest resident memory seen in the window.
    #[must_use]
    pub fn peak_memory(&self) -> Option<u64> {
        self.memory.iter().copied().max()
    }
}
