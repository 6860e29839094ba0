use serde::{Deserialize, Serialize};

/// How oracle calls are scheduled.
///
/// CPU inference fans out across a dedicated worker pool; GPU inference runs on
/// a single stream, so calls are issued one at a time from the caller thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExecutionMode {
    Cpu {
        /// Worker threads; `0` means one per available core.
        #[serde(default)]
        workers: usize,
    },
    Gpu,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Cpu { workers: 0 }
    }
}

impl ExecutionMode {
    pub fn is_serialized(&self) -> bool {
        matches!(self, ExecutionMode::Gpu)
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu { workers: 0 }),
            "gpu" | "cuda" => Ok(Self::Gpu),
            _ => Err(format!("Unknown execution mode: {}", s)),
        }
    }
}
