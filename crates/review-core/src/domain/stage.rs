//! Pipeline stage sequence.

use serde::{Deserialize, Serialize};

/// Stages of a single review run.
///
/// Runs move strictly forward: `Idle → Collecting → Checking →
/// Synthesizing → Publishing → Done`, or into `Failed` from any stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Collecting,
    Checking,
    Synthesizing,
    Publishing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Collecting => "collecting",
            PipelineStage::Checking => "checking",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Publishing => "publishing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }

    /// Whether `next` is a legal transition from this stage.
    ///
    /// Stages may be skipped (e.g. no checks configured, publishing
    /// disabled) but never revisited.
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == PipelineStage::Failed {
            return true;
        }
        next.ordinal() > self.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            PipelineStage::Idle => 0,
            PipelineStage::Collecting => 1,
            PipelineStage::Checking => 2,
            PipelineStage::Synthesizing => 3,
            PipelineStage::Publishing => 4,
            PipelineStage::Done => 5,
            PipelineStage::Failed => 6,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
