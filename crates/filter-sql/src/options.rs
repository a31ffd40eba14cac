use serde::{Deserialize, Serialize};

/// How a nested empty filter object (`{}`) is compiled in single-target mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyNodePolicy {
    /// The empty object contributes nothing to its parent.
    #[default]
    Skip,
    /// The empty object compiles to `(1=1)` and is joined like any other operand.
    Tautology,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default)]
    pub empty_nodes: EmptyNodePolicy,
}

impl CompileOptions {
    pub fn empty_nodes(mut self, policy: EmptyNodePolicy) -> Self {
        self.empty_nodes = policy;
        self
    }
}
