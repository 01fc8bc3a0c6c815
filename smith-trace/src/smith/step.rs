use serde::{Deserialize, Serialize};

use crate::matrix::ElementaryOp;

/// Change of nesting depth a marker asks the consumer to apply after printing it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indent {
    Enter,
    Stay,
    Exit,
}

impl Indent {
    pub fn delta(self) -> i32 {
        match self {
            Indent::Enter => 1,
            Indent::Stay => 0,
            Indent::Exit => -1,
        }
    }
}

/// One element of the decomposition trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Opens, annotates or closes a stage. Closing markers carry no description.
    Marker {
        description: Option<String>,
        indent: Indent,
    },
    /// An operation that has been applied to the matrix by the time the step is seen.
    Operation {
        description: String,
        op: ElementaryOp,
    },
}

impl Step {
    pub fn enter(description: impl Into<String>) -> Self {
        Step::Marker {
            description: Some(description.into()),
            indent: Indent::Enter,
        }
    }

    pub fn note(description: impl Into<String>) -> Self {
        Step::Marker {
            description: Some(description.into()),
            indent: Indent::Stay,
        }
    }

    pub fn exit() -> Self {
        Step::Marker {
            description: None,
            indent: Indent::Exit,
        }
    }

    pub fn operation(description: impl Into<String>, op: ElementaryOp) -> Self {
        Step::Operation {
            description: description.into(),
            op,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Step::Marker { description, .. } => description.as_deref(),
            Step::Operation { description, .. } => Some(description),
        }
    }

    /// Operations never change the nesting depth.
    pub fn indent(&self) -> Indent {
        match self {
            Step::Marker { indent, .. } => *indent,
            Step::Operation { .. } => Indent::Stay,
        }
    }

    pub fn op(&self) -> Option<&ElementaryOp> {
        match self {
            Step::Marker { .. } => None,
            Step::Operation { op, .. } => Some(op),
        }
    }

    pub fn is_operation(&self) -> bool {
        matches!(self, Step::Operation { .. })
    }
}
