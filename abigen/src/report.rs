use std::fmt;

/// A unit that could not be generated. The rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// Contract or script name, or the artifact path when the artifact itself is unreadable.
    pub name: String,
    pub cause: String,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.cause)
    }
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// File names written to the output directory, in write order.
    pub generated: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, name: impl Into<String>, cause: impl fmt::Display) {
        self.failures.push(UnitFailure {
            name: name.into(),
            cause: cause.to_string(),
        });
    }
}
