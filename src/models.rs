use serde::Serialize;

/// Outcome of checking one expression against a policy expression.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub expression: String,
    pub policy: String,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Satisfied,
    Unsatisfied,
    Invalid,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "satisfied"),
            Verdict::Unsatisfied => write!(f, "unsatisfied"),
            Verdict::Invalid => write!(f, "invalid"),
        }
    }
}

/// An expression together with its normalized form and DNF clauses.
#[derive(Debug, Clone, Serialize)]
pub struct ExpandedExpression {
    pub expression: String,
    pub normalized: String,
    pub clauses: Vec<Vec<String>>,
    /// Clause cap the expansion ran under.
    pub max_clauses: usize,
}
