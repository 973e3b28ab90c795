//! Attribute plan modifiers
//!
//! Plan modifiers run after the host has computed a proposed value for an
//! attribute. They can replace the planned value or mark the attribute as
//! requiring the resource to be destroyed and recreated.

use crate::types::{Diagnostic, Dynamic};

#[derive(Debug, Clone)]
pub struct PlanModifyRequest {
    pub attribute: String,
    pub config: Dynamic,
    /// Prior value, None when the resource is being created
    pub state: Option<Dynamic>,
    pub plan: Dynamic,
}

#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan: Dynamic,
    pub requires_replace: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlanModifyResponse {
    fn unchanged(request: PlanModifyRequest) -> Self {
        Self {
            plan: request.plan,
            requires_replace: false,
            diagnostics: Vec::new(),
        }
    }
}

pub trait PlanModifier: Send + Sync {
    /// Human-readable description
    fn description(&self) -> String;
    fn modify(&self, request: PlanModifyRequest) -> PlanModifyResponse;
}

/// Marks an attribute as requiring replacement when its known value changes
/// on an existing resource
pub struct RequiresReplace;

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "changing this value forces a new resource".to_string()
    }

    fn modify(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let requires_replace = match &request.state {
            None => false,
            Some(state) => {
                !state.is_unknown() && !request.plan.is_unknown() && !values_equal(state, &request.plan)
            }
        };

        PlanModifyResponse {
            requires_replace,
            ..PlanModifyResponse::unchanged(request)
        }
    }
}

/// Uses the prior state value when the planned value is unknown.
/// Keeps server-assigned identifiers and timestamps stable across updates.
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "value does not change once known".to_string()
    }

    fn modify(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan = match (&request.plan, &request.state) {
            (Dynamic::Unknown, Some(state)) if !state.is_null() => state.clone(),
            _ => request.plan.clone(),
        };

        PlanModifyResponse {
            plan,
            ..PlanModifyResponse::unchanged(request)
        }
    }
}

/// Structural equality with a tolerance for float noise
pub fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    match (a, b) {
        (Dynamic::Null, Dynamic::Null) => true,
        (Dynamic::Unknown, Dynamic::Unknown) => true,
        (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
        (Dynamic::Number(a), Dynamic::Number(b)) => (a - b).abs() < f64::EPSILON,
        (Dynamic::String(a), Dynamic::String(b)) => a == b,
        (Dynamic::List(a), Dynamic::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Dynamic::Map(a), Dynamic::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|v2| values_equal(v, v2)))
        }
        _ => false,
    }
}
