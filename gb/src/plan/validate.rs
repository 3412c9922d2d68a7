//! Response validation
//!
//! Strict schema checks for model payloads. The `parse_*` entry points never
//! fail: a payload that does not match is logged and replaced with the offline
//! plan for the same input and language.

use serde_json::Value;
use tracing::{debug, error};

use super::fallback::{offline_plan, offline_sub_plan};
use crate::domain::{Complexity, GoalPlan, Language, STEP_COUNT, SchemaError, SubStepPlan};

/// Decode and check a breakdown payload
///
/// Requires an object with `steps` (exactly five non-empty strings) and an
/// integer `complexity` in 1..=10.
pub fn validate_breakdown(payload: &str) -> Result<GoalPlan, SchemaError> {
    debug!(payload_len = payload.len(), "validate_breakdown: called");
    let data = decode_object(payload)?;

    let steps = data
        .get("steps")
        .and_then(Value::as_array)
        .ok_or(SchemaError::StepsNotAList)?;
    if steps.len() != STEP_COUNT {
        return Err(SchemaError::StepCount {
            expected: STEP_COUNT,
            actual: steps.len(),
        });
    }
    let steps = steps
        .iter()
        .enumerate()
        .map(|(index, step)| match step.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
            _ => Err(SchemaError::BlankStep { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // as_i64 rejects floats and bools, which must not pass as integers
    let complexity = data
        .get("complexity")
        .and_then(Value::as_i64)
        .ok_or(SchemaError::Complexity)
        .and_then(Complexity::new)?;

    GoalPlan::new(steps, complexity)
}

/// Decode and check a sub-breakdown payload
///
/// Requires an object with a `substeps` list; keeps the first three entries and
/// coerces non-string entries to their JSON text.
pub fn validate_sub_breakdown(payload: &str) -> Result<SubStepPlan, SchemaError> {
    debug!(payload_len = payload.len(), "validate_sub_breakdown: called");
    let data = decode_object(payload)?;

    let substeps = data
        .get("substeps")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingSubsteps)?;

    Ok(SubStepPlan::new(
        substeps
            .iter()
            .take(crate::domain::MAX_SUBSTEPS)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    ))
}

/// Validate a breakdown payload, falling back to the offline plan on failure
pub fn parse_breakdown(payload: &str, goal: &str, language: Language) -> GoalPlan {
    match validate_breakdown(payload) {
        Ok(plan) => plan,
        Err(e) => {
            error!(error = %e, "Failed to parse model response, using offline plan");
            offline_plan(goal, language)
        }
    }
}

/// Validate a sub-breakdown payload, falling back to the offline sub-plan on failure
pub fn parse_sub_breakdown(payload: &str, step: &str, language: Language) -> SubStepPlan {
    match validate_sub_breakdown(payload) {
        Ok(plan) => plan,
        Err(e) => {
            error!(error = %e, "Failed to parse model sub-response, using offline sub-plan");
            offline_sub_plan(step, language)
        }
    }
}

fn decode_object(payload: &str) -> Result<serde_json::Map<String, Value>, SchemaError> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SchemaError::NotAnObject),
        Err(e) => Err(SchemaError::InvalidJson(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> String {
        value.to_string()
    }

    #[test]
    fn test_valid_breakdown() {
        let plan = validate_breakdown(&payload(json!({
            "steps": ["a", "b", "c", "d", "e"],
            "complexity": 8
        })))
        .unwrap();
        assert_eq!(plan.steps[0], "a");
        assert_eq!(plan.complexity.get(), 8);
    }

    #[test]
    fn test_breakdown_wrong_step_count() {
        let err = validate_breakdown(&payload(json!({"steps": ["only one"], "complexity": 5}))).unwrap_err();
        assert_eq!(err, SchemaError::StepCount { expected: 5, actual: 1 });
    }

    #[test]
    fn test_breakdown_non_string_step() {
        let err = validate_breakdown(&payload(json!({
            "steps": ["a", "b", 3, "d", "e"],
            "complexity": 5
        })))
        .unwrap_err();
        assert_eq!(err, SchemaError::BlankStep { index: 2 });
    }

    #[test]
    fn test_breakdown_complexity_checks() {
        let steps = json!(["a", "b", "c", "d", "e"]);
        for bad in [json!(0), json!(11), json!(5.5), json!("5"), json!(true), Value::Null] {
            let err = validate_breakdown(&payload(json!({"steps": steps, "complexity": bad}))).unwrap_err();
            assert_eq!(err, SchemaError::Complexity, "complexity {bad} should be rejected");
        }
        let err = validate_breakdown(&payload(json!({"steps": steps}))).unwrap_err();
        assert_eq!(err, SchemaError::Complexity);
    }

    #[test]
    fn test_breakdown_shape_errors() {
        assert!(matches!(validate_breakdown("not json"), Err(SchemaError::InvalidJson(_))));
        assert_eq!(validate_breakdown("[1,2,3]").unwrap_err(), SchemaError::NotAnObject);
        assert_eq!(
            validate_breakdown(r#"{"steps": "a,b,c,d,e", "complexity": 3}"#).unwrap_err(),
            SchemaError::StepsNotAList
        );
    }

    #[test]
    fn test_parse_breakdown_falls_back() {
        let plan = parse_breakdown(r#"{"steps": ["only one"], "complexity": 5}"#, "Launch a rocket", Language::En);
        assert_eq!(plan, offline_plan("Launch a rocket", Language::En));
    }

    #[test]
    fn test_sub_breakdown_truncates_and_coerces() {
        let plan = validate_sub_breakdown(&payload(json!({"substeps": ["one", 2, {"k": "v"}, "four"]}))).unwrap();
        assert_eq!(plan.substeps(), &["one", "2", "{\"k\":\"v\"}"]);
    }

    #[test]
    fn test_sub_breakdown_allows_short_lists() {
        let plan = validate_sub_breakdown(r#"{"substeps": []}"#).unwrap();
        assert!(plan.substeps().is_empty());
    }

    #[test]
    fn test_parse_sub_breakdown_falls_back() {
        let plan = parse_sub_breakdown(r#"{"steps": ["x"]}"#, "step", Language::Am);
        assert_eq!(plan, offline_sub_plan("step", Language::Am));

        let plan = parse_sub_breakdown("garbage", "step", Language::En);
        assert_eq!(plan.substeps()[0], "Initialize subsystem.");
    }
}
