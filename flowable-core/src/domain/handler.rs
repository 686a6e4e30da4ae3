//! Handler verdict types

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a handler disposed of a job
///
/// Each known variant maps to exactly one terminal action on the engine.
/// Any other value deserializes to `Unknown` and results in no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandlerStatus {
    Success,
    Fail,
    BpmnError,
    CmmnTerminate,
    #[serde(other)]
    Unknown,
}

impl HandlerStatus {
    /// Wire name of the status, which is also the action path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerStatus::Success => "success",
            HandlerStatus::Fail => "fail",
            HandlerStatus::BpmnError => "bpmnError",
            HandlerStatus::CmmnTerminate => "cmmnTerminate",
            HandlerStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HandlerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single process or case variable
///
/// `value` holds any JSON scalar or document. Names are not guaranteed to be
/// unique when decoded from the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerVariable {
    pub name: String,
    #[serde(rename = "type", default)]
    pub var_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl HandlerVariable {
    pub fn new(
        name: impl Into<String>,
        var_type: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            var_type: var_type.into(),
            value: value.into(),
        }
    }
}

/// Structured result returned by a handler
///
/// The runtime only ever fills in `worker_id` when it is empty and defaults
/// `error_code` for failure statuses when the handler left it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResult {
    pub status: HandlerStatus,
    #[serde(default)]
    pub worker_id: String,
    #[serde(default)]
    pub variables: Vec<HandlerVariable>,
    #[serde(default)]
    pub error_code: String,
}

impl HandlerResult {
    /// Creates an empty result carrying only a status
    pub fn new(status: HandlerStatus) -> Self {
        Self {
            status,
            worker_id: String::new(),
            variables: Vec::new(),
            error_code: String::new(),
        }
    }

    /// Successful result with the given output variables
    pub fn success(variables: Vec<HandlerVariable>) -> Self {
        Self {
            variables,
            ..Self::new(HandlerStatus::Success)
        }
    }

    /// Failed result with the given error code
    pub fn failed(error_code: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            ..Self::new(HandlerStatus::Fail)
        }
    }

    /// Appends an output variable
    pub fn with_variable(mut self, variable: HandlerVariable) -> Self {
        self.variables.push(variable);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        let statuses: Vec<HandlerStatus> =
            serde_json::from_value(json!(["success", "fail", "bpmnError", "cmmnTerminate"]))
                .unwrap();
        assert_eq!(
            statuses,
            vec![
                HandlerStatus::Success,
                HandlerStatus::Fail,
                HandlerStatus::BpmnError,
                HandlerStatus::CmmnTerminate,
            ]
        );
    }

    #[test]
    fn test_unrecognized_status_is_unknown() {
        let status: HandlerStatus = serde_json::from_value(json!("retryLater")).unwrap();
        assert_eq!(status, HandlerStatus::Unknown);
    }

    #[test]
    fn test_variable_serializes_type_key() {
        let var = HandlerVariable::new("count", "integer", 3);
        assert_eq!(
            serde_json::to_value(&var).unwrap(),
            json!({"name": "count", "type": "integer", "value": 3})
        );
    }

    #[test]
    fn test_result_deserializes_with_defaults() {
        let result: HandlerResult = serde_json::from_value(json!({"status": "fail"})).unwrap();
        assert_eq!(result.status, HandlerStatus::Fail);
        assert!(result.worker_id.is_empty());
        assert!(result.variables.is_empty());
        assert!(result.error_code.is_empty());
    }
}
