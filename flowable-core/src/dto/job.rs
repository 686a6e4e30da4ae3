//! Job DTOs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::handler::HandlerVariable;

/// Which engine the acquired jobs belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    /// Process-flow jobs
    #[default]
    Bpmn,
    /// Case-flow jobs
    Cmmn,
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeType::Bpmn => f.write_str("bpmn"),
            ScopeType::Cmmn => f.write_str("cmmn"),
        }
    }
}

impl FromStr for ScopeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bpmn" => Ok(ScopeType::Bpmn),
            "cmmn" => Ok(ScopeType::Cmmn),
            other => Err(format!("unknown scope type '{}', expected bpmn or cmmn", other)),
        }
    }
}

/// Body of the acquire request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireRequest {
    /// Topic the jobs are published under
    pub topic: String,
    /// ISO-8601 duration the acquired jobs stay locked for this worker
    pub lock_duration: String,
    pub number_of_tasks: u32,
    pub number_of_retries: u32,
    pub worker_id: String,
    pub scope_type: ScopeType,
}

/// Body of the complete request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteJob {
    pub worker_id: String,
    pub variables: Vec<HandlerVariable>,
}

/// Body shared by the fail, bpmnError and cmmnTerminate requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFailure {
    pub worker_id: String,
    pub variables: Vec<HandlerVariable>,
    pub error_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_acquire_request_wire_shape() {
        let req = AcquireRequest {
            topic: "invoices".to_string(),
            lock_duration: "PT10M".to_string(),
            number_of_tasks: 2,
            number_of_retries: 5,
            worker_id: "worker-1".to_string(),
            scope_type: ScopeType::Cmmn,
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "topic": "invoices",
                "lockDuration": "PT10M",
                "numberOfTasks": 2,
                "numberOfRetries": 5,
                "workerId": "worker-1",
                "scopeType": "cmmn"
            })
        );
    }

    #[test]
    fn test_complete_body_has_no_error_code() {
        let body = CompleteJob {
            worker_id: "w".to_string(),
            variables: vec![],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("errorCode").is_none());
        assert_eq!(value, json!({"workerId": "w", "variables": []}));
    }

    #[test]
    fn test_scope_type_parse() {
        assert_eq!("BPMN".parse::<ScopeType>().unwrap(), ScopeType::Bpmn);
        assert_eq!(" cmmn ".parse::<ScopeType>().unwrap(), ScopeType::Cmmn);
        assert!("dmn".parse::<ScopeType>().is_err());
    }
}
