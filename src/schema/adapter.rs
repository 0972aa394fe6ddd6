//! Batch parsing for assessment.request.v1
//!
//! Accepts either a JSON array of requests or NDJSON (one request per line).

use crate::error::AssessError;
use crate::schema::request::{AssessmentRequest, ValidationError};

/// Parser for request batches
pub struct RequestAdapter;

impl RequestAdapter {
    /// Parse a JSON string containing an array of requests
    pub fn parse_array(json: &str) -> Result<Vec<AssessmentRequest>, AssessError> {
        let requests: Vec<AssessmentRequest> = serde_json::from_str(json)?;
        Ok(requests)
    }

    /// Parse NDJSON (newline-delimited JSON) containing requests
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<AssessmentRequest>, AssessError> {
        let mut requests = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let request = serde_json::from_str::<AssessmentRequest>(trimmed).map_err(|e| {
                AssessError::InvalidInput(format!("Failed to parse line {}: {}", line_num + 1, e))
            })?;
            requests.push(request);
        }
        Ok(requests)
    }

    /// Parse either form, picking by the first non-whitespace character
    pub fn parse_auto(input: &str) -> Result<Vec<AssessmentRequest>, AssessError> {
        if input.trim_start().starts_with('[') {
            Self::parse_array(input)
        } else {
            Self::parse_ndjson(input)
        }
    }

    /// Validate a batch, returning only the failures
    pub fn validate_requests(requests: &[AssessmentRequest]) -> Vec<ValidationResult> {
        requests
            .iter()
            .enumerate()
            .filter_map(|(index, request)| {
                request.validate().err().map(|error| ValidationResult {
                    index,
                    request_id: request.request_id.clone(),
                    error,
                })
            })
            .collect()
    }
}

/// A failed validation within a batch
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub index: usize,
    pub request_id: Option<String>,
    pub error: ValidationError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::request::{FormSpec, SCHEMA_VERSION};

    fn line(responses: &str) -> String {
        format!(
            r#"{{"schema_version":"{SCHEMA_VERSION}","kind":"questionnaire","form":{{"type":"interleaved"}},"responses":{responses}}}"#
        )
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = format!("{}\n\n{}\n", line("[1,2,3]"), line("[0,0,0,0,0,0]"));
        let requests = RequestAdapter::parse_ndjson(&ndjson).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].responses.len(), 6);
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let ndjson = format!("{}\n{{not json}}\n", line("[1]"));
        let err = RequestAdapter::parse_ndjson(&ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_auto() {
        let array = format!("  [{}, {}]", line("[1]"), line("[2]"));
        assert_eq!(RequestAdapter::parse_auto(&array).unwrap().len(), 2);
        assert_eq!(RequestAdapter::parse_auto(&line("[1]")).unwrap().len(), 1);
    }

    #[test]
    fn test_validate_requests() {
        let requests = vec![
            AssessmentRequest::questionnaire(FormSpec::Dass21, vec![0; 21]),
            AssessmentRequest::questionnaire(FormSpec::Dass21, vec![0; 3]),
            AssessmentRequest::questionnaire(FormSpec::Dass21, vec![9; 21]),
        ];

        let failures = RequestAdapter::validate_requests(&requests);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[1].index, 2);
        assert!(failures[1].request_id.is_some());
    }
}
