//! Error response body (RFC 7807 problem details).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs.
///
/// Besides the standard members the backend adds a translation `message`
/// key and the `entityName`/`errorKey` pair identifying the rejected entity.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type", default = "about_blank")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Machine-readable message key, e.g. `error.idexists`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
}

fn about_blank() -> String {
    "about:blank".to_string()
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: about_blank(),
            title: title.into(),
            status,
            detail: None,
            message: None,
            entity_name: None,
            error_key: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Tag the problem with the entity it concerns and a short error key.
    pub fn with_entity(mut self, entity_name: impl Into<String>, error_key: impl Into<String>) -> Self {
        let error_key = error_key.into();
        self.message = Some(format!("error.{error_key}"));
        self.entity_name = Some(entity_name.into());
        self.error_key = Some(error_key);
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }

    /// The most specific human-readable text the problem carries.
    pub fn summary(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {}", self.title, detail),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_json_shape() {
        let problem = ErrorResponse::bad_request("A new comment cannot already have an ID")
            .with_entity("comment", "idexists");
        let json = serde_json::to_value(&problem).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 400);
        assert_eq!(json["entityName"], "comment");
        assert_eq!(json["errorKey"], "idexists");
        assert_eq!(json["message"], "error.idexists");
    }

    #[test]
    fn test_parse_minimal_problem() {
        let problem: ErrorResponse =
            serde_json::from_str(r#"{"title":"Not Found","status":404}"#).unwrap();
        assert_eq!(problem.error_type, "about:blank");
        assert_eq!(problem.summary(), "Not Found");
    }
}
