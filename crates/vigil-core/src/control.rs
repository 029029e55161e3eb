//! Control message layer
//!
//! The wire contract between UI surfaces and the Warden. Requests are
//! tagged JSON objects; responses are plain acks, an error object, or the
//! status snapshot. Handler failures never escape as errors: they come
//! back as `{ "error": ... }` and the caller degrades to the inactive
//! display state.

use serde::{Deserialize, Serialize};

use vigil_filter::FilterMode;
use vigil_session::Session;

use crate::warden::Warden;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlRequest {
    #[serde(rename = "START_SESSION")]
    StartSession {
        mode: FilterMode,
        domains: Vec<String>,
        duration: i64,
    },
    #[serde(rename = "END_SESSION")]
    EndSession,
    #[serde(rename = "EXTEND_SESSION")]
    ExtendSession { minutes: i64 },
    #[serde(rename = "REDUCE_SESSION")]
    ReduceSession { minutes: i64 },
    #[serde(rename = "GET_SESSION_STATUS")]
    GetSessionStatus,
    #[serde(rename = "ADD_DOMAIN")]
    AddDomain { domain: String },
}

/// Status snapshot. Inactive sessions carry the flag alone; active ones
/// carry the full state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<FilterMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl SessionStatus {
    pub fn inactive() -> Self {
        Self {
            is_active: false,
            mode: None,
            domains: None,
            start_time: None,
            end_time: None,
        }
    }
}

impl From<Session> for SessionStatus {
    fn from(session: Session) -> Self {
        Self {
            is_active: true,
            mode: Some(session.mode),
            domains: Some(session.domains),
            start_time: Some(session.start_time),
            end_time: Some(session.end_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Status(SessionStatus),
    Ack { success: bool },
    Failure { error: String },
}

/// Dispatch one control message against the Warden
pub fn handle_request(warden: &Warden, request: ControlRequest) -> ControlResponse {
    match dispatch(warden, request) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Control request failed: {}", e);
            ControlResponse::Failure {
                error: e.to_string(),
            }
        }
    }
}

fn dispatch(warden: &Warden, request: ControlRequest) -> Result<ControlResponse> {
    match request {
        ControlRequest::StartSession {
            mode,
            domains,
            duration,
        } => {
            warden.start_session(mode, domains, duration)?;
            Ok(ControlResponse::Ack { success: true })
        }
        ControlRequest::EndSession => {
            warden.end_session()?;
            Ok(ControlResponse::Ack { success: true })
        }
        ControlRequest::ExtendSession { minutes } => {
            warden.extend_session(minutes)?;
            Ok(ControlResponse::Ack { success: true })
        }
        ControlRequest::ReduceSession { minutes } => {
            warden.reduce_session(minutes)?;
            Ok(ControlResponse::Ack { success: true })
        }
        ControlRequest::GetSessionStatus => {
            let status = match warden.session_status()? {
                Some(session) => SessionStatus::from(session),
                None => SessionStatus::inactive(),
            };
            Ok(ControlResponse::Status(status))
        }
        ControlRequest::AddDomain { domain } => {
            warden.add_domain(&domain)?;
            Ok(ControlResponse::Ack { success: true })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request: ControlRequest = serde_json::from_str(
            r#"{"type":"START_SESSION","mode":"block","domains":["Reddit.com"],"duration":25}"#,
        )
        .unwrap();
        match request {
            ControlRequest::StartSession {
                mode,
                domains,
                duration,
            } => {
                assert_eq!(mode, FilterMode::Block);
                assert_eq!(domains, vec!["Reddit.com"]);
                assert_eq!(duration, 25);
            }
            _ => panic!("Expected StartSession"),
        }

        let request: ControlRequest =
            serde_json::from_str(r#"{"type":"EXTEND_SESSION","minutes":15}"#).unwrap();
        assert!(matches!(
            request,
            ControlRequest::ExtendSession { minutes: 15 }
        ));

        let request: ControlRequest =
            serde_json::from_str(r#"{"type":"GET_SESSION_STATUS"}"#).unwrap();
        assert!(matches!(request, ControlRequest::GetSessionStatus));

        assert!(serde_json::from_str::<ControlRequest>(r#"{"type":"NUKE_SESSION"}"#).is_err());
    }

    #[test]
    fn test_response_wire_shape() {
        let ack = serde_json::to_string(&ControlResponse::Ack { success: true }).unwrap();
        assert_eq!(ack, r#"{"success":true}"#);

        let failure = serde_json::to_string(&ControlResponse::Failure {
            error: "Domain list cannot be empty".to_string(),
        })
        .unwrap();
        assert_eq!(failure, r#"{"error":"Domain list cannot be empty"}"#);

        let inactive = serde_json::to_string(&ControlResponse::Status(SessionStatus::inactive()))
            .unwrap();
        assert_eq!(inactive, r#"{"isActive":false}"#);
    }

    #[test]
    fn test_active_status_uses_camel_case() {
        let session = Session::new(
            FilterMode::Allow,
            vec!["docs.rs".to_string()],
            1_000,
            25,
        );
        let json = serde_json::to_value(SessionStatus::from(session)).unwrap();

        assert_eq!(json["isActive"], true);
        assert_eq!(json["mode"], "allow");
        assert_eq!(json["startTime"], 1_000);
        assert_eq!(json["endTime"], 1_000 + 25 * 60_000);
        assert_eq!(json["domains"][0], "docs.rs");
    }
}
