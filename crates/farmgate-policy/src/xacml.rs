// farmgate-policy/src/xacml.rs
// ============================================================================
// Module: Farmgate XACML Decision Point
// Description: HTTP-backed decision point for an external XACML engine.
// Purpose: Evaluate attribute/time-based policies through a remote PDP.
// Dependencies: farmgate-core, farmgate-config, reqwest, url
// ============================================================================

//! ## Overview
//! `XacmlPdp` posts an XACML JSON request document to the configured policy
//! domain endpoint and maps the engine's answer onto a decision. Only an
//! explicit `Permit` allows; every other answer denies. Transport failures,
//! timeouts, and unparseable answers are engine failures, surfaced as
//! [`PdpError::EngineUnavailable`] and never mapped onto a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use farmgate_config::XacmlConfig;
use farmgate_core::AuthorizationContext;
use farmgate_core::Decision;
use farmgate_core::Identity;
use farmgate_core::PdpError;
use farmgate_core::PdpKind;
use farmgate_core::PolicyDecisionPoint;
use farmgate_core::Timestamp;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::selector::PolicyInitError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// XACML subject identifier attribute.
const ATTR_SUBJECT_ID: &str = "urn:oasis:names:tc:xacml:1.0:subject:subject-id";
/// XACML subject role attribute.
const ATTR_ROLE: &str = "urn:oasis:names:tc:xacml:2.0:subject:role";
/// XACML action identifier attribute.
const ATTR_ACTION_ID: &str = "urn:oasis:names:tc:xacml:1.0:action:action-id";
/// XACML resource identifier attribute.
const ATTR_RESOURCE_ID: &str = "urn:oasis:names:tc:xacml:1.0:resource:resource-id";
/// XACML environment current-time attribute.
const ATTR_CURRENT_TIME: &str = "urn:oasis:names:tc:xacml:1.0:environment:current-time";

/// Decision string the engine returns for an allowed request.
const DECISION_PERMIT: &str = "Permit";

/// Seconds in one day.
const SECONDS_PER_DAY: i64 = 86_400;

// ============================================================================
// SECTION: Wire Model
// ============================================================================

/// Request envelope for the XACML JSON profile.
#[derive(Debug, Serialize)]
struct XacmlRequestEnvelope {
    /// Request document.
    #[serde(rename = "Request")]
    request: XacmlRequest,
}

/// XACML request document.
#[derive(Debug, Serialize)]
struct XacmlRequest {
    /// Subject attribute category.
    #[serde(rename = "AccessSubject")]
    access_subject: Vec<AttributeCategory>,
    /// Action attribute category.
    #[serde(rename = "Action")]
    action: Vec<AttributeCategory>,
    /// Resource attribute category.
    #[serde(rename = "Resource")]
    resource: Vec<AttributeCategory>,
    /// Environment attribute category.
    #[serde(rename = "Environment")]
    environment: Vec<AttributeCategory>,
}

/// One attribute category holding a list of attributes.
#[derive(Debug, Serialize)]
struct AttributeCategory {
    /// Attributes in the category.
    #[serde(rename = "Attribute")]
    attribute: Vec<XacmlAttribute>,
}

/// One XACML attribute.
#[derive(Debug, Serialize)]
struct XacmlAttribute {
    /// Attribute identifier URN.
    #[serde(rename = "AttributeId")]
    attribute_id: &'static str,
    /// Attribute value.
    #[serde(rename = "Value")]
    value: Value,
}

/// Response envelope for the XACML JSON profile.
#[derive(Debug, Deserialize)]
struct XacmlResponseEnvelope {
    /// Result list; the first entry carries the decision.
    #[serde(rename = "Response")]
    response: Vec<XacmlResult>,
}

/// One XACML result.
#[derive(Debug, Deserialize)]
struct XacmlResult {
    /// Decision string: Permit, Deny, NotApplicable, or Indeterminate.
    #[serde(rename = "Decision")]
    decision: String,
}

// ============================================================================
// SECTION: XACML Decision Point
// ============================================================================

/// HTTP-backed XACML decision point.
pub struct XacmlPdp {
    /// HTTP client with bounded timeouts.
    client: Client,
    /// Fully resolved policy domain endpoint.
    endpoint: Url,
}

impl XacmlPdp {
    /// Builds a decision point from the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyInitError`] when the endpoint does not parse or the
    /// HTTP client cannot be constructed.
    pub fn from_config(config: &XacmlConfig) -> Result<Self, PolicyInitError> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint = format!("{base}/domains/{}/pdp", config.domain);
        let endpoint =
            Url::parse(&endpoint).map_err(|err| PolicyInitError::Endpoint(err.to_string()))?;
        let client = Client::builder()
            .redirect(Policy::none())
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|err| PolicyInitError::Client(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
        })
    }

    /// Builds the request document for one authorization context.
    fn build_request(identity: &Identity, ctx: &AuthorizationContext) -> XacmlRequestEnvelope {
        let mut subject = vec![XacmlAttribute {
            attribute_id: ATTR_SUBJECT_ID,
            value: Value::from(identity.user_id.as_str()),
        }];
        for role in &identity.roles {
            subject.push(XacmlAttribute {
                attribute_id: ATTR_ROLE,
                value: Value::from(role.as_str()),
            });
        }
        XacmlRequestEnvelope {
            request: XacmlRequest {
                access_subject: vec![AttributeCategory {
                    attribute: subject,
                }],
                action: vec![AttributeCategory {
                    attribute: vec![XacmlAttribute {
                        attribute_id: ATTR_ACTION_ID,
                        value: Value::from(ctx.action.as_str()),
                    }],
                }],
                resource: vec![AttributeCategory {
                    attribute: vec![XacmlAttribute {
                        attribute_id: ATTR_RESOURCE_ID,
                        value: Value::from(ctx.resource.as_str()),
                    }],
                }],
                environment: vec![AttributeCategory {
                    attribute: vec![XacmlAttribute {
                        attribute_id: ATTR_CURRENT_TIME,
                        value: Value::from(format_time_of_day(ctx.time_of_day)),
                    }],
                }],
            },
        }
    }
}

impl PolicyDecisionPoint for XacmlPdp {
    fn kind(&self) -> PdpKind {
        PdpKind::Xacml
    }

    fn decide(&self, ctx: &AuthorizationContext) -> Result<Decision, PdpError> {
        let Some(identity) = &ctx.identity else {
            return Ok(Decision::Deny);
        };
        let request = Self::build_request(identity, ctx);
        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(&request)
            .send()
            .map_err(|err| PdpError::EngineUnavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PdpError::EngineUnavailable(format!(
                "engine status {}",
                response.status()
            )));
        }
        let envelope: XacmlResponseEnvelope = response
            .json()
            .map_err(|err| PdpError::EngineUnavailable(err.to_string()))?;
        let result = envelope
            .response
            .first()
            .ok_or_else(|| PdpError::EngineUnavailable("empty engine response".to_string()))?;
        if result.decision == DECISION_PERMIT {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats a timestamp as an `HH:MM:SS` time-of-day string.
fn format_time_of_day(timestamp: Timestamp) -> String {
    let seconds = timestamp.as_unix_millis().div_euclid(1_000).rem_euclid(SECONDS_PER_DAY);
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only panic-based assertions."
    )]

    use std::thread;
    use std::time::Duration;

    use farmgate_config::XacmlConfig;
    use farmgate_core::ActionId;
    use farmgate_core::AuthorizationContext;
    use farmgate_core::Decision;
    use farmgate_core::Identity;
    use farmgate_core::PdpError;
    use farmgate_core::PolicyDecisionPoint;
    use farmgate_core::ResourceId;
    use farmgate_core::RoleName;
    use farmgate_core::Timestamp;
    use farmgate_core::UserId;
    use tiny_http::Header;
    use tiny_http::Response;
    use tiny_http::Server;

    use super::XacmlPdp;
    use super::format_time_of_day;

    fn ctx() -> AuthorizationContext {
        AuthorizationContext {
            identity: Some(Identity {
                user_id: UserId::new("alice"),
                username: "alice".to_string(),
                roles: vec![RoleName::new("manager")],
            }),
            action: ActionId::new("price-change"),
            resource: ResourceId::new("urn:ngsi-ld:Building:farm001"),
            time_of_day: Timestamp::from_unix_millis(14 * 3_600_000),
        }
    }

    fn engine_config(addr: &str, request_timeout_ms: u64) -> XacmlConfig {
        XacmlConfig {
            base_url: format!("http://{addr}"),
            domain: "farm".to_string(),
            connect_timeout_ms: 500,
            request_timeout_ms,
        }
    }

    fn respond_with(server: &Server, body: &str) {
        if let Ok(request) = server.recv() {
            let response = Response::from_string(body).with_header(
                Header::from_bytes("Content-Type", "application/json").expect("header"),
            );
            request.respond(response).expect("respond");
        }
    }

    #[test]
    fn permit_response_allows() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            respond_with(&server, r#"{"Response":[{"Decision":"Permit"}]}"#);
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 2_000)).expect("pdp");
        let decision = pdp.decide(&ctx()).expect("decision");
        assert_eq!(decision, Decision::Allow);
        handle.join().expect("server thread");
    }

    #[test]
    fn deny_response_denies() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            respond_with(&server, r#"{"Response":[{"Decision":"Deny"}]}"#);
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 2_000)).expect("pdp");
        let decision = pdp.decide(&ctx()).expect("decision");
        assert_eq!(decision, Decision::Deny);
        handle.join().expect("server thread");
    }

    #[test]
    fn non_permit_answers_fail_closed() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            respond_with(&server, r#"{"Response":[{"Decision":"NotApplicable"}]}"#);
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 2_000)).expect("pdp");
        let decision = pdp.decide(&ctx()).expect("decision");
        assert_eq!(decision, Decision::Deny);
        handle.join().expect("server thread");
    }

    #[test]
    fn engine_error_status_is_unavailable() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = Response::from_string("engine failure").with_status_code(500);
                request.respond(response).expect("respond");
            }
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 2_000)).expect("pdp");
        let result = pdp.decide(&ctx());
        assert!(matches!(result, Err(PdpError::EngineUnavailable(_))));
        handle.join().expect("server thread");
    }

    #[test]
    fn slow_engine_times_out_as_unavailable() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                thread::sleep(Duration::from_millis(1_500));
                let response = Response::from_string(r#"{"Response":[{"Decision":"Permit"}]}"#);
                request.respond(response).expect("respond");
            }
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 500)).expect("pdp");
        let result = pdp.decide(&ctx());
        assert!(matches!(result, Err(PdpError::EngineUnavailable(_))));
        handle.join().expect("server thread");
    }

    #[test]
    fn garbled_engine_answer_is_unavailable() {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_string();
        let handle = thread::spawn(move || {
            respond_with(&server, "not json");
        });
        let pdp = XacmlPdp::from_config(&engine_config(&addr, 2_000)).expect("pdp");
        let result = pdp.decide(&ctx());
        assert!(matches!(result, Err(PdpError::EngineUnavailable(_))));
        handle.join().expect("server thread");
    }

    #[test]
    fn time_of_day_formats_as_clock_time() {
        let ts = Timestamp::from_unix_millis(((14 * 3_600) + (23 * 60) + 5) * 1_000);
        assert_eq!(format_time_of_day(ts), "14:23:05");
    }
}
