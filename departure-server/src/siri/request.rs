//! SIRI StopMonitoring request envelope.

use chrono::{DateTime, SecondsFormat, Utc};

const SIRI_NAMESPACE: &str = "http://www.siri.org.uk/siri";

/// Build the XML envelope for a StopMonitoring request.
///
/// The timestamp is a parameter rather than `Utc::now()` so tests can pin
/// it; the client passes the current time.
pub fn build_stop_monitoring_request(
    stop_id: &str,
    requestor_ref: &str,
    max_stop_visits: u32,
    timestamp: DateTime<Utc>,
) -> String {
    let ts = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Siri xmlns="{SIRI_NAMESPACE}" version="2.0">
    <ServiceRequest>
        <RequestTimestamp>{ts}</RequestTimestamp>
        <RequestorRef>{requestor}</RequestorRef>
        <StopMonitoringRequest version="2.0">
            <RequestTimestamp>{ts}</RequestTimestamp>
            <MonitoringRef>{stop}</MonitoringRef>
            <MaximumStopVisits>{max_stop_visits}</MaximumStopVisits>
        </StopMonitoringRequest>
    </ServiceRequest>
</Siri>"#,
        requestor = escape_xml(requestor_ref),
        stop = escape_xml(stop_id),
    )
}

/// Minimal XML text escaping for the few interpolated values.
fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
