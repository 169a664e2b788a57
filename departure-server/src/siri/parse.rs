//! SIRI StopMonitoring response parser.

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::warn;

use crate::domain::RawDeparture;

use super::error::SiriError;

/// Parse the `MonitoredStopVisit` entries out of a StopMonitoring response.
///
/// Zero visits is a valid outcome, returned as an empty vector. Visits the
/// feed marks cancelled are excluded. Visits missing a usable aimed time or
/// destination are skipped with a warning rather than failing the delivery:
/// one malformed entry must not take out the whole stop.
pub fn parse_stop_monitoring(xml: &str) -> Result<Vec<RawDeparture>, SiriError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut departures = Vec::new();
    let mut visit: Option<VisitFields> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                if local.as_ref() == b"MonitoredStopVisit" {
                    visit = Some(VisitFields::default());
                } else if visit.is_some() {
                    field = Field::from_local_name(local.as_ref());
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(v), Some(f)) = (visit.as_mut(), field) {
                    let text = t.unescape().map_err(|e| SiriError::Xml {
                        message: e.to_string(),
                    })?;
                    v.set(f, text.trim());
                }
            }
            Ok(Event::Empty(e)) => {
                // A bare <Cancellation/> marker carries no text but still
                // flags the visit as cancelled.
                if e.local_name().as_ref() == b"Cancellation" {
                    if let Some(v) = visit.as_mut() {
                        v.set(Field::Cancellation, "true");
                    }
                }
            }
            Ok(Event::End(e)) => {
                let local = e.local_name();
                if local.as_ref() == b"MonitoredStopVisit" {
                    if let Some(v) = visit.take() {
                        match v.finish() {
                            VisitOutcome::Departure(d) => departures.push(*d),
                            VisitOutcome::Cancelled => {}
                            VisitOutcome::Unusable(reason) => {
                                warn!(reason, "skipping unusable monitored visit");
                            }
                        }
                    }
                } else {
                    field = None;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(SiriError::Xml {
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(departures)
}

/// Leaf elements we care about inside a `MonitoredStopVisit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MonitoringRef,
    LineRef,
    PublishedLineName,
    DestinationName,
    AimedDepartureTime,
    ExpectedDepartureTime,
    VehicleAtStop,
    DepartureStatus,
    Cancellation,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"MonitoringRef" => Some(Self::MonitoringRef),
            b"LineRef" => Some(Self::LineRef),
            b"PublishedLineName" => Some(Self::PublishedLineName),
            b"DestinationName" => Some(Self::DestinationName),
            b"AimedDepartureTime" => Some(Self::AimedDepartureTime),
            b"ExpectedDepartureTime" => Some(Self::ExpectedDepartureTime),
            b"VehicleAtStop" => Some(Self::VehicleAtStop),
            b"DepartureStatus" => Some(Self::DepartureStatus),
            b"Cancellation" => Some(Self::Cancellation),
            _ => None,
        }
    }
}

/// Accumulated text of one visit's fields. First value wins per field,
/// which keeps nested duplicates (e.g. a second `DestinationName` inside
/// an onward call) from clobbering the primary values.
#[derive(Default)]
struct VisitFields {
    monitoring_ref: Option<String>,
    line_ref: Option<String>,
    line_name: Option<String>,
    destination: Option<String>,
    aimed: Option<String>,
    expected: Option<String>,
    vehicle_at_stop: Option<String>,
    departure_status: Option<String>,
    cancellation: Option<String>,
}

enum VisitOutcome {
    Departure(Box<RawDeparture>),
    Cancelled,
    Unusable(&'static str),
}

impl VisitFields {
    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::MonitoringRef => &mut self.monitoring_ref,
            Field::LineRef => &mut self.line_ref,
            Field::PublishedLineName => &mut self.line_name,
            Field::DestinationName => &mut self.destination,
            Field::AimedDepartureTime => &mut self.aimed,
            Field::ExpectedDepartureTime => &mut self.expected,
            Field::VehicleAtStop => &mut self.vehicle_at_stop,
            Field::DepartureStatus => &mut self.departure_status,
            Field::Cancellation => &mut self.cancellation,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }

    fn is_cancelled(&self) -> bool {
        if let Some(status) = &self.departure_status {
            let status = status.to_ascii_lowercase();
            if status == "cancelled" || status == "canceled" {
                return true;
            }
        }
        self.cancellation.as_deref() == Some("true")
    }

    fn finish(self) -> VisitOutcome {
        if self.is_cancelled() {
            return VisitOutcome::Cancelled;
        }

        let Some(destination) = self.destination else {
            return VisitOutcome::Unusable("missing destination");
        };
        let Some(aimed) = self.aimed.as_deref().and_then(parse_timestamp) else {
            return VisitOutcome::Unusable("missing or invalid aimed departure time");
        };
        let line_ref = match self.line_ref {
            Some(r) => r,
            None => match &self.line_name {
                Some(_) => String::new(),
                None => return VisitOutcome::Unusable("missing line reference"),
            },
        };

        VisitOutcome::Departure(Box::new(RawDeparture {
            line_ref,
            line_name: self.line_name,
            destination,
            aimed,
            expected: self.expected.as_deref().and_then(parse_timestamp),
            vehicle_at_stop: self.vehicle_at_stop.as_deref().map(|v| v == "true"),
            monitoring_ref: self.monitoring_ref.unwrap_or_default(),
        }))
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
