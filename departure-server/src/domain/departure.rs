//! Departure types and the raw → canonical normalizer.

use chrono::{DateTime, Utc};

/// A departure as parsed from a SIRI `MonitoredStopVisit`.
///
/// Fields use `Option` where the feed may omit the element: expected time
/// is only present once a real-time prediction exists, and `VehicleAtStop`
/// is only sent by some providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeparture {
    /// Line reference (SIRI `LineRef`).
    pub line_ref: String,

    /// Published line name, when the feed sends one.
    pub line_name: Option<String>,

    /// Destination display text.
    pub destination: String,

    /// Scheduled departure time.
    pub aimed: DateTime<Utc>,

    /// Predicted departure time, absent when no real-time data exists.
    pub expected: Option<DateTime<Utc>>,

    /// Whether the vehicle is currently at the stop.
    pub vehicle_at_stop: Option<bool>,

    /// The stop this visit was reported for (SIRI `MonitoringRef`).
    pub monitoring_ref: String,
}

/// A canonical, display-ready departure.
///
/// `expected` is always populated: it falls back to the aimed time when the
/// feed carries no real-time prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Line label: the published name when available, else the line ref.
    pub line: String,

    /// Destination display text.
    pub destination: String,

    /// Scheduled departure time.
    pub aimed: DateTime<Utc>,

    /// Predicted departure time (aimed time when no prediction exists).
    pub expected: DateTime<Utc>,

    /// Whether the vehicle is currently at the stop.
    pub vehicle_at_stop: Option<bool>,
}

/// Convert raw feed entries into the canonical, sorted departure list.
///
/// Sorts ascending by expected time, with ties broken by line then
/// destination so output is deterministic. No truncation or deduplication
/// happens here: count limiting is a presentation concern.
pub fn normalize_departures(raw: Vec<RawDeparture>) -> Vec<Departure> {
    let mut departures: Vec<Departure> = raw
        .into_iter()
        .map(|r| Departure {
            line: r.line_name.unwrap_or(r.line_ref),
            destination: r.destination,
            aimed: r.aimed,
            expected: r.expected.unwrap_or(r.aimed),
            vehicle_at_stop: r.vehicle_at_stop,
        })
        .collect();

    departures.sort_by(|a, b| {
        a.expected
            .cmp(&b.expected)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.destination.cmp(&b.destination))
    });

    departures
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, minute, 0).unwrap()
    }

    fn raw(line: &str, dest: &str, aimed: DateTime<Utc>) -> RawDeparture {
        RawDeparture {
            line_ref: line.to_string(),
            line_name: None,
            destination: dest.to_string(),
            aimed,
            expected: None,
            vehicle_at_stop: None,
            monitoring_ref: "STOP:1".to_string(),
        }
    }

    #[test]
    fn sorts_by_expected_time() {
        let input = vec![
            RawDeparture {
                expected: Some(at(30)),
                ..raw("C1", "Centre", at(28))
            },
            RawDeparture {
                expected: Some(at(10)),
                ..raw("C2", "Gare", at(9))
            },
            RawDeparture {
                expected: Some(at(20)),
                ..raw("C3", "Plage", at(20))
            },
        ];

        let out = normalize_departures(input);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].line, "C2");
        assert_eq!(out[1].line, "C3");
        assert_eq!(out[2].line, "C1");
    }

    #[test]
    fn missing_expected_falls_back_to_aimed() {
        let out = normalize_departures(vec![raw("C1", "Centre", at(15))]);
        assert_eq!(out[0].expected, at(15));
        assert_eq!(out[0].aimed, at(15));
    }

    #[test]
    fn fallback_time_participates_in_sorting() {
        // The entry with no prediction sorts on its aimed time.
        let input = vec![
            RawDeparture {
                expected: Some(at(20)),
                ..raw("C1", "Centre", at(18))
            },
            raw("C2", "Gare", at(10)),
        ];

        let out = normalize_departures(input);
        assert_eq!(out[0].line, "C2");
        assert_eq!(out[1].line, "C1");
    }

    #[test]
    fn ties_broken_by_line_then_destination() {
        let input = vec![
            raw("B", "Zoo", at(10)),
            raw("A", "Zoo", at(10)),
            raw("A", "Aero", at(10)),
        ];

        let out = normalize_departures(input);
        assert_eq!(
            out.iter()
                .map(|d| (d.line.as_str(), d.destination.as_str()))
                .collect::<Vec<_>>(),
            vec![("A", "Aero"), ("A", "Zoo"), ("B", "Zoo")]
        );
    }

    #[test]
    fn published_name_preferred_over_line_ref() {
        let input = vec![RawDeparture {
            line_name: Some("Tram A".to_string()),
            ..raw("LINE:A", "Centre", at(5))
        }];

        let out = normalize_departures(input);
        assert_eq!(out[0].line, "Tram A");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_departures(vec![]).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn arb_raw() -> impl Strategy<Value = RawDeparture> {
        (
            "[A-Z][0-9]{1,2}",
            "[A-Za-z ]{1,12}",
            0i64..86_400,
            proptest::option::of(0i64..86_400),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(line, dest, aimed_s, expected_s, at_stop)| {
                let base = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();
                RawDeparture {
                    line_ref: line,
                    line_name: None,
                    destination: dest,
                    aimed: base + chrono::Duration::seconds(aimed_s),
                    expected: expected_s.map(|s| base + chrono::Duration::seconds(s)),
                    vehicle_at_stop: at_stop,
                    monitoring_ref: "STOP:1".to_string(),
                }
            })
    }

    proptest! {
        /// Output is always sorted ascending by expected time.
        #[test]
        fn output_sorted(input in proptest::collection::vec(arb_raw(), 0..20)) {
            let out = normalize_departures(input);
            prop_assert!(out.windows(2).all(|w| w[0].expected <= w[1].expected));
        }

        /// Normalization never drops or invents entries.
        #[test]
        fn length_preserved(input in proptest::collection::vec(arb_raw(), 0..20)) {
            let n = input.len();
            prop_assert_eq!(normalize_departures(input).len(), n);
        }

        /// Expected time is always populated and never earlier than
        /// the aimed time would require: it equals the raw expected
        /// when present, else the aimed time.
        #[test]
        fn expected_always_populated(input in proptest::collection::vec(arb_raw(), 1..20)) {
            let copies = input.clone();
            let out = normalize_departures(input);
            for d in &out {
                let matched = copies.iter().any(|r| {
                    r.expected.unwrap_or(r.aimed) == d.expected && r.aimed == d.aimed
                });
                prop_assert!(matched, "no input entry explains {:?}", d);
            }
        }
    }
}
