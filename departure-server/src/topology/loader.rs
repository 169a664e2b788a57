//! NeTEx topology document loader.
//!
//! Topology documents routinely describe tens of thousands of quays, so the
//! parser walks quick-xml events instead of building a document tree: only
//! the element stack and the output vector are held in memory.
//!
//! Robustness beats validation here. Element names are matched by local
//! name (providers disagree on namespace prefixes), unknown elements are
//! skipped, and entries missing an id or name are dropped rather than
//! failing the whole load.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, warn};

use crate::domain::{Stop, StopId};

use super::error::TopologyError;

/// Download and parse the topology document at `url`.
///
/// Fatal at setup: without the registry, configured stops cannot be
/// resolved, so the caller must abort configuration on error.
pub async fn load_stops(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Stop>, TopologyError> {
    info!(url = %url, "downloading topology document");

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(TopologyError::Http {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    debug!(bytes = body.len(), "topology document downloaded");

    let stops = parse_stops(&body[..])?;
    info!(stops = stops.len(), "topology document parsed");
    Ok(stops)
}

/// A stop element currently open in the parse.
struct PendingStop {
    id: Option<String>,
    name: Option<String>,
    depth: usize,
}

/// Parse stop definitions out of a NeTEx document.
///
/// Recognizes `Quay` and `StopPlace` elements (by local name, at any
/// nesting depth), extracting the `id` attribute and the text of the
/// direct `Name` child. Everything else is ignored.
pub fn parse_stops<R: BufRead>(input: R) -> Result<Vec<Stop>, TopologyError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut stops = Vec::new();
    let mut open: Vec<PendingStop> = Vec::new();
    let mut depth = 0usize;
    let mut in_name = false;
    let mut name_buf = String::new();
    let mut skipped = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                if local.as_ref() == b"Quay" || local.as_ref() == b"StopPlace" {
                    let id = attribute_value(&e, b"id")?;
                    open.push(PendingStop {
                        id,
                        name: None,
                        depth,
                    });
                } else if local.as_ref() == b"Name"
                    && open.last().is_some_and(|p| p.depth + 1 == depth && p.name.is_none())
                {
                    in_name = true;
                    name_buf.clear();
                }
                depth += 1;
            }
            Ok(Event::Text(t)) if in_name => {
                let text = t
                    .unescape()
                    .map_err(|e| TopologyError::Xml {
                        message: e.to_string(),
                    })?;
                name_buf.push_str(&text);
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);

                if in_name && e.local_name().as_ref() == b"Name" {
                    in_name = false;
                    if let Some(top) = open.last_mut() {
                        top.name = Some(name_buf.trim().to_string());
                    }
                }

                if open.last().is_some_and(|p| p.depth == depth) {
                    if let Some(pending) = open.pop() {
                        match finish_stop(pending) {
                            Some(stop) => stops.push(stop),
                            None => skipped += 1,
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(TopologyError::Xml {
                    message: e.to_string(),
                });
            }
        }
        buf.clear();
    }

    if skipped > 0 {
        warn!(skipped, "stop elements skipped for missing id or name");
    }

    Ok(stops)
}

/// Read a raw attribute value off a start tag.
fn attribute_value(
    e: &quick_xml::events::BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>, TopologyError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| TopologyError::Xml {
            message: e.to_string(),
        })?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|e| TopologyError::Xml {
                message: e.to_string(),
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Turn a closed element into a stop, if it carried both id and name.
fn finish_stop(pending: PendingStop) -> Option<Stop> {
    let id = StopId::parse(&pending.id?).ok()?;
    let name = pending.name.filter(|n| !n.is_empty())?;
    Some(Stop { id, name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Vec<Stop> {
        parse_stops(xml.as_bytes()).unwrap()
    }

    #[test]
    fn extracts_quays_and_stop_places() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <PublicationDelivery xmlns="http://www.netex.org.uk/netex">
              <dataObjects>
                <GeneralFrame>
                  <members>
                    <Quay id="FR:1:Q:100">
                      <Name>Gare de l'Est</Name>
                      <TransportMode>bus</TransportMode>
                    </Quay>
                    <StopPlace id="FR:1:SP:200">
                      <Name>Mairie</Name>
                    </StopPlace>
                  </members>
                </GeneralFrame>
              </dataObjects>
            </PublicationDelivery>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id.as_str(), "FR:1:Q:100");
        assert_eq!(stops[0].name, "Gare de l'Est");
        assert_eq!(stops[1].id.as_str(), "FR:1:SP:200");
        assert_eq!(stops[1].name, "Mairie");
    }

    #[test]
    fn handles_namespace_prefixes() {
        let xml = r#"<netex:PublicationDelivery xmlns:netex="http://www.netex.org.uk/netex">
              <netex:members>
                <netex:Quay id="Q:1">
                  <netex:Name>Plage</netex:Name>
                </netex:Quay>
              </netex:members>
            </netex:PublicationDelivery>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Plage");
    }

    #[test]
    fn exact_id_name_pairs_preserved() {
        let xml = r#"<root>
              <Quay id="Q:1"><Name>Un</Name></Quay>
              <Quay id="Q:2"><Name>Deux</Name></Quay>
              <Quay id="Q:3"><Name>Trois</Name></Quay>
            </root>"#;

        let stops = parse(xml);
        assert_eq!(
            stops
                .iter()
                .map(|s| (s.id.as_str(), s.name.as_str()))
                .collect::<Vec<_>>(),
            vec![("Q:1", "Un"), ("Q:2", "Deux"), ("Q:3", "Trois")]
        );
    }

    #[test]
    fn name_of_nested_child_element_not_captured() {
        // The Name under AlternativeName is not a direct child of the Quay.
        let xml = r#"<root>
              <Quay id="Q:1">
                <AlternativeName><Name>Wrong</Name></AlternativeName>
                <Name>Right</Name>
              </Quay>
            </root>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Right");
    }

    #[test]
    fn nested_quay_inside_stop_place() {
        let xml = r#"<root>
              <StopPlace id="SP:1">
                <Name>Station</Name>
                <quays>
                  <Quay id="Q:1"><Name>Platform A</Name></Quay>
                </quays>
              </StopPlace>
            </root>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id.as_str(), "Q:1");
        assert_eq!(stops[0].name, "Platform A");
        assert_eq!(stops[1].id.as_str(), "SP:1");
        assert_eq!(stops[1].name, "Station");
    }

    #[test]
    fn entries_missing_id_or_name_are_skipped() {
        let xml = r#"<root>
              <Quay><Name>No Id</Name></Quay>
              <Quay id="Q:2"></Quay>
              <Quay id="Q:3"><Name>Kept</Name></Quay>
            </root>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Kept");
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let xml = r#"<root>
              <Weird><Deeply><Nested/></Deeply></Weird>
              <Quay id="Q:1"><Name>Kept</Name><Centroid><pos>1 2</pos></Centroid></Quay>
            </root>"#;

        let stops = parse(xml);
        assert_eq!(stops.len(), 1);
    }

    #[test]
    fn escaped_entities_in_names() {
        let xml = r#"<root><Quay id="Q:1"><Name>Rue P&#233;tain &amp; Fils</Name></Quay></root>"#;
        let stops = parse(xml);
        assert_eq!(stops[0].name, "Rue Pétain & Fils");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = parse_stops("<root><Quay id=".as_bytes());
        assert!(matches!(result, Err(TopologyError::Xml { .. })));
    }

    #[test]
    fn empty_document_yields_no_stops() {
        assert!(parse("<root></root>").is_empty());
    }
}
