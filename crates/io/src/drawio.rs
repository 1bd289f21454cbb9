//! diagrams.net (`.drawio`) rendering of the assignment table.
//!
//! Three horizontal layers: ledgers on top, legal entities in the middle,
//! business units at the bottom. Edges run Ledger → Legal Entity and
//! Legal Entity → Business Unit; a business unit with no legal entity hangs
//! off its ledger with a dashed edge. Cell ids derive from layer and position
//! so the same table always renders to the same file.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use base64::Engine;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use entstruct_recon::NumberedRow;

const LEDGER_STYLE: &str = "rounded=1;whiteSpace=wrap;html=1;fillColor=#e3f2fd;strokeColor=#1565c0;fontSize=12;";
const LE_STYLE: &str = "rounded=1;whiteSpace=wrap;html=1;fillColor=#fff3e0;strokeColor=#ef6c00;fontSize=12;";
const BU_STYLE: &str = "rounded=1;whiteSpace=wrap;html=1;fillColor=#e8f5e9;strokeColor=#2e7d32;fontSize=12;";
const EDGE_STYLE: &str = "endArrow=block;edgeStyle=elbowEdgeStyle;rounded=1;";
const DASHED_EDGE_STYLE: &str = "endArrow=block;edgeStyle=elbowEdgeStyle;rounded=1;dashed=1;";

const SHARE_URL_PREFIX: &str = "https://app.diagrams.net/?title=EnterpriseStructure.drawio#R";

const X_ORIGIN: usize = 40;
const X_STEP: usize = 220;
const BOX_WIDTH: usize = 180;
const BOX_HEIGHT: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Layer {
    Ledger,
    LegalEntity,
    BusinessUnit,
}

impl Layer {
    fn prefix(self) -> &'static str {
        match self {
            Self::Ledger => "L",
            Self::LegalEntity => "E",
            Self::BusinessUnit => "B",
        }
    }

    fn y(self) -> usize {
        match self {
            Self::Ledger => 40,
            Self::LegalEntity => 240,
            Self::BusinessUnit => 440,
        }
    }

    fn style(self) -> &'static str {
        match self {
            Self::Ledger => LEDGER_STYLE,
            Self::LegalEntity => LE_STYLE,
            Self::BusinessUnit => BU_STYLE,
        }
    }
}

/// Unique non-empty names of one layer, in first-seen order.
fn layer_names<'a>(rows: &'a [NumberedRow], pick: impl Fn(&'a NumberedRow) -> &'a str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(pick)
        .filter(|n| !n.is_empty() && seen.insert(*n))
        .collect()
}

fn vertex_id(layer: Layer, names: &[&str], name: &str) -> Option<String> {
    names
        .iter()
        .position(|n| *n == name)
        .map(|i| format!("{}::{}", layer.prefix(), i + 1))
}

fn w(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), String> {
    writer
        .write_event(event)
        .map_err(|e| format!("Failed to write diagram: {}", e))
}

/// Render the diagram as an uncompressed diagrams.net XML document.
pub fn render(rows: &[NumberedRow]) -> Result<String, String> {
    let ledgers = layer_names(rows, |n| n.row.ledger.as_str());
    let les = layer_names(rows, |n| n.row.legal_entity.as_str());
    let bus = layer_names(rows, |n| n.row.business_unit.as_str());

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    w(&mut writer, Event::Start(BytesStart::new("mxfile").with_attributes([("host", "app.diagrams.net")])))?;
    w(
        &mut writer,
        Event::Start(
            BytesStart::new("diagram")
                .with_attributes([("id", "enterprise-structure"), ("name", "Enterprise Structure")]),
        ),
    )?;
    w(&mut writer, Event::Start(BytesStart::new("mxGraphModel")))?;
    w(&mut writer, Event::Start(BytesStart::new("root")))?;
    w(&mut writer, Event::Empty(BytesStart::new("mxCell").with_attributes([("id", "0")])))?;
    w(&mut writer, Event::Empty(BytesStart::new("mxCell").with_attributes([("id", "1"), ("parent", "0")])))?;

    for (layer, names) in [
        (Layer::Ledger, &ledgers),
        (Layer::LegalEntity, &les),
        (Layer::BusinessUnit, &bus),
    ] {
        for (i, name) in names.iter().enumerate() {
            let id = format!("{}::{}", layer.prefix(), i + 1);
            let x = (X_ORIGIN + i * X_STEP).to_string();
            let y = layer.y().to_string();
            let width = BOX_WIDTH.to_string();
            let height = BOX_HEIGHT.to_string();

            w(
                &mut writer,
                Event::Start(BytesStart::new("mxCell").with_attributes([
                    ("id", id.as_str()),
                    ("value", *name),
                    ("style", layer.style()),
                    ("vertex", "1"),
                    ("parent", "1"),
                ])),
            )?;
            w(
                &mut writer,
                Event::Empty(BytesStart::new("mxGeometry").with_attributes([
                    ("x", x.as_str()),
                    ("y", y.as_str()),
                    ("width", width.as_str()),
                    ("height", height.as_str()),
                    ("as", "geometry"),
                ])),
            )?;
            w(&mut writer, Event::End(BytesEnd::new("mxCell")))?;
        }
    }

    let mut added: HashSet<(String, String)> = HashSet::new();
    let mut edges: Vec<(String, String, &'static str)> = Vec::new();
    for n in rows {
        let r = &n.row;
        let ledger = vertex_id(Layer::Ledger, &ledgers, &r.ledger);
        let le = vertex_id(Layer::LegalEntity, &les, &r.legal_entity);
        let bu = vertex_id(Layer::BusinessUnit, &bus, &r.business_unit);

        let mut link = |source: &Option<String>, target: &Option<String>, style: &'static str| {
            if let (Some(s), Some(t)) = (source, target) {
                if added.insert((s.clone(), t.clone())) {
                    edges.push((s.clone(), t.clone(), style));
                }
            }
        };
        link(&ledger, &le, EDGE_STYLE);
        link(&le, &bu, EDGE_STYLE);
        if le.is_none() {
            link(&ledger, &bu, DASHED_EDGE_STYLE);
        }
    }

    for (i, (source, target, style)) in edges.iter().enumerate() {
        let id = format!("e::{}", i + 1);
        w(
            &mut writer,
            Event::Start(BytesStart::new("mxCell").with_attributes([
                ("id", id.as_str()),
                ("value", ""),
                ("style", *style),
                ("edge", "1"),
                ("parent", "1"),
                ("source", source.as_str()),
                ("target", target.as_str()),
            ])),
        )?;
        w(
            &mut writer,
            Event::Empty(BytesStart::new("mxGeometry").with_attributes([("relative", "1"), ("as", "geometry")])),
        )?;
        w(&mut writer, Event::End(BytesEnd::new("mxCell")))?;
    }

    w(&mut writer, Event::End(BytesEnd::new("root")))?;
    w(&mut writer, Event::End(BytesEnd::new("mxGraphModel")))?;
    w(&mut writer, Event::End(BytesEnd::new("diagram")))?;
    w(&mut writer, Event::End(BytesEnd::new("mxfile")))?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| e.to_string())
}

pub fn export(rows: &[NumberedRow], path: &Path) -> Result<(), String> {
    let xml = render(rows)?;
    std::fs::write(path, xml).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// diagrams.net link that opens `xml` directly in the browser editor.
///
/// The `#R` fragment carries the document as raw deflate (no zlib header or
/// checksum), base64 encoded.
pub fn share_url(xml: &str) -> Result<String, String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(xml.as_bytes()).map_err(|e| format!("deflate: {e}"))?;
    let compressed = encoder.finish().map_err(|e| format!("deflate: {e}"))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(compressed);
    Ok(format!("{SHARE_URL_PREFIX}{payload}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entstruct_recon::AssignmentRow;
    use quick_xml::escape::unescape;
    use quick_xml::Reader;

    fn numbered(rows: &[(&str, &str, &str)]) -> Vec<NumberedRow> {
        rows.iter()
            .enumerate()
            .map(|(i, (l, e, b))| NumberedRow { assignment: i + 1, row: AssignmentRow::new(*l, *e, *b) })
            .collect()
    }

    /// (vertex count, edge count, labels) of a rendered document.
    fn census(xml: &str) -> (usize, usize, Vec<String>) {
        let mut reader = Reader::from_str(xml);
        let mut vertices = 0;
        let mut edges = 0;
        let mut labels = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"mxCell" => {
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"vertex" => vertices += 1,
                            b"edge" => edges += 1,
                            b"value" => {
                                let raw = std::str::from_utf8(&attr.value).unwrap();
                                let v = unescape(raw).unwrap().into_owned();
                                if !v.is_empty() {
                                    labels.push(v);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid xml: {e}"),
                _ => {}
            }
        }
        (vertices, edges, labels)
    }

    #[test]
    fn layers_and_edges() {
        let rows = numbered(&[
            ("US Primary", "Acme Inc", "US Ops"),
            ("US Primary", "Acme Inc", "US Sales"),
            ("US Primary", "Acme Labs", ""),
            ("", "Dormant LLC", ""),
        ]);
        let xml = render(&rows).unwrap();
        let (vertices, edges, labels) = census(&xml);

        // 1 ledger + 3 LEs + 2 BUs
        assert_eq!(vertices, 6);
        // L→Acme Inc, L→Acme Labs, Acme Inc→US Ops, Acme Inc→US Sales
        assert_eq!(edges, 4);
        assert_eq!(labels[0], "US Primary");
        assert!(labels.contains(&"Dormant LLC".to_string()));
    }

    #[test]
    fn business_unit_without_legal_entity_hangs_off_ledger() {
        let rows = numbered(&[("UK Primary", "", "UK Ops")]);
        let xml = render(&rows).unwrap();
        let (vertices, edges, _) = census(&xml);
        assert_eq!(vertices, 2);
        assert_eq!(edges, 1);
        assert!(xml.contains("dashed=1"));
    }

    #[test]
    fn deterministic_and_escaped() {
        let rows = numbered(&[("R&D <Ledger>", "\"Quoted\" LE", "")]);
        let first = render(&rows).unwrap();
        let second = render(&rows).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("R&amp;D &lt;Ledger&gt;"));

        let (_, _, labels) = census(&first);
        assert_eq!(labels, ["R&D <Ledger>", "\"Quoted\" LE"]);
    }

    #[test]
    fn empty_table_renders_skeleton() {
        let xml = render(&[]).unwrap();
        let (vertices, edges, _) = census(&xml);
        assert_eq!((vertices, edges), (0, 0));
        assert!(xml.starts_with("<mxfile"));
    }

    #[test]
    fn share_url_inflates_to_rendered_document() {
        use std::io::Read;

        let rows = numbered(&[("US Primary", "Acme Inc", "US Ops"), ("", "Dormant LLC", "")]);
        let xml = render(&rows).unwrap();
        let url = share_url(&xml).unwrap();

        let payload = url.strip_prefix(SHARE_URL_PREFIX).unwrap();
        let compressed = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        let mut inflated = String::new();
        flate2::read::DeflateDecoder::new(compressed.as_slice())
            .read_to_string(&mut inflated)
            .unwrap();
        assert_eq!(inflated, xml);
    }
}
