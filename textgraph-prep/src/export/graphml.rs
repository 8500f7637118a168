//! GraphML exporter for Gephi and similar tools.
//!
//! Nodes are flattened to kind/label/item_id; embeddings are left to the JSONL
//! export. Edges are directed and carry their relation and scalar weight.

use crate::model::graph::CorpusGraph;
use anyhow::{Context, Result};
use petgraph::visit::EdgeRef;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// Write the corpus graph as GraphML to `path`.
pub fn write_graphml(path: &Path, graph: &CorpusGraph) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_graphml_to(&mut w, graph)?;
    w.flush()?;
    info!("graphml: wrote -> {}", path.display());
    Ok(())
}

fn write_graphml_to<W: Write>(w: &mut W, graph: &CorpusGraph) -> Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns
     http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
    )?;

    writeln!(w, r#"<key id="d0" for="node" attr.name="kind" attr.type="string"/>"#)?;
    writeln!(w, r#"<key id="d1" for="node" attr.name="label" attr.type="string"/>"#)?;
    writeln!(w, r#"<key id="d2" for="node" attr.name="item_id" attr.type="long"/>"#)?;
    writeln!(w, r#"<key id="e0" for="edge" attr.name="relation" attr.type="string"/>"#)?;
    writeln!(w, r#"<key id="e1" for="edge" attr.name="weight" attr.type="double"/>"#)?;

    writeln!(w, r#"<graph edgedefault="directed">"#)?;

    for nidx in graph.node_indices() {
        let n = &graph[nidx];
        writeln!(w, r#"<node id="n{}">"#, nidx.index())?;
        writeln!(w, r#"  <data key="d0">{}</data>"#, n.kind)?;
        if let Some(label) = &n.label {
            writeln!(w, r#"  <data key="d1">{}</data>"#, xml_escape(label))?;
        }
        writeln!(w, r#"  <data key="d2">{}</data>"#, n.item_id)?;
        writeln!(w, r#"</node>"#)?;
    }

    for (i, e) in graph.edge_references().enumerate() {
        writeln!(
            w,
            r#"<edge id="e{}" source="n{}" target="n{}">"#,
            i,
            e.source().index(),
            e.target().index()
        )?;
        writeln!(w, r#"  <data key="e0">{}</data>"#, e.weight().relation)?;
        writeln!(w, r#"  <data key="e1">{}</data>"#, e.weight().value())?;
        writeln!(w, r#"</edge>"#)?;
    }

    writeln!(w, r#"</graph>"#)?;
    writeln!(w, r#"</graphml>"#)?;
    Ok(())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::{CorpusNode, EdgeRelation, WeightedEdge};
    use crate::model::node::NodeKind;

    #[test]
    fn escapes_labels_and_writes_weights() {
        let mut g = CorpusGraph::new();
        let a = g.add_node(CorpusNode {
            item_id: 0,
            kind: NodeKind::Word,
            label: Some("<b&>".into()),
            emb: vec![],
        });
        g.add_edge(a, a, WeightedEdge::new(EdgeRelation::SelfLoop, 1.5));

        let mut buf = Vec::new();
        write_graphml_to(&mut buf, &g).unwrap();
        let xml = String::from_utf8(buf).unwrap();

        assert!(xml.contains("&lt;b&amp;&gt;"));
        assert!(xml.contains(r#"<edge id="e0" source="n0" target="n0">"#));
        assert!(xml.contains(r#"<data key="e0">self_loop</data>"#));
        assert!(xml.contains(r#"<data key="e1">1.5</data>"#));
    }
}
