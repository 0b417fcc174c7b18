//! Graph dataset construction and the self-contained HTML page.
//!
//! Node ids are input positions. Edges are random decoration for the
//! force-directed layout: 1-3 outgoing edges per node, no self-loops,
//! weight 1-3. Nothing about the vocabulary decides which nodes connect.

use rand::seq::index::sample;
use rand::Rng;

use super::profile::LanguageProfile;
use crate::error::Result;
use crate::types::graph::{GraphEdge, GraphNode};
use crate::types::vocabulary::VocabularyEntry;

const MAX_EDGES_PER_NODE: usize = 3;

/// Position-indexed nodes for `entries`.
pub fn build_nodes(entries: &[VocabularyEntry]) -> Vec<GraphNode> {
    entries
        .iter()
        .enumerate()
        .map(|(id, entry)| GraphNode::from_entry(id, entry))
        .collect()
}

/// Random decorative edges for `node_count` nodes.
///
/// A single node has no other node to connect to and gets no edges.
pub fn build_edges<R: Rng + ?Sized>(node_count: usize, rng: &mut R) -> Vec<GraphEdge> {
    if node_count < 2 {
        return Vec::new();
    }
    let others = node_count - 1;
    let mut edges = Vec::new();

    for source in 0..node_count {
        let k = rng.gen_range(1..=others.min(MAX_EDGES_PER_NODE));
        for pick in sample(&mut *rng, others, k).iter() {
            // Indices into "every node except source"
            let target = if pick >= source { pick + 1 } else { pick };
            edges.push(GraphEdge {
                source,
                target,
                value: rng.gen_range(1..=3),
            });
        }
    }
    edges
}

/// Serialize the graph plus page scaffolding into one HTML document.
pub fn render_page(
    profile: LanguageProfile,
    source_label: &str,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
) -> Result<String> {
    let nodes_json = script_safe(serde_json::to_string(nodes)?);
    let edges_json = script_safe(serde_json::to_string(edges)?);

    Ok(PAGE_TEMPLATE
        .replace("{{LANG}}", profile.html_lang())
        .replace("{{TITLE}}", profile.page_title())
        .replace("{{TRANSLATION_LABEL}}", profile.translation_label())
        .replace("{{SOURCE}}", &escape_html(source_label))
        .replace("{{COUNT}}", &nodes.len().to_string())
        .replace("{{NODES}}", &nodes_json)
        .replace("{{EDGES}}", &edges_json))
}

/// Keep embedded JSON from closing the surrounding `<script>` element or
/// smuggling a template placeholder. `{{` can only occur inside strings.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
        .replace("<!--", "<\\u0021--")
        .replace("{{", "{\\u007b")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{TITLE}}</title>
<script src="https://d3js.org/d3.v7.min.js"></script>
<style>
  body { font-family: 'Microsoft JhengHei', Arial, sans-serif; margin: 0; padding: 20px;
         background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); color: white; }
  .header, .source { text-align: center; margin-bottom: 20px; }
  .source { background: rgba(255,255,255,0.1); padding: 10px; border-radius: 8px; word-break: break-all; }
  #graph-container { width: 100%; height: 80vh; position: relative; border-radius: 10px;
                     border: 2px solid rgba(255,255,255,0.3); background: rgba(255,255,255,0.05); }
  .tooltip { position: absolute; padding: 15px; font: 14px sans-serif; background: rgba(0,0,0,0.9);
             border: 1px solid #fff; border-radius: 8px; pointer-events: none; max-width: 300px; z-index: 1000; }
  .tooltip .word { font-size: 18px; font-weight: bold; color: #ffeb3b; }
  .tooltip .level { background: #ff6b6b; padding: 2px 6px; border-radius: 3px; font-size: 11px; margin-left: 5px; }
  .tooltip .example { font-style: italic; font-size: 11px; color: #ccc; }
  .controls { position: absolute; top: 10px; right: 10px; background: rgba(0,0,0,0.7); padding: 10px; border-radius: 5px; }
  .controls button { margin: 2px; padding: 5px 10px; background: #2196F3; color: white; border: none; border-radius: 3px; cursor: pointer; }
  .legend { position: absolute; bottom: 20px; left: 20px; background: rgba(0,0,0,0.8); padding: 15px;
            border-radius: 8px; font-size: 13px; z-index: 100; }
  .legend-item { display: flex; align-items: center; margin: 6px 0; }
  .legend-color { width: 16px; height: 16px; border-radius: 50%; margin-right: 10px; border: 2px solid white; }
  .notification { position: fixed; top: 20px; right: 20px; background: rgba(0,0,0,0.9); padding: 15px 25px;
                  border-radius: 8px; z-index: 10000; border: 2px solid #4ecdc4; }
</style>
</head>
<body>
<div class="header"><h1>{{TITLE}}</h1><p>Hover a node for details. Double-click to save the word.</p></div>
<div class="source"><strong>Source:</strong> {{SOURCE}}<br><strong>{{COUNT}} words</strong></div>
<div id="graph-container">
  <div class="controls">
    <button onclick="restartSimulation()">Re-layout</button>
    <button onclick="centerGraph()">Center</button>
  </div>
  <div class="legend">
    <div><strong>Level</strong></div>
    <div class="legend-item"><div class="legend-color" style="background:#4CAF50"></div>A</div>
    <div class="legend-item"><div class="legend-color" style="background:#2196F3"></div>B</div>
    <div class="legend-item"><div class="legend-color" style="background:#FF9800"></div>C</div>
    <div class="legend-item"><div class="legend-color" style="background:#F44336"></div>D</div>
    <div class="legend-item"><div class="legend-color" style="background:#9C27B0"></div>E</div>
    <div class="legend-item"><div class="legend-color" style="background:#9E9E9E"></div>Unclassified</div>
  </div>
</div>
<script>
  // Links are random decoration for the layout; they carry no meaning.
  const nodes = {{NODES}};
  const links = {{EDGES}};

  const container = document.getElementById('graph-container');
  const width = container.clientWidth;
  const height = container.clientHeight;
  const svg = d3.select('#graph-container').append('svg').attr('width', width).attr('height', height);
  const g = svg.append('g');
  const zoom = d3.zoom().scaleExtent([0.1, 4]).on('zoom', e => g.attr('transform', e.transform));
  svg.call(zoom);

  const color = d3.scaleOrdinal().domain([0, 1, 2, 3, 4, 5])
    .range(['#4CAF50', '#2196F3', '#FF9800', '#F44336', '#9C27B0', '#9E9E9E']);

  const simulation = d3.forceSimulation(nodes)
    .force('link', d3.forceLink(links).id(d => d.id).distance(100))
    .force('charge', d3.forceManyBody().strength(-400))
    .force('center', d3.forceCenter(width / 2, height / 2))
    .force('collision', d3.forceCollide().radius(40));

  const link = g.append('g').selectAll('line').data(links).enter().append('line')
    .attr('stroke', 'rgba(255,255,255,0.3)').attr('stroke-width', d => Math.sqrt(d.value) * 2);

  const node = g.append('g').selectAll('g').data(nodes).enter().append('g')
    .call(d3.drag().on('start', dragstarted).on('drag', dragged).on('end', dragended));
  node.append('circle').attr('r', 25).attr('fill', d => color(d.group)).attr('stroke', '#fff').attr('stroke-width', 3);
  node.append('text').text(d => d.word).attr('text-anchor', 'middle').attr('dominant-baseline', 'middle')
    .attr('font-size', '12px').attr('font-weight', 'bold').attr('fill', 'white').attr('pointer-events', 'none');

  const tooltip = d3.select('body').append('div').attr('class', 'tooltip').style('opacity', 0);

  function escapeText(s) {
    const div = document.createElement('div');
    div.textContent = s == null ? '' : String(s);
    return div.innerHTML;
  }

  function showNotification(message, ok = true) {
    const n = document.createElement('div');
    n.className = 'notification';
    n.style.borderColor = ok ? '#4ecdc4' : '#ff6b6b';
    n.textContent = message;
    document.body.appendChild(n);
    setTimeout(() => n.remove(), 3000);
  }

  function markNodeAsSaved(word) {
    node.each(function(d) {
      if (d.word === word) {
        const group = d3.select(this);
        if (group.select('.saved-indicator').empty()) {
          group.append('text').attr('class', 'saved-indicator').text('★')
            .attr('x', 20).attr('y', -20).attr('font-size', '16px').attr('fill', '#ffeb3b').attr('pointer-events', 'none');
        }
      }
    });
  }

  function saveWord(d) {
    const level = d.level || 'Unclassified';
    const tagged = level !== 'Unclassified' && level.length >= 2;
    fetch('/api/saved-words', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ word: {
        word: d.word, translation: d.translation, definition: d.definition,
        example: d.example, example_translation: d.example_translation,
        level: level,
        level_category: tagged ? level.charAt(0) : level,
        level_number: tagged ? level.substring(1) : ''
      } })
    })
      .then(r => { if (!r.ok) throw new Error('HTTP ' + r.status); return r.json(); })
      .then(data => {
        if (data.exists) { showNotification('Already saved', false); }
        else { showNotification('Saved!'); markNodeAsSaved(d.word); }
      })
      .catch(err => showNotification('Save failed: ' + err.message, false));
  }

  fetch('/api/saved-words').then(r => r.json())
    .then(data => (data.words || []).forEach(w => markNodeAsSaved(w.word)))
    .catch(() => {});

  node.on('mouseover', (event, d) => {
    tooltip.transition().duration(200).style('opacity', .9);
    tooltip.html(
      '<div class="word">' + escapeText(d.word) + '<span class="level">' + escapeText(d.level) + '</span></div>' +
      '<div><strong>{{TRANSLATION_LABEL}}:</strong> ' + escapeText(d.translation) + '</div>' +
      '<div><strong>Definition:</strong> ' + escapeText(d.definition) + '</div>' +
      '<div class="example">' + escapeText(d.example) + '</div>' +
      '<div class="example">' + escapeText(d.example_translation) + '</div>'
    ).style('left', (event.pageX + 10) + 'px').style('top', (event.pageY - 28) + 'px');
  })
  .on('mouseout', () => tooltip.transition().duration(500).style('opacity', 0))
  .on('dblclick', (event, d) => { event.stopPropagation(); saveWord(d); });

  simulation.on('tick', () => {
    link.attr('x1', d => d.source.x).attr('y1', d => d.source.y)
        .attr('x2', d => d.target.x).attr('y2', d => d.target.y);
    node.attr('transform', d => `translate(${d.x},${d.y})`);
  });

  function dragstarted(event, d) { if (!event.active) simulation.alphaTarget(0.3).restart(); d.fx = d.x; d.fy = d.y; }
  function dragged(event, d) { d.fx = event.x; d.fy = event.y; }
  function dragended(event, d) { if (!event.active) simulation.alphaTarget(0); d.fx = null; d.fy = null; }
  function restartSimulation() { simulation.alpha(1).restart(); }
  function centerGraph() {
    svg.transition().duration(750).call(zoom.transform, d3.zoomIdentity);
  }
</script>
</body>
</html>
"##;
