// Copyright 2026 Fabula Contributors
// SPDX-License-Identifier: Apache-2.0

//! Import cycle detection.
//!
//! Builds a directed graph with one vertex per document (plus one per
//! import target that matches no document) and one edge per import,
//! then enumerates the simple cycles of each strongly connected
//! component. A cycle is reported once per participating document, at
//! the location of that document's own import, so every member sees the
//! problem locally.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use ecow::EcoString;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::diagnostics::Diagnostic;
use crate::lexing::Location;
use crate::specification::Specification;

use super::attach;

/// Detects cyclic imports and unresolved import targets.
pub fn detect_import_cycles(spec: &mut Specification) -> Vec<Diagnostic> {
    let mut found: Vec<(usize, Diagnostic)> = Vec::new();
    let doc_count = spec.documents().len();

    let mut graph: DiGraph<Utf8PathBuf, Location> = DiGraph::new();
    let mut nodes: Vec<NodeIndex> = Vec::with_capacity(doc_count);
    for document in spec.documents() {
        nodes.push(graph.add_node(document.path().to_path_buf()));
    }

    // A target outside the specification still gets a vertex, so a
    // self-import of a missing file cannot crash later passes, but it
    // can never participate in a cycle: it has no outgoing edges.
    let mut unresolved: HashMap<Utf8PathBuf, NodeIndex> = HashMap::new();
    for index in 0..doc_count {
        let imports: Vec<(Utf8PathBuf, EcoString, Location)> = {
            let document = &spec.documents()[index];
            document
                .import_paths()
                .zip(&document.imports)
                .map(|(target, import)| (target, import.value.clone(), import.location))
                .collect()
        };
        for (target, value, location) in imports {
            let to = match spec.document_index_by_path(&target, false) {
                Some(target_index) => nodes[target_index],
                None => {
                    let diagnostic = Diagnostic::semantic_warning(
                        format!("imported file is not part of the specification: \"{value}\""),
                        location,
                    )
                    .with_path(spec.documents()[index].path());
                    found.push((index, diagnostic));
                    *unresolved
                        .entry(target.clone())
                        .or_insert_with(|| graph.add_node(target))
                }
            };
            graph.add_edge(nodes[index], to, location);
        }
    }

    for component in tarjan_scc(&graph) {
        let self_loop =
            component.len() == 1 && graph.find_edge(component[0], component[0]).is_some();
        if component.len() < 2 && !self_loop {
            continue;
        }
        for cycle in cycles_in_component(&graph, &component) {
            let message = cycle_message(&graph, &cycle);
            for (position, node) in cycle.iter().enumerate() {
                let next = cycle[(position + 1) % cycle.len()];
                let Some(edge) = graph.find_edge(*node, next) else {
                    continue;
                };
                let Some(location) = graph.edge_weight(edge).copied() else {
                    continue;
                };
                let index = node.index();
                if index < doc_count {
                    let diagnostic = Diagnostic::semantic_error(message.clone(), location)
                        .with_path(graph[*node].clone());
                    found.push((index, diagnostic));
                }
            }
        }
    }

    attach(spec, found)
}

fn cycle_message(graph: &DiGraph<Utf8PathBuf, Location>, cycle: &[NodeIndex]) -> String {
    let mut display = String::from("cyclic imports: ");
    for node in cycle {
        display.push_str(graph[*node].as_str());
        display.push_str(" -> ");
    }
    if let Some(first) = cycle.first() {
        display.push_str(graph[*first].as_str());
    }
    display
}

/// Simple cycles within one strongly connected component, each rooted
/// at its minimum vertex so no cycle is reported twice.
fn cycles_in_component(
    graph: &DiGraph<Utf8PathBuf, Location>,
    component: &[NodeIndex],
) -> Vec<Vec<NodeIndex>> {
    let mut members: Vec<NodeIndex> = component.to_vec();
    members.sort_unstable();
    let position: HashMap<NodeIndex, usize> = members
        .iter()
        .enumerate()
        .map(|(local, node)| (*node, local))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); members.len()];
    for (local, node) in members.iter().enumerate() {
        for neighbour in graph.neighbors(*node) {
            if let Some(&target) = position.get(&neighbour) {
                adjacency[local].push(target);
            }
        }
    }
    for list in &mut adjacency {
        list.sort_unstable();
        list.dedup();
    }

    simple_cycles(&adjacency)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|local| members[local]).collect())
        .collect()
}

/// Enumerates simple cycles of a small digraph given as adjacency
/// lists. For each start vertex the search only walks vertices with a
/// larger index, so every cycle is produced exactly once, rooted at its
/// minimum vertex.
fn simple_cycles(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let node_count = adjacency.len();
    let mut cycles = Vec::new();
    for start in 0..node_count {
        let mut on_path = vec![false; node_count];
        on_path[start] = true;
        // (vertex, next neighbour to try)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let (vertex, cursor) = *frame;
            if cursor >= adjacency[vertex].len() {
                on_path[vertex] = false;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let next = adjacency[vertex][cursor];
            if next == start {
                cycles.push(stack.iter().map(|(v, _)| *v).collect());
            } else if next > start && !on_path[next] {
                on_path[next] = true;
                stack.push((next, 0));
            }
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::super::test_support::spec_from;
    use super::*;
    use crate::diagnostics::Severity;

    fn feature_doc(path: &str, name: &str, imports: &[&str]) -> (String, Vec<String>) {
        let mut lines: Vec<String> = imports
            .iter()
            .map(|import| format!("import \"{import}\""))
            .collect();
        lines.push(format!("Feature: {name}"));
        (path.to_string(), lines)
    }

    fn spec_of(docs: &[(String, Vec<String>)]) -> Specification {
        let borrowed: Vec<(&str, Vec<&str>)> = docs
            .iter()
            .map(|(path, lines)| {
                (path.as_str(), lines.iter().map(String::as_str).collect())
            })
            .collect();
        let with_slices: Vec<(&str, &[&str])> = borrowed
            .iter()
            .map(|(path, lines)| (*path, lines.as_slice()))
            .collect();
        spec_from(&with_slices)
    }

    #[test]
    fn a_chain_has_no_cycle() {
        let mut spec = spec_of(&[
            feature_doc("a.fabula", "A", &["b.fabula"]),
            feature_doc("b.fabula", "B", &["c.fabula"]),
            feature_doc("c.fabula", "C", &[]),
        ]);
        let diagnostics = detect_import_cycles(&mut spec);
        assert!(diagnostics.is_empty(), "got {diagnostics:?}");
    }

    #[test]
    fn a_three_cycle_touches_all_three_documents() {
        let mut spec = spec_of(&[
            feature_doc("a.fabula", "A", &["b.fabula"]),
            feature_doc("b.fabula", "B", &["c.fabula"]),
            feature_doc("c.fabula", "C", &["a.fabula"]),
        ]);
        let diagnostics = detect_import_cycles(&mut spec);
        assert_eq!(diagnostics.len(), 3);
        for diagnostic in &diagnostics {
            assert_eq!(diagnostic.severity, Severity::Error);
            assert_eq!(
                diagnostic.message.as_str(),
                "cyclic imports: a.fabula -> b.fabula -> c.fabula -> a.fabula"
            );
        }
        for document in spec.documents() {
            assert_eq!(document.file_errors.len(), 1);
        }
    }

    #[test]
    fn self_import_is_a_cycle() {
        let mut spec = spec_of(&[feature_doc("a.fabula", "A", &["a.fabula"])]);
        let diagnostics = detect_import_cycles(&mut spec);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message.as_str(),
            "cyclic imports: a.fabula -> a.fabula"
        );
    }

    #[test]
    fn two_cycles_through_one_document_are_both_reported() {
        let mut spec = spec_of(&[
            feature_doc("a.fabula", "A", &["b.fabula", "c.fabula"]),
            feature_doc("b.fabula", "B", &["a.fabula"]),
            feature_doc("c.fabula", "C", &["a.fabula"]),
        ]);
        let diagnostics = detect_import_cycles(&mut spec);
        // Two distinct simple cycles, two documents each.
        assert_eq!(diagnostics.len(), 4);
        let messages: std::collections::BTreeSet<_> =
            diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages.contains("cyclic imports: a.fabula -> b.fabula -> a.fabula"));
        assert!(messages.contains("cyclic imports: a.fabula -> c.fabula -> a.fabula"));
        // The shared document carries one error per cycle.
        assert_eq!(spec.documents()[0].file_errors.len(), 2);
    }

    #[test]
    fn unresolved_import_is_a_warning_not_an_error() {
        let mut spec = spec_of(&[feature_doc("a.fabula", "A", &["missing.fabula"])]);
        let diagnostics = detect_import_cycles(&mut spec);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(diagnostics[0].message.contains("missing.fabula"));
        assert!(spec.documents()[0].file_errors.is_empty());
        assert_eq!(spec.documents()[0].file_warnings.len(), 1);
    }
}
