//! Turns raw budget rows into a [`NormalizedGraph`] a Sankey renderer can draw.
//!
//! Validation runs in a fixed order and stops at the first failure:
//! amounts, then labels, then self-loops, then cycles over the merged graph.
//! Each check scans every row before the next one starts, so a bad amount on
//! row 7 is reported ahead of an empty label on row 2.

use crate::domain::model::{FlowEdge, FlowError, LabelField, Link, NormalizedGraph};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Validates `edges` and merges them into a normalized, index-based graph.
///
/// Duplicate `(source, target)` pairs are summed into a single link placed at
/// the pair's first occurrence. Nodes appear in first-seen order, a row's
/// source before its target.
pub fn build(edges: &[FlowEdge]) -> Result<NormalizedGraph, FlowError> {
    check_amounts(edges)?;
    check_labels(edges)?;
    check_self_loops(edges)?;

    let graph = normalize(edges);

    if let Some(path) = find_cycle(&graph) {
        tracing::debug!("Cycle found through {} nodes", path.len() - 1);
        return Err(FlowError::CycleDetected { path });
    }

    tracing::debug!(
        "Built flow graph: {} rows -> {} nodes, {} links",
        edges.len(),
        graph.nodes.len(),
        graph.links.len()
    );

    Ok(graph)
}

/// Every merged link, node balance and summary total is a partial sum of the
/// positive row amounts, so a finite running total keeps all of them finite.
fn check_amounts(edges: &[FlowEdge]) -> Result<(), FlowError> {
    let mut total = 0.0_f64;
    for (i, edge) in edges.iter().enumerate() {
        // NaN fails the comparison as well
        if !(edge.amount.is_finite() && edge.amount > 0.0) {
            return Err(FlowError::InvalidAmount {
                row: i + 1,
                amount: edge.amount,
            });
        }
        total += edge.amount;
        if !total.is_finite() {
            return Err(FlowError::InvalidAmount {
                row: i + 1,
                amount: total,
            });
        }
    }
    Ok(())
}

fn check_labels(edges: &[FlowEdge]) -> Result<(), FlowError> {
    for (i, edge) in edges.iter().enumerate() {
        let field = if is_blank(&edge.source) {
            LabelField::Source
        } else if is_blank(&edge.target) {
            LabelField::Target
        } else {
            continue;
        };
        return Err(FlowError::InvalidLabel { row: i + 1, field });
    }
    Ok(())
}

fn check_self_loops(edges: &[FlowEdge]) -> Result<(), FlowError> {
    match edges.iter().position(|edge| edge.source == edge.target) {
        Some(i) => Err(FlowError::SelfLoop {
            row: i + 1,
            node: edges[i].source.clone(),
        }),
        None => Ok(()),
    }
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

fn normalize(edges: &[FlowEdge]) -> NormalizedGraph {
    let mut node_index: HashMap<&str, usize> = HashMap::new();
    let mut nodes: Vec<String> = Vec::new();
    let mut link_index: HashMap<(usize, usize), usize> = HashMap::new();
    let mut links: Vec<Link> = Vec::new();

    for edge in edges {
        let source = intern(&edge.source, &mut node_index, &mut nodes);
        let target = intern(&edge.target, &mut node_index, &mut nodes);

        match link_index.entry((source, target)) {
            Entry::Occupied(slot) => links[*slot.get()].amount += edge.amount,
            Entry::Vacant(slot) => {
                slot.insert(links.len());
                links.push(Link {
                    source,
                    target,
                    amount: edge.amount,
                });
            }
        }
    }

    NormalizedGraph { nodes, links }
}

fn intern<'a>(
    name: &'a str,
    node_index: &mut HashMap<&'a str, usize>,
    nodes: &mut Vec<String>,
) -> usize {
    *node_index.entry(name).or_insert_with(|| {
        nodes.push(name.to_string());
        nodes.len() - 1
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Iterative three-colour DFS. Returns the node names along the first cycle
/// found, starting and ending at the same node.
fn find_cycle(graph: &NormalizedGraph) -> Option<Vec<String>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes.len()];
    for link in &graph.links {
        adjacency[link.source].push(link.target);
    }

    let mut marks = vec![Mark::Unvisited; graph.nodes.len()];
    // (node, index of the next child to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..graph.nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::InProgress;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&next) = adjacency[node].get(frame.1) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
                Mark::InProgress => {
                    // in-progress nodes are exactly the ones on the stack
                    let from = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                    let mut path: Vec<String> = stack[from..]
                        .iter()
                        .map(|&(n, _)| graph.nodes[n].clone())
                        .collect();
                    path.push(graph.nodes[next].clone());
                    return Some(path);
                }
                Mark::Done => {}
            }
        }
    }

    None
}
