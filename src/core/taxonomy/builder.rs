// ─── Taxonomy Builder ───
// Flattens the vendor's nested category tree into the hero list the rest of
// the engine keys everything on.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One node of the vendor category tree, already converted out of the raw
/// API shape. Organizational folders and heroes share this shape; the
/// selection predicate decides which nodes become heroes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

/// A selectable taxonomy entity. Immutable for the lifetime of a taxonomy
/// snapshot; referenced by id everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Default selection predicate: childless nodes are heroes, nodes with
/// children are folders.
pub fn leaf_heroes(node: &CategoryNode, _depth: usize) -> bool {
    node.children.is_empty()
}

/// Flatten a category tree into heroes, depth-first, in first-encountered
/// order. The predicate receives each node and its depth (roots are 0).
///
/// Duplicate ids can show up when the vendor links one category under
/// several tree paths; the first occurrence wins and the rest are dropped
/// with a warning. Pure function of its input.
pub fn build_hero_list<P>(tree: &[CategoryNode], predicate: P) -> Vec<Hero>
where
    P: Fn(&CategoryNode, usize) -> bool,
{
    let mut heroes = Vec::new();
    let mut seen = HashSet::new();
    for node in tree {
        visit(node, 0, &predicate, &mut heroes, &mut seen);
    }
    heroes
}

fn visit<P>(
    node: &CategoryNode,
    depth: usize,
    predicate: &P,
    heroes: &mut Vec<Hero>,
    seen: &mut HashSet<u64>,
) where
    P: Fn(&CategoryNode, usize) -> bool,
{
    if predicate(node, depth) {
        if seen.insert(node.id) {
            heroes.push(Hero {
                id: node.id,
                name: node.name.clone(),
                icon_url: node.icon_url.clone(),
            });
        } else {
            warn!(
                id = node.id,
                name = %node.name,
                "duplicate category id in vendor tree, keeping first occurrence"
            );
        }
    }
    for child in &node.children {
        visit(child, depth + 1, predicate, heroes, seen);
    }
}
