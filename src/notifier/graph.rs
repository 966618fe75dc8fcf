//! Graph model sent to the viewer.
//!
//! Every element is wrapped as `{"data": {...}}`. Nodes carry the object id,
//! abbreviated id, display shape, colour, object type, size and content;
//! edges carry `id`, `source` and `target`.

use serde::Serialize;

/// One git object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Full hex object id.
    pub id: String,
    /// Unambiguous abbreviated id.
    pub short_id: String,
    /// `commit`, `tree`, `blob` or `tag`.
    pub object_type: String,
    /// Size of the raw object in bytes.
    pub size: usize,
    /// Raw content for commits, blobs and tags; one line per entry for trees.
    pub content: String,
}

/// A reference from one object to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source id followed by target id.
    pub id: String,
    /// Referencing object.
    pub source: String,
    /// Referenced object.
    pub target: String,
}

/// A graph element as serialized on the wire.
#[derive(Debug, Serialize)]
pub struct Element<'a> {
    data: ElementData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ElementData<'a> {
    Node(NodeData<'a>),
    Edge(Edge),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeData<'a> {
    id: &'a str,
    short_id: &'a str,
    #[serde(rename = "type")]
    shape: &'static str,
    color: &'static str,
    object_type: &'a str,
    size: usize,
    content: &'a str,
}

/// Display shape for an object type.
#[must_use]
pub fn node_shape(object_type: &str) -> &'static str {
    match object_type {
        "tree" => "round-triangle",
        "blob" => "round-rectangle",
        "tag" => "round-tag",
        _ => "ellipse",
    }
}

/// Display colour for an object type.
#[must_use]
pub fn node_color(object_type: &str) -> &'static str {
    match object_type {
        "tree" => "blue",
        "blob" => "red",
        "tag" => "gray",
        _ => "green",
    }
}

impl Edge {
    /// Creates the edge `source → target`.
    #[must_use]
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Wraps the edge for serialization.
    #[must_use]
    pub fn into_element<'a>(self) -> Element<'a> {
        Element {
            data: ElementData::Edge(self),
        }
    }
}

impl Node {
    /// Wraps the node for serialization.
    #[must_use]
    pub fn element(&self) -> Element<'_> {
        Element {
            data: ElementData::Node(NodeData {
                id: &self.id,
                short_id: &self.short_id,
                shape: node_shape(&self.object_type),
                color: node_color(&self.object_type),
                object_type: &self.object_type,
                size: self.size,
                content: &self.content,
            }),
        }
    }

    /// Outgoing edges, read from the object content.
    ///
    /// Commits point at their tree and every parent; trees point at each
    /// entry. Blobs and tags have none.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        match self.object_type.as_str() {
            "commit" => self
                .content
                .lines()
                .take_while(|line| !line.is_empty())
                .filter_map(|line| {
                    line.strip_prefix("tree ")
                        .or_else(|| line.strip_prefix("parent "))
                })
                .map(|target| Edge::between(&self.id, target.trim()))
                .collect(),
            "tree" => self
                .content
                .lines()
                .filter_map(|line| line.split_whitespace().nth(2))
                .map(|target| Edge::between(&self.id, target))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Flattens nodes into the element list: each node followed by its edges.
#[must_use]
pub fn elements(nodes: &[Node]) -> Vec<Element<'_>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.push(node.element());
        out.extend(node.edges().into_iter().map(Edge::into_element));
    }
    out
}
