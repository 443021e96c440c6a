//! Topology descriptors and generators.
//!
//! A spec is given as a word list, first the topology type and then its
//! parameters, e.g. `campus 4 8 1` or `file topo.json`.

use crate::error::{Error, Result};
use crate::node::{NodeId, NodeKind};
use crate::topology::Topology;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_BUILDINGS: usize = 4;
const DEFAULT_HOSTS_PER_BUILDING: usize = 4;
const DEFAULT_SERVERS: usize = 1;

/// A recognized topology type plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologySpec {
    /// Dual-core campus network with buildings and a data center.
    Campus {
        /// Number of buildings.
        buildings: usize,
        /// Hosts attached to each building switch.
        hosts_per_building: usize,
        /// Servers in the data center.
        servers: usize,
    },
    /// A line `n0 - n1 - ... - n(len-1)`; `n0` is the server, the rest hosts.
    Path(usize),
    /// A switch grid with one host per switch and a server on the corner.
    Grid {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// A topology loaded from a JSON file.
    File(PathBuf),
}

impl TopologySpec {
    /// Default campus dimensions.
    pub const DEFAULT_CAMPUS: Self = Self::Campus {
        buildings: DEFAULT_BUILDINGS,
        hosts_per_building: DEFAULT_HOSTS_PER_BUILDING,
        servers: DEFAULT_SERVERS,
    };

    /// Parses a spec from its word list.
    ///
    /// `networkx` is accepted as an alias for `campus`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTopology` for an unrecognized type, or
    /// `Error::InvalidTopology` for missing or malformed parameters.
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let Some((kind, args)) = words.split_first() else {
            return Err(Error::InvalidTopology("empty topology spec".to_string()));
        };
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

        match kind.as_ref() {
            "campus" | "networkx" => Ok(Self::Campus {
                buildings: count_arg(&args, 0, "buildings")?.unwrap_or(DEFAULT_BUILDINGS),
                hosts_per_building: count_arg(&args, 1, "hosts_per_building")?
                    .unwrap_or(DEFAULT_HOSTS_PER_BUILDING),
                servers: count_arg(&args, 2, "servers")?.unwrap_or(DEFAULT_SERVERS),
            }),
            "path" => {
                let len = count_arg(&args, 0, "length")?
                    .ok_or_else(|| Error::InvalidTopology("path needs a length".to_string()))?;
                Ok(Self::Path(len))
            }
            "grid" => {
                let rows = count_arg(&args, 0, "rows")?;
                let cols = count_arg(&args, 1, "cols")?;
                match (rows, cols) {
                    (Some(rows), Some(cols)) => Ok(Self::Grid { rows, cols }),
                    _ => Err(Error::InvalidTopology("grid needs rows and cols".to_string())),
                }
            }
            "file" => args
                .first()
                .map(|p| Self::File(PathBuf::from(*p)))
                .ok_or_else(|| Error::InvalidTopology("file needs a path".to_string())),
            other => Err(Error::UnknownTopology(other.to_string())),
        }
    }

    /// Builds the topology described by this spec.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTopology` for degenerate dimensions, or an
    /// I/O or JSON error when loading a file.
    pub fn build(&self) -> Result<Topology> {
        let topology = match self {
            Self::Campus {
                buildings,
                hosts_per_building,
                servers,
            } => campus(*buildings, *hosts_per_building, *servers)?,
            Self::Path(len) => path(*len)?,
            Self::Grid { rows, cols } => grid(*rows, *cols)?,
            Self::File(p) => load_file(p)?,
        };
        tracing::debug!(
            "Built {self} topology: {} nodes, {} links",
            topology.node_count(),
            topology.link_count()
        );
        Ok(topology)
    }
}

impl fmt::Display for TopologySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Campus {
                buildings,
                hosts_per_building,
                servers,
            } => write!(f, "campus({buildings}x{hosts_per_building}, {servers} servers)"),
            Self::Path(len) => write!(f, "path({len})"),
            Self::Grid { rows, cols } => write!(f, "grid({rows}x{cols})"),
            Self::File(p) => write!(f, "file({})", p.display()),
        }
    }
}

fn count_arg(args: &[&str], pos: usize, name: &str) -> Result<Option<usize>> {
    args.get(pos)
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| Error::InvalidTopology(format!("{name} must be a count, got '{raw}'")))
        })
        .transpose()
}

fn link(topo: &mut Topology, a: &str, b: &str) -> Result<()> {
    topo.add_link(&NodeId::from(a), &NodeId::from(b))
}

fn campus(buildings: usize, hosts_per_building: usize, servers: usize) -> Result<Topology> {
    if buildings == 0 {
        return Err(Error::InvalidTopology("campus needs at least one building".to_string()));
    }
    let mut topo = Topology::new();

    topo.add_node("core0", NodeKind::Switch);
    topo.add_node("core1", NodeKind::Switch);
    link(&mut topo, "core0", "core1")?;

    topo.add_node("dc", NodeKind::Switch);
    link(&mut topo, "dc", "core0")?;
    link(&mut topo, "dc", "core1")?;
    for s in 0..servers {
        let id = format!("s{s}");
        topo.add_node(id.as_str(), NodeKind::Server);
        link(&mut topo, &id, "dc")?;
    }

    for b in 0..buildings {
        let bldg = format!("b{b}");
        topo.add_node(bldg.as_str(), NodeKind::Switch);
        link(&mut topo, &bldg, "core0")?;
        link(&mut topo, &bldg, "core1")?;
        for h in 0..hosts_per_building {
            let host = format!("h{h}-b{b}");
            topo.add_node(host.as_str(), NodeKind::Host);
            link(&mut topo, &host, &bldg)?;
        }
    }

    // Building ring.
    if buildings > 1 {
        for b in 0..buildings {
            let next = (b + 1) % buildings;
            if next != b {
                link(&mut topo, &format!("b{b}"), &format!("b{next}"))?;
            }
        }
    }

    Ok(topo)
}

fn path(len: usize) -> Result<Topology> {
    if len < 2 {
        return Err(Error::InvalidTopology("path needs at least two nodes".to_string()));
    }
    let mut topo = Topology::new();
    topo.add_node("n0", NodeKind::Server);
    for i in 1..len {
        let id = format!("n{i}");
        topo.add_node(id.as_str(), NodeKind::Host);
        link(&mut topo, &format!("n{}", i - 1), &id)?;
    }
    Ok(topo)
}

fn grid(rows: usize, cols: usize) -> Result<Topology> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidTopology("grid needs non-zero dimensions".to_string()));
    }
    let mut topo = Topology::new();
    for r in 0..rows {
        for c in 0..cols {
            let sw = format!("sw{r}-{c}");
            topo.add_node(sw.as_str(), NodeKind::Switch);
            let host = format!("h{r}-{c}");
            topo.add_node(host.as_str(), NodeKind::Host);
            link(&mut topo, &host, &sw)?;
            if r > 0 {
                link(&mut topo, &sw, &format!("sw{}-{c}", r - 1))?;
            }
            if c > 0 {
                link(&mut topo, &sw, &format!("sw{r}-{}", c - 1))?;
            }
        }
    }
    topo.add_node("srv", NodeKind::Server);
    link(&mut topo, "srv", "sw0-0")?;
    Ok(topo)
}

/// On-disk topology layout.
#[derive(Debug, Deserialize)]
struct TopologyFile {
    nodes: Vec<FileNode>,
    links: Vec<(NodeId, NodeId)>,
}

#[derive(Debug, Deserialize)]
struct FileNode {
    id: NodeId,
    kind: NodeKind,
}

fn load_file(p: &Path) -> Result<Topology> {
    let content = std::fs::read_to_string(p)?;
    parse_file(&content)
}

fn parse_file(content: &str) -> Result<Topology> {
    let file: TopologyFile = serde_json::from_str(content)?;
    let mut topo = Topology::new();
    for node in file.nodes {
        if topo.contains(&node.id) {
            return Err(Error::InvalidTopology(format!("duplicate node {}", node.id)));
        }
        topo.add_node(node.id, node.kind);
    }
    for (a, b) in &file.links {
        topo.add_link(a, b)?;
    }
    Ok(topo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn parse_campus_defaults() {
        let spec = TopologySpec::parse(&words("campus")).unwrap();
        assert_eq!(spec, TopologySpec::DEFAULT_CAMPUS);
    }

    #[test]
    fn parse_campus_with_args() {
        let spec = TopologySpec::parse(&words("networkx 2 3")).unwrap();
        assert_eq!(
            spec,
            TopologySpec::Campus {
                buildings: 2,
                hosts_per_building: 3,
                servers: 1
            }
        );
    }

    #[test]
    fn unknown_topology_type_is_rejected() {
        let result = TopologySpec::parse(&words("mininet"));
        assert!(matches!(result, Err(Error::UnknownTopology(t)) if t == "mininet"));
    }

    #[test]
    fn malformed_count_is_rejected() {
        let result = TopologySpec::parse(&words("path many"));
        assert!(matches!(result, Err(Error::InvalidTopology(_))));
    }

    #[test]
    fn campus_has_expected_shape() {
        let topo = TopologySpec::parse(&words("campus 3 2 2")).unwrap().build().unwrap();
        assert_eq!(topo.hosts().len(), 6);
        assert_eq!(topo.servers().len(), 2);
        // core0, core1, dc, b0..b2
        assert_eq!(topo.switches().len(), 6);
        // core link + 2 dc uplinks + 2 server links + 6 building uplinks
        // + 6 host links + 3 ring links
        assert_eq!(topo.link_count(), 20);
    }

    #[test]
    fn path_roles() {
        let topo = TopologySpec::Path(4).build().unwrap();
        assert_eq!(topo.servers(), vec![NodeId::from("n0")]);
        assert_eq!(topo.hosts().len(), 3);
        assert_eq!(topo.link_count(), 3);
    }

    #[test]
    fn grid_links() {
        let topo = TopologySpec::Grid { rows: 2, cols: 3 }.build().unwrap();
        // 7 switch links + 6 host links + 1 server link
        assert_eq!(topo.link_count(), 14);
    }

    #[test]
    fn file_topology_parses() {
        let json = r#"{
            "nodes": [
                {"id": "s", "kind": "server"},
                {"id": "r", "kind": "switch"},
                {"id": "h", "kind": "host"}
            ],
            "links": [["s", "r"], ["r", "h"]]
        }"#;
        let topo = parse_file(json).unwrap();
        assert_eq!(topo.node_count(), 3);
        assert_eq!(topo.hosts(), vec![NodeId::from("h")]);
    }

    #[test]
    fn file_topology_rejects_dangling_link() {
        let json = r#"{"nodes": [{"id": "s", "kind": "server"}], "links": [["s", "x"]]}"#;
        assert!(matches!(parse_file(json), Err(Error::UnknownNode(_))));
    }
}
