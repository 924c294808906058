use super::node::Node;
use crate::core::elements;
use crate::core::models::atom::{Atom, AtomKind, SymbolExtent};
use crate::core::models::bond::{Bond, BondType};
use crate::core::models::electron::Electron;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::position::{ChargePosition, Compass, ElectronPosition, HydrogenPosition};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Node '{node}' is missing required attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },
    #[error("Node '{node}' has invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue {
        node: String,
        attribute: String,
        value: String,
    },
    #[error("Expected node '{expected}', found '{found}'")]
    UnexpectedNode { expected: String, found: String },
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Reference to undefined atom '{0}'")]
    DanglingReference(String),
    #[error("Atom id '{0}' is defined more than once")]
    DuplicateId(String),
    #[error("Atoms '{begin}' and '{end}' are bonded more than once")]
    DuplicateBond { begin: String, end: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Two-way mapping between atom handles and the names used in persisted nodes.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    names: HashMap<AtomId, String>,
    atoms: HashMap<String, AtomId>,
}

impl IdMap {
    /// Names every atom of the molecule `a1`, `a2`, ... in arena order.
    pub fn for_molecule(mol: &Molecule) -> Self {
        let mut map = Self::default();
        for (i, (id, _)) in mol.atoms_iter().enumerate() {
            let name = format!("a{}", i + 1);
            map.names.insert(id, name.clone());
            map.atoms.insert(name, id);
        }
        map
    }

    pub fn insert(&mut self, name: &str, id: AtomId) -> Result<(), LoadError> {
        if self.atoms.contains_key(name) {
            return Err(LoadError::DuplicateId(name.to_string()));
        }
        self.names.insert(id, name.to_string());
        self.atoms.insert(name.to_string(), id);
        Ok(())
    }

    pub fn name(&self, id: AtomId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> Result<AtomId, LoadError> {
        self.atoms
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::DanglingReference(name.to_string()))
    }
}

/// Conversion of an entity to and from a [`Node`].
///
/// Loading never yields a partially valid entity: any missing or malformed
/// attribute fails the whole entity.
pub trait Persist: Sized {
    /// Saves the entity. Atom references are written through `ids`, which
    /// must name every atom the entity points at.
    fn save(&self, ids: &IdMap) -> Node;

    fn load(node: &Node, ids: &IdMap) -> Result<Self, LoadError>;
}

const PLACEHOLDER_SYMBOL: &str = "*";

fn element_code(z: u8) -> String {
    match elements::element(z) {
        Some(data) => data.symbol.to_string(),
        None if z == 0 => PLACEHOLDER_SYMBOL.to_string(),
        None => z.to_string(),
    }
}

fn parse_element(code: &str) -> Result<u8, LoadError> {
    if code == PLACEHOLDER_SYMBOL {
        return Ok(0);
    }
    elements::symbol_to_z(code)
        .or_else(|| code.parse().ok())
        .ok_or_else(|| LoadError::UnknownElement(code.to_string()))
}

fn parse_compass(node: &Node, key: &str, raw: &str) -> Result<Compass, LoadError> {
    raw.parse().map_err(|_| node.invalid(key, raw))
}

fn parse_flag(node: &Node, key: &str) -> Result<bool, LoadError> {
    match node.require(key)? {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(node.invalid(key, other)),
    }
}

impl Persist for Electron {
    fn save(&self, _ids: &IdMap) -> Node {
        let mut node = Node::new(self.node_name());
        match self.position {
            ElectronPosition::Compass(c) => node.set("position", c),
            ElectronPosition::Angle { angle, dist } => {
                node.set("angle", angle);
                node.set("dist", dist);
            }
        }
        node
    }

    fn load(node: &Node, _ids: &IdMap) -> Result<Self, LoadError> {
        let is_pair = match node.name.as_str() {
            "electron" => false,
            "electron-pair" => true,
            other => {
                return Err(LoadError::UnexpectedNode {
                    expected: "electron".to_string(),
                    found: other.to_string(),
                });
            }
        };
        let position = match (node.get("position"), node.get("angle")) {
            (Some(raw), _) => ElectronPosition::Compass(parse_compass(node, "position", raw)?),
            (None, Some(_)) => ElectronPosition::Angle {
                angle: node.parse("angle")?,
                dist: node.parse("dist")?,
            },
            (None, None) => return Err(node.missing("position")),
        };
        Ok(Self { is_pair, position })
    }
}

impl Persist for Atom {
    fn save(&self, ids: &IdMap) -> Node {
        let mut node = Node::new("atom");
        match &self.kind {
            AtomKind::Element { z } => node.set("element", element_code(*z)),
            AtomKind::Residue {
                abbreviation,
                attach_z,
            } => {
                node.set("residue", abbreviation);
                node.set("element", element_code(*attach_z));
            }
        }
        node.set("x", self.position.x);
        node.set("y", self.position.y);
        if self.position.z != 0.0 {
            node.set("depth", self.position.z);
        }
        if !self.charge_auto && self.charge != 0 {
            node.set("charge", self.charge);
        }
        match self.charge_position {
            ChargePosition::Auto => node.set("charge-position", "auto"),
            ChargePosition::Compass(c) => node.set("charge-position", c),
            ChargePosition::Angle { angle, dist } => {
                node.set("charge-angle", angle);
                node.set("charge-dist", dist);
            }
        }
        if let HydrogenPosition::Fixed(side) = self.hydrogen_position {
            node.set("hydrogen-position", side.code());
        }
        node.set("show-symbol", self.show_symbol);
        node.set("show-charge", self.show_charge);
        if let Some(ext) = self.symbol_extent {
            node.set("half-width", ext.half_width);
            node.set("half-height", ext.half_height);
        }
        node.children = self.electrons.iter().map(|e| e.save(ids)).collect();
        node
    }

    fn load(node: &Node, ids: &IdMap) -> Result<Self, LoadError> {
        node.expect_name("atom")?;
        let z = parse_element(node.require("element")?)?;
        let kind = match node.get("residue") {
            Some(abbreviation) => AtomKind::Residue {
                abbreviation: abbreviation.to_string(),
                attach_z: z,
            },
            None => AtomKind::Element { z },
        };
        let position = Point3::new(
            node.parse("x")?,
            node.parse("y")?,
            node.parse_opt("depth")?.unwrap_or(0.0),
        );
        let mut atom = Atom::new(kind, position);

        atom.charge = node.parse_opt("charge")?.unwrap_or(0);
        atom.charge_position = match node.get("charge-position") {
            Some("auto") => ChargePosition::Auto,
            Some(raw) => ChargePosition::Compass(parse_compass(node, "charge-position", raw)?),
            None if node.get("charge-angle").is_some() => ChargePosition::Angle {
                angle: node.parse("charge-angle")?,
                dist: node.parse("charge-dist")?,
            },
            None => return Err(node.missing("charge-position")),
        };
        if let Some(raw) = node.get("hydrogen-position") {
            let side = raw
                .parse()
                .map_err(|_| node.invalid("hydrogen-position", raw))?;
            atom.hydrogen_position = HydrogenPosition::Fixed(side);
            atom.hydrogen_side = side;
        }
        atom.show_symbol = parse_flag(node, "show-symbol")?;
        atom.show_charge = parse_flag(node, "show-charge")?;
        if let (Some(half_width), Some(half_height)) =
            (node.parse_opt("half-width")?, node.parse_opt("half-height")?)
        {
            atom.symbol_extent = Some(SymbolExtent {
                half_width,
                half_height,
            });
        }
        atom.electrons = node
            .children
            .iter()
            .map(|child| Electron::load(child, ids))
            .collect::<Result<_, _>>()?;
        Ok(atom)
    }
}

impl Persist for Bond {
    fn save(&self, ids: &IdMap) -> Node {
        let mut node = Node::new("bond")
            .with("begin", ids.name(self.begin).unwrap_or_default())
            .with("end", ids.name(self.end).unwrap_or_default())
            .with("order", self.order);
        if let Some(code) = self.bond_type.code() {
            node.set("type", code);
        }
        node.set("level", self.level);
        node
    }

    fn load(node: &Node, ids: &IdMap) -> Result<Self, LoadError> {
        node.expect_name("bond")?;
        let begin = ids.resolve(node.require("begin")?)?;
        let end = ids.resolve(node.require("end")?)?;
        if begin == end {
            return Err(node.invalid("end", node.require("end")?));
        }
        let order: u8 = node.parse("order")?;
        if !(1..=4).contains(&order) {
            return Err(node.invalid("order", node.require("order")?));
        }
        let bond_type = match node.get("type") {
            Some(raw) => raw.parse().map_err(|_| node.invalid("type", raw))?,
            None => BondType::Normal,
        };
        let mut bond = Bond::new(begin, end, order);
        bond.bond_type = bond_type;
        bond.level = node.parse("level")?;
        Ok(bond)
    }
}
