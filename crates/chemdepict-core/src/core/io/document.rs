use super::node::Node;
use super::persist::{IdMap, LoadError, Persist};
use crate::core::models::atom::Atom;
use crate::core::models::bond::Bond;
use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

const NO_NEIGHBOR: &str = "-";

/// Defines the interface for reading and writing whole molecule documents.
pub trait DocumentFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a molecule from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or any entity fails to load.
    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error>;

    /// Writes a molecule to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_to(mol: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(mol: &Molecule, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(mol, &mut writer)
    }
}

/// A molecule stored as a JSON tree of [`Node`]s.
pub struct JsonDocument;

impl DocumentFile for JsonDocument {
    type Error = LoadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let node: Node = serde_json::from_reader(reader)?;
        from_node(&node)
    }

    fn write_to(mol: &Molecule, writer: &mut impl Write) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut *writer, &to_node(mol))?;
        writer.flush()?;
        Ok(())
    }
}

/// Saves every atom (with its electrons) and every bond of the molecule.
pub fn to_node(mol: &Molecule) -> Node {
    let ids = IdMap::for_molecule(mol);
    let mut root = Node::new("molecule");
    for (id, atom) in mol.atoms_iter() {
        let mut node = atom.save(&ids);
        node.set("id", ids.name(id).unwrap_or_default());
        if let Some(neighbors) = atom.stereo_neighbors() {
            let names: Vec<&str> = neighbors
                .iter()
                .map(|n| n.and_then(|n| ids.name(n)).unwrap_or(NO_NEIGHBOR))
                .collect();
            node.set("stereo", names.join(" "));
        }
        root.children.push(node);
    }
    for (_, bond) in mol.bonds_iter() {
        root.children.push(bond.save(&ids));
    }
    root
}

/// Rebuilds a molecule from a document node.
///
/// Atoms load first, then bonds, then stereocenter declarations, which may
/// name atoms defined anywhere in the document. The first failing entity
/// aborts the whole load.
pub fn from_node(root: &Node) -> Result<Molecule, LoadError> {
    root.expect_name("molecule")?;
    let mut mol = Molecule::new();
    let mut ids = IdMap::default();

    for node in root.children_named("atom") {
        let atom = Atom::load(node, &ids)?;
        let id = mol.add_atom(atom);
        ids.insert(node.require("id")?, id)?;
    }
    for node in root.children_named("bond") {
        let bond = Bond::load(node, &ids)?;
        if mol.bond_between(bond.begin(), bond.end()).is_some() {
            return Err(LoadError::DuplicateBond {
                begin: node.require("begin")?.to_string(),
                end: node.require("end")?.to_string(),
            });
        }
        mol.insert_bond(bond);
    }
    if let Some(other) = root
        .children
        .iter()
        .find(|c| c.name != "atom" && c.name != "bond")
    {
        return Err(LoadError::UnexpectedNode {
            expected: "atom".to_string(),
            found: other.name.clone(),
        });
    }

    for node in root.children_named("atom") {
        let Some(raw) = node.get("stereo") else {
            continue;
        };
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() != 4 {
            return Err(node.invalid("stereo", raw));
        }
        let mut neighbors = [None; 4];
        for (slot, token) in neighbors.iter_mut().zip(tokens) {
            if token != NO_NEIGHBOR {
                *slot = Some(ids.resolve(token)?);
            }
        }
        let center = ids.resolve(node.require("id")?)?;
        mol.set_stereo_neighbors(center, Some(neighbors));
    }

    debug!(
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        "Document loaded"
    );
    Ok(mol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondType;
    use crate::core::models::position::{ChargePosition, Compass, ElectronPosition};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn sample() -> Molecule {
        let mut mol = Molecule::new();
        let c = mol.add_element(6, 0.0, 0.0);
        let o = mol.add_element(8, 0.0, -30.0);
        let n = mol.add_element(7, 26.0, 15.0);
        let f = mol.add_element(9, -26.0, 15.0);
        mol.add_bond(c, o, 1);
        mol.add_bond(c, n, 1);
        let cf = mol.add_bond(c, f, 1).unwrap();
        mol.set_bond_type(cf, BondType::Wedge);
        mol.set_charge(n, 1);
        mol.set_charge_position(n, ChargePosition::Compass(Compass::NorthEast));
        mol.add_electron(o, true, Some(ElectronPosition::Compass(Compass::North)));
        mol.set_stereo_neighbors(c, Some([Some(o), Some(n), Some(f), None]));
        mol
    }

    #[test]
    fn document_round_trips_through_a_file() {
        let mol = sample();
        let file = NamedTempFile::new().unwrap();
        JsonDocument::write_to_path(&mol, file.path()).unwrap();
        let back = JsonDocument::read_from_path(file.path()).unwrap();

        assert_eq!(back.atom_count(), 4);
        assert_eq!(back.bond_count(), 3);
        assert_eq!(to_node(&back), to_node(&mol));
    }

    #[test]
    fn stereo_neighbors_resolve_after_all_atoms_load() {
        let back = from_node(&to_node(&sample())).unwrap();
        let (center, atom) = back
            .atoms_iter()
            .find(|(_, a)| a.is_stereocenter())
            .unwrap();
        let neighbors = atom.stereo_neighbors().unwrap();
        assert_eq!(neighbors[3], None);
        for n in neighbors.iter().take(3).flatten() {
            assert!(back.bond_between(center, *n).is_some());
        }
    }

    #[test]
    fn a_bad_bond_aborts_the_whole_load() {
        let mut root = to_node(&sample());
        let bond = root.children.iter_mut().find(|c| c.name == "bond").unwrap();
        bond.attributes.remove("level");
        assert!(matches!(
            from_node(&root),
            Err(LoadError::MissingAttribute { attribute, .. }) if attribute == "level"
        ));
    }

    #[test]
    fn repeated_bond_is_rejected() {
        let mut root = to_node(&sample());
        let bond = root.children.iter().find(|c| c.name == "bond").unwrap().clone();
        root.children.push(bond);
        assert!(matches!(from_node(&root), Err(LoadError::DuplicateBond { .. })));
    }

    #[test]
    fn unknown_child_is_rejected() {
        let mut root = to_node(&sample());
        root.children.push(Node::new("arrow"));
        assert!(matches!(
            from_node(&root),
            Err(LoadError::UnexpectedNode { found, .. }) if found == "arrow"
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut reader = Cursor::new("{ not json");
        assert!(matches!(
            JsonDocument::read_from(&mut reader),
            Err(LoadError::Json(_))
        ));
    }
}
