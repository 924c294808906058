use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use chemdepict::core::io::document::{DocumentFile, JsonDocument};
use chemdepict::core::io::persist::IdMap;
use chemdepict::core::models::molecule::Molecule;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Loading input document from {:?}", &args.input);
    let mol =
        JsonDocument::read_from_path(&args.input).map_err(|e| CliError::parsing(&args.input, e))?;
    print!("{}", valence_table(&mol));
    Ok(())
}

/// One row per atom: name, symbol, charge, lone pairs, unpaired electrons,
/// implicit hydrogens and bond count.
pub fn valence_table(mol: &Molecule) -> String {
    let ids = IdMap::for_molecule(mol);
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<6} {:>6} {:>4} {:>4} {:>4} {:>5}\n",
        "ID", "SYMBOL", "CHARGE", "LP", "UE", "H", "BONDS"
    ));
    for (id, atom) in mol.atoms_iter() {
        let charge = if atom.is_charge_auto() {
            format!("{:+}*", atom.charge())
        } else {
            format!("{:+}", atom.charge())
        };
        out.push_str(&format!(
            "{:<6} {:<6} {:>6} {:>4} {:>4} {:>4} {:>5}\n",
            ids.name(id).unwrap_or_default(),
            atom.symbol(),
            charge,
            atom.lone_pairs(),
            atom.unpaired_electrons(),
            atom.implicit_hydrogens(),
            atom.bond_count()
        ));
    }
    out
}
