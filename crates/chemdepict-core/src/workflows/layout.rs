use crate::core::io::persist::IdMap;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use crate::engine::config::DepictionSettings;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::slots::{self, Anchor};
use crate::engine::{chemistry, stereo};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChargeReport {
    pub anchor: Anchor,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AtomReport {
    pub id: String,
    pub symbol: String,
    pub charge: i32,
    pub charge_auto: bool,
    pub lone_pairs: i32,
    pub unpaired_electrons: i32,
    pub implicit_hydrogens: i32,
    pub hydrogen_side: &'static str,
    pub draw_circle: bool,
    /// Compass codes still free for new symbols.
    pub free_slots: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_sign: Option<ChargeReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrossingReport {
    pub with: String,
    pub fraction: f64,
    pub in_front: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BondReport {
    pub id: String,
    pub begin: String,
    pub end: String,
    pub order: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_type: Option<&'static str>,
    pub level: i32,
    /// Segments as `[x1, y1, x2, y2]`; empty for a zero-length bond.
    pub lines: Vec<[f64; 4]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crossings: Vec<CrossingReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StereoReport {
    pub center: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a renderer needs to draw the molecule, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutReport {
    pub atoms: Vec<AtomReport>,
    pub bonds: Vec<BondReport>,
    pub stereo: Vec<StereoReport>,
}

impl LayoutReport {
    pub fn stereo_failures(&self) -> usize {
        self.stereo.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Lays out a whole molecule with the given settings.
///
/// Chemistry is recomputed for every atom, every stereocenter gets its wedge
/// or hash, then bond lines and crossings are computed for every bond. A
/// stereocenter that cannot be depicted is reported, not fatal.
///
/// # Errors
///
/// Returns [`EngineError::Settings`] if the settings fail validation.
#[instrument(skip_all, name = "layout_workflow")]
pub fn run(
    mol: &mut Molecule,
    settings: &DepictionSettings,
    reporter: &ProgressReporter,
) -> Result<LayoutReport, EngineError> {
    settings.validate()?;
    mol.set_settings(settings.clone());
    info!(
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        "Starting layout."
    );

    let atom_ids: Vec<AtomId> = mol.atoms_iter().map(|(id, _)| id).collect();
    let bond_ids: Vec<BondId> = mol.bonds_iter().map(|(id, _)| id).collect();
    let ids = IdMap::for_molecule(mol);
    let bond_names: HashMap<BondId, String> = bond_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, format!("b{}", i + 1)))
        .collect();
    let atom_name = |id: AtomId| ids.name(id).unwrap_or_default().to_string();

    reporter.report(Progress::PhaseStart { name: "Chemistry" });
    for id in &atom_ids {
        chemistry::recompute(mol, *id);
    }
    reporter.report(Progress::PhaseFinish {
        name: "Chemistry",
        items: atom_ids.len(),
    });

    reporter.report(Progress::PhaseStart { name: "Stereo" });
    let outcomes = stereo::assign_all(mol);
    let mut stereo_reports = Vec::with_capacity(outcomes.len());
    for (center, outcome) in &outcomes {
        let report = match outcome {
            Ok(assignment) => StereoReport {
                center: atom_name(*center),
                bond: bond_names.get(&assignment.bond).cloned(),
                error: None,
            },
            Err(e) => {
                reporter.report(Progress::Warning(format!("{}: {e}", atom_name(*center))));
                StereoReport {
                    center: atom_name(*center),
                    bond: None,
                    error: Some(e.to_string()),
                }
            }
        };
        stereo_reports.push(report);
    }
    reporter.report(Progress::PhaseFinish {
        name: "Stereo",
        items: outcomes.len(),
    });

    reporter.report(Progress::PhaseStart { name: "Bond lines" });
    mol.update_all_crossings();
    let mut bond_reports = Vec::with_capacity(bond_ids.len());
    for id in &bond_ids {
        let lines: Vec<[f64; 4]> = mol
            .bond_lines(*id)
            .map(|segments| {
                segments
                    .iter()
                    .map(|s| [s.start.x, s.start.y, s.end.x, s.end.y])
                    .collect()
            })
            .unwrap_or_default();
        let Some(bond) = mol.bond(*id) else {
            continue;
        };
        let mut crossings: Vec<CrossingReport> = bond
            .crossings()
            .iter()
            .filter_map(|(other, c)| {
                Some(CrossingReport {
                    with: bond_names.get(other)?.clone(),
                    fraction: c.fraction,
                    in_front: c.is_before,
                })
            })
            .collect();
        crossings.sort_by(|a, b| a.with.cmp(&b.with));
        bond_reports.push(BondReport {
            id: bond_names.get(id).cloned().unwrap_or_default(),
            begin: atom_name(bond.begin()),
            end: atom_name(bond.end()),
            order: bond.order(),
            bond_type: bond.bond_type().code(),
            level: bond.level(),
            lines,
            crossings,
        });
    }
    reporter.report(Progress::PhaseFinish {
        name: "Bond lines",
        items: bond_reports.len(),
    });

    reporter.report(Progress::PhaseStart { name: "Labels" });
    let mut atom_reports = Vec::with_capacity(atom_ids.len());
    for id in &atom_ids {
        slots::update_available_positions(mol, *id);
        let wants_sign = mol
            .atom(*id)
            .is_some_and(|a| a.charge() != 0 && a.show_charge());
        let charge_sign = if wants_sign {
            slots::charge_position(mol, *id).map(|p| ChargeReport {
                anchor: p.anchor,
                angle: p.angle,
                x: p.point.x,
                y: p.point.y,
            })
        } else {
            None
        };
        let Some(atom) = mol.atom(*id) else {
            continue;
        };
        atom_reports.push(AtomReport {
            id: atom_name(*id),
            symbol: atom.symbol().to_string(),
            charge: atom.charge(),
            charge_auto: atom.is_charge_auto(),
            lone_pairs: atom.lone_pairs(),
            unpaired_electrons: atom.unpaired_electrons(),
            implicit_hydrogens: atom.implicit_hydrogens(),
            hydrogen_side: atom.hydrogen_side().code(),
            draw_circle: atom.draw_circle(),
            free_slots: atom.slots().available().iter().map(|c| c.code()).collect(),
            charge_sign,
        });
    }
    reporter.report(Progress::PhaseFinish {
        name: "Labels",
        items: atom_reports.len(),
    });

    let report = LayoutReport {
        atoms: atom_reports,
        bonds: bond_reports,
        stereo: stereo_reports,
    };
    if report.stereo_failures() > 0 {
        warn!(
            failures = report.stereo_failures(),
            "Some stereocenters could not be depicted."
        );
    }
    info!("Layout finished.");
    Ok(report)
}
