use thiserror::Error;

use super::config::SettingsError;
use crate::core::models::ids::AtomId;

/// Why a wedge or hash could not be assigned at a stereocenter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StereoError {
    #[error("Atom {0:?} is not in the molecule")]
    MissingAtom(AtomId),

    #[error("Atom {0:?} has no stereo neighbors declared")]
    NotStereocenter(AtomId),

    #[error("Stereocenter {center:?} is not fully connected yet (neighbor slot {missing})")]
    Incomplete { center: AtomId, missing: usize },

    #[error("Stereocenter {0:?} has no neighbor that can carry a wedge or hash")]
    Undepictable(AtomId),

    #[error("Neighbors of stereocenter {0:?} are collinear")]
    Degenerate(AtomId),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid depiction settings: {source}")]
    Settings {
        #[from]
        source: SettingsError,
    },
}
