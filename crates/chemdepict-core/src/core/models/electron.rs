use super::position::{Compass, ElectronPosition};

/// An explicit lone pair or single electron drawn next to its atom.
///
/// Electrons have no identity of their own: they live inside the owning
/// [`Atom`](super::atom::Atom) and are created and destroyed through the molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Electron {
    /// `true` for a lone pair (two dots), `false` for an unpaired electron.
    pub is_pair: bool,
    pub position: ElectronPosition,
}

impl Electron {
    pub fn pair(position: ElectronPosition) -> Self {
        Self {
            is_pair: true,
            position,
        }
    }

    pub fn single(position: ElectronPosition) -> Self {
        Self {
            is_pair: false,
            position,
        }
    }

    /// The compass slot held by this electron, if it is anchored to one.
    pub fn slot(&self) -> Option<Compass> {
        match self.position {
            ElectronPosition::Compass(c) => Some(c),
            ElectronPosition::Angle { .. } => None,
        }
    }

    pub fn node_name(&self) -> &'static str {
        if self.is_pair { "electron-pair" } else { "electron" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_reported_only_for_compass_positions() {
        let e = Electron::pair(ElectronPosition::Compass(Compass::North));
        assert_eq!(e.slot(), Some(Compass::North));
        let free = Electron::single(ElectronPosition::Angle {
            angle: 30.0,
            dist: 0.0,
        });
        assert_eq!(free.slot(), None);
    }

    #[test]
    fn node_name_reflects_pairing() {
        assert_eq!(
            Electron::pair(ElectronPosition::Compass(Compass::East)).node_name(),
            "electron-pair"
        );
        assert_eq!(
            Electron::single(ElectronPosition::Compass(Compass::East)).node_name(),
            "electron"
        );
    }
}
