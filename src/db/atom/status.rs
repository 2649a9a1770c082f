/// The status of an atom.
///
/// Every allocated atom holds exactly one status.
/// Atoms are born [Active](AtomStatus::Active) when first referenced by an external literal, may
/// become [Fixed](AtomStatus::Fixed) on a root-level assignment or leave the formula through
/// inprocessing, and never return to active --- compaction retires the index instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AtomStatus {
    /// In the formula, without a root-level value.
    #[default]
    Active,

    /// Assigned at the root, permanently.
    Fixed,

    /// Removed by clause elimination.
    Eliminated,

    /// Replaced by another literal during equivalence substitution.
    Substituted,

    /// Removed as pure --- one polarity never occurs.
    Pure,
}

impl AtomStatus {
    /// Whether the atom counts towards the compacted domain.
    pub fn is_active(&self) -> bool {
        matches!(self, AtomStatus::Active)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, AtomStatus::Fixed)
    }

    /// Whether the atom left the formula through inprocessing.
    pub fn is_removed(&self) -> bool {
        matches!(
            self,
            AtomStatus::Eliminated | AtomStatus::Substituted | AtomStatus::Pure
        )
    }
}
