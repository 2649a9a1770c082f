/*!
Items related to [logging](log).

Calls to the log macros are made throughout the library, scoped by target to the relevant
subsystem.
These are intended to provide useful information for embedding the library and/or fixing issues.

Note, no log implementation is provided.
For details on obtaining output, see [log].
*/

/// Targets to be used within a [log] macro.
pub mod targets {
    pub const ATOM_DB: &str = "atom_db";
    pub const CLAUSE_DB: &str = "clause_db";
    pub const COLLECTION: &str = "collection";
    pub const COMPACTION: &str = "compaction";
    pub const EXPORT: &str = "export";
    pub const IMPORT: &str = "import";
    pub const PROOF: &str = "proof";
    pub const PROPAGATION: &str = "propagation";
    pub const TRACE: &str = "trace";
}
