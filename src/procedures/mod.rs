/*!
Procedures over the databases of a context.

- [bcp] --- boolean constraint propagation over the watch lists, deriving units at the root.
- [collect] --- garbage collection: dropping satisfied clauses and strengthening falsified
  literals out of survivors, with matching proof events.
- [compact] --- compaction of the internal variable domain.
- [import] --- ingestion of clauses derived elsewhere.
- [inprocess] --- status hooks for an external inprocessor (elimination, substitution, purity),
  and the probe schedule.
- [solve] --- the root-level driver, plus the decision hooks an external search loop consumes.
*/

pub mod bcp;
pub mod collect;
pub mod compact;
pub mod import;
pub mod inprocess;
pub mod solve;
