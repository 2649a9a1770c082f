/*!
Proof files in DRAT, LRAT, and FRAT, textual or binary.

The three formats carry increasing amounts of auxiliary detail:

- DRAT records the literals of each derivation (and deletion).
- LRAT adds the clause identifier and a chain of antecedent identifiers to each derivation, and
  requires the chain to be non-empty.
- FRAT additionally records the original formula (`o` lines), explicit `a`/`d` markers, per-clause
  finalization (`f` lines), and todo notes (`t` lines).

Binary encodings write each integer as a base-128 varint, low seven bits first with the high bit
as continuation; signed values are first mapped through `2·|n| + (n < 0)`.
Step markers (`a`, `d`, `o`, `f`, `t`, `l`) are single ASCII bytes, and clauses and chains are
zero-terminated.

LRAT deletions are batched: identifiers accumulate and are emitted as one deletion statement
immediately before the next addition (or on flush), in chunks bounded to keep individual
statements manageable.
*/

use std::io::Write;

use crate::{
    db::ClauseId,
    misc::log::targets::{self},
    proof::Tracer,
};

/// The family of proof format to write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofFormat {
    Drat,
    Lrat,
    Frat,
}

/// The bound on identifiers in a single batched LRAT deletion statement.
const DELETE_CHUNK: usize = 1 << 16;

/// A tracer writing a proof file.
pub struct FileTracer<W: Write> {
    sink: W,
    format: ProofFormat,
    binary: bool,

    /// Whether deletions are recorded at all.
    delete_lines: bool,

    /// Deletions awaiting emission, LRAT only.
    pending_deletes: Vec<ClauseId>,

    /// The identifier of the most recent addition, used to prefix textual LRAT deletions.
    latest_id: ClauseId,

    added: u64,
    deleted: u64,
    closed: bool,
}

impl<W: Write> FileTracer<W> {
    pub fn new(sink: W, format: ProofFormat, binary: bool, delete_lines: bool) -> Self {
        FileTracer {
            sink,
            format,
            binary,
            delete_lines,
            pending_deletes: Vec::default(),
            latest_id: 0,
            added: 0,
            deleted: 0,
            closed: false,
        }
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    /// A borrow of the underlying sink --- e.g. to inspect an in-memory trace.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// A count of added and deleted clauses written so far.
    pub fn totals(&self) -> (u64, u64) {
        (self.added, self.deleted)
    }

    fn put_byte(&mut self, byte: u8) {
        let _ = self.sink.write_all(&[byte]);
    }

    fn put_unsigned(&mut self, mut n: u64) {
        while n & !0x7f != 0 {
            self.put_byte(((n & 0x7f) | 0x80) as u8);
            n >>= 7;
        }
        self.put_byte(n as u8);
    }

    fn put_signed(&mut self, n: i64) {
        self.put_unsigned(2 * n.unsigned_abs() + (n < 0) as u64);
    }

    fn put_literal(&mut self, literal: i32) {
        debug_assert!(literal != i32::MIN);
        self.put_signed(literal as i64);
    }

    /// Emits any batched LRAT deletions, in bounded chunks.
    fn emit_pending_deletes(&mut self) {
        if self.pending_deletes.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_deletes);
        for chunk in pending.chunks(DELETE_CHUNK) {
            if self.binary {
                self.put_byte(b'd');
                for id in chunk {
                    self.put_signed(*id as i64);
                }
                self.put_byte(0);
            } else {
                let _ = write!(self.sink, "{} d ", self.latest_id);
                for id in chunk {
                    let _ = write!(self.sink, "{id} ");
                }
                let _ = writeln!(self.sink, "0");
            }
        }
    }
}

impl<W: Write> Tracer for FileTracer<W> {
    fn begin_proof(&mut self, id: ClauseId) {
        self.latest_id = id;
    }

    fn add_original_clause(&mut self, id: ClauseId, clause: &[i32]) {
        // Only FRAT files record the original formula.
        if self.format != ProofFormat::Frat || self.closed {
            return;
        }
        if self.binary {
            self.put_byte(b'o');
            self.put_unsigned(id);
            for literal in clause {
                self.put_literal(*literal);
            }
            self.put_byte(0);
        } else {
            let _ = write!(self.sink, "o {id} ");
            for literal in clause {
                let _ = write!(self.sink, "{literal} ");
            }
            let _ = writeln!(self.sink, "0");
        }
    }

    fn add_derived_clause(
        &mut self,
        id: ClauseId,
        _redundant: bool,
        imported: bool,
        _glue: i32,
        clause: &[i32],
        chain: &[ClauseId],
    ) {
        // Imported clauses are someone else's derivations and have no place in this proof.
        if imported || self.closed {
            return;
        }

        if self.format == ProofFormat::Lrat {
            self.emit_pending_deletes();
            if chain.is_empty() {
                panic!("! LRAT derivation [{id}] without a chain");
            }
        }

        if self.binary {
            self.put_byte(b'a');
            match self.format {
                ProofFormat::Drat => {}
                ProofFormat::Lrat => self.put_signed(id as i64),
                ProofFormat::Frat => self.put_unsigned(id),
            }
            for literal in clause {
                self.put_literal(*literal);
            }
            self.put_byte(0);
            match self.format {
                ProofFormat::Drat => {}
                ProofFormat::Lrat => {
                    for hint in chain {
                        self.put_signed(*hint as i64);
                    }
                    self.put_byte(0);
                }
                ProofFormat::Frat => {
                    self.put_byte(b'l');
                    for hint in chain {
                        self.put_signed(*hint as i64);
                    }
                    self.put_byte(0);
                }
            }
        } else {
            match self.format {
                ProofFormat::Drat => {}
                ProofFormat::Lrat => {
                    let _ = write!(self.sink, "{id} ");
                }
                ProofFormat::Frat => {
                    let _ = write!(self.sink, "a {id} ");
                }
            }
            for literal in clause {
                let _ = write!(self.sink, "{literal} ");
            }
            match self.format {
                ProofFormat::Drat => {
                    let _ = writeln!(self.sink, "0");
                }
                ProofFormat::Lrat => {
                    let _ = write!(self.sink, "0 ");
                    for hint in chain {
                        let _ = write!(self.sink, "{hint} ");
                    }
                    let _ = writeln!(self.sink, "0");
                }
                ProofFormat::Frat => {
                    let _ = write!(self.sink, "0 l ");
                    for hint in chain {
                        let _ = write!(self.sink, "{hint} ");
                    }
                    let _ = writeln!(self.sink, "0");
                }
            }
        }

        self.added += 1;
        self.latest_id = id;

        // Make sure the empty clause is on disk in full.
        if clause.is_empty() {
            Tracer::flush(self);
        }
    }

    fn delete_clause(&mut self, id: ClauseId, clause: &[i32]) {
        if !self.delete_lines || self.closed {
            return;
        }
        match self.format {
            ProofFormat::Lrat => {
                self.pending_deletes.push(id);
            }

            ProofFormat::Drat => {
                if self.binary {
                    self.put_byte(b'd');
                    for literal in clause {
                        self.put_literal(*literal);
                    }
                    self.put_byte(0);
                } else {
                    let _ = write!(self.sink, "d ");
                    for literal in clause {
                        let _ = write!(self.sink, "{literal} ");
                    }
                    let _ = writeln!(self.sink, "0");
                }
            }

            ProofFormat::Frat => {
                if self.binary {
                    self.put_byte(b'd');
                    self.put_unsigned(id);
                    for literal in clause {
                        self.put_literal(*literal);
                    }
                    self.put_byte(0);
                } else {
                    let _ = write!(self.sink, "d {id} ");
                    for literal in clause {
                        let _ = write!(self.sink, "{literal} ");
                    }
                    let _ = writeln!(self.sink, "0");
                }
            }
        }
        self.deleted += 1;
    }

    fn finalize_clause(&mut self, id: ClauseId, clause: &[i32]) {
        // Only FRAT files record finalization.
        if self.format != ProofFormat::Frat || self.closed {
            return;
        }
        if self.binary {
            self.put_byte(b'f');
            self.put_unsigned(id);
            for literal in clause {
                self.put_literal(*literal);
            }
            self.put_byte(0);
        } else {
            let _ = write!(self.sink, "f {id} ");
            for literal in clause {
                let _ = write!(self.sink, "{literal} ");
            }
            let _ = writeln!(self.sink, "0");
        }
    }

    fn add_todo(&mut self, items: &[u64]) {
        // Only FRAT files record todo notes.
        if self.format != ProofFormat::Frat || self.closed {
            return;
        }
        if self.binary {
            self.put_byte(b't');
            for item in items {
                self.put_unsigned(*item);
            }
            self.put_byte(0);
        } else {
            let _ = write!(self.sink, "t ");
            for item in items {
                let _ = write!(self.sink, "{item} ");
            }
            let _ = writeln!(self.sink, "0");
        }
    }

    fn flush(&mut self) {
        self.emit_pending_deletes();
        let _ = self.sink.flush();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        Tracer::flush(self);
        self.closed = true;
        log::info!(
            target: targets::PROOF,
            "Traced {} added and {} deleted clauses",
            self.added,
            self.deleted,
        );
    }
}
