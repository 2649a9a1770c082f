/*!
Echoing API calls to a file.

Getting a trace of API calls out of an application which uses the engine as a library is often
most convenient through the environment: if `STOAT_API_TRACE` (or `STOATAPITRACE`) names a path
when a context is built, every API call on that context is appended to the file.

As all traced contexts would otherwise write to the same file and produce garbage, a
process-global flag permits only one context at a time to trace through the environment
mechanism; the flag is released when the context is dropped.
A trace may instead be requested programmatically for a chosen path, which skips the flag.
*/

use std::{
    fs::File,
    io::Write,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{misc::log::targets::{self}, types::err};

/// Whether some context is tracing API calls through the environment variable mechanism.
static ENV_TRACE_HELD: AtomicBool = AtomicBool::new(false);

/// An open API trace.
pub(crate) struct ApiTrace {
    file: File,

    /// Whether this trace holds the process-global environment flag.
    from_environment: bool,
}

impl ApiTrace {
    /// An API trace at the path named by the environment, if one is named.
    ///
    /// Two live contexts cannot both trace through the environment --- the file would be garbage.
    pub(crate) fn from_environment() -> Option<ApiTrace> {
        let path = std::env::var("STOAT_API_TRACE")
            .or_else(|_| std::env::var("STOATAPITRACE"))
            .ok()?;
        if ENV_TRACE_HELD.swap(true, Ordering::SeqCst) {
            panic!("! Cannot trace API calls of two contexts through the environment");
        }
        match File::create(&path) {
            Ok(file) => {
                log::info!(target: targets::TRACE, "Tracing API calls to '{path}'");
                Some(ApiTrace {
                    file,
                    from_environment: true,
                })
            }
            Err(e) => {
                ENV_TRACE_HELD.store(false, Ordering::SeqCst);
                panic!("! Failed to open API trace file '{path}': {e}");
            }
        }
    }

    /// An API trace at the given path.
    pub(crate) fn to_path(path: impl AsRef<Path>) -> Result<ApiTrace, err::ProofError> {
        Ok(ApiTrace {
            file: File::create(path)?,
            from_environment: false,
        })
    }

    /// Appends one call to the trace, flushed immediately so a crash loses nothing.
    pub(crate) fn record(&mut self, line: std::fmt::Arguments) {
        let _ = writeln!(self.file, "{line}");
        let _ = self.file.flush();
    }
}

impl Drop for ApiTrace {
    fn drop(&mut self) {
        if self.from_environment {
            ENV_TRACE_HELD.store(false, Ordering::SeqCst);
        }
    }
}

/// Records an API call to the trace of the context, if one is open.
macro_rules! trace_api {
    ($ctx:expr, $($arg:tt)*) => {
        if let Some(trace) = &mut $ctx.api_trace {
            trace.record(format_args!($($arg)*));
        }
    };
}

pub(crate) use trace_api;
