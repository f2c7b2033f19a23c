//! Tagwire — a self-describing tagged binary encoding format.
//!
//! Every value is stored as a one-byte type tag followed by a type-dependent
//! payload, so a stream can be decoded without an externally supplied schema.
//! Records written by a newer schema version remain readable by older code:
//! the reader can skip-scan the fields it does not know and re-emit them
//! byte-for-byte when writing the record back out.
//!
//! # Architecture
//!
//! - **`wire`** — Tag algebra, packed integers, the `Writer`/`Reader` codec
//!   and the skip-scanner
//! - **`cursor`** — Byte source/sink traits and slice/bytes/std-io adapters
//! - **`record`** — The `Record` trait wiring user-defined types into the
//!   codec
//! - **`error`** — `WireError`

pub mod cursor;
pub mod error;
pub mod record;
pub mod wire;
