//! Domain models for got-done.
//!
//! # Core Concepts
//!
//! - [`Category`]: Named bucket of to-dos. Categories are permanent: they can
//!   be renamed but never deleted, so a to-do always points at a live one.
//! - [`Todo`]: A dated item inside a category, owning an ordered list of
//!   subtasks.
//! - [`Subtask`]: Exclusively owned by one to-do, with its own due date and
//!   an explicit `position` among its siblings.
//! - [`Completion`]: Append-only ledger entry written whenever a to-do or
//!   subtask is marked done. The source item keeps living with its done flag
//!   set; the ledger is the separate "got done" record.

mod category;
mod completion;
mod subtask;
mod todo;

pub use category::*;
pub use completion::*;
pub use subtask::*;
pub use todo::*;
