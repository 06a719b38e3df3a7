//! # vito-editor — text-object engine and the editor core it runs on
//!
//! - **[`text_object`]** — `TextObjectMode`, the key-by-key parser for
//!   `[count][i|a]kind` and the code that applies it
//! - **[`host`]** — the `Host` / `TextView` traits a session talks to
//! - **[`word`]** — next-word boundary, with a line-crossing policy
//! - **[`buffer`]**, **[`position`]**, **[`cursor`]** — rope-backed text
//!   and coordinates
//! - **[`history`]** — undo/redo in action groups
//! - **[`register`]** — where deleted and yanked text goes
//! - **[`mode`]**, **[`options`]**, **[`error`]**

pub mod buffer;
pub mod cursor;
pub mod error;
pub mod history;
pub mod host;
pub mod mode;
pub mod options;
pub mod position;
pub mod register;
pub mod text_object;
pub mod word;
