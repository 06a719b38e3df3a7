// SPDX-License-Identifier: MIT
//
// vito-term — key events and input decoding for vito.
//
// The editor core only ever sees `KeyEvent`s. This crate owns their
// shape and the byte-level decoder that produces them, so hosts that
// read from a terminal, a pipe, or a test script share one definition.

pub mod input;
