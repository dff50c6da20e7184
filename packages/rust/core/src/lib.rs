//! Core pipeline and domain logic for advisorboard.
//!
//! Reads the advisor table, renders it as a JavaScript array and splices
//! that array into the marked region of an HTML document (`update_board`).

pub mod patcher;
pub mod pipeline;
pub mod reader;
pub mod render;
