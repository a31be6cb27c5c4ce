// SPDX-License-Identifier: MIT

//! Generation kit: model providers, the text-generation client contract,
//! output parsing and the crate error types.

pub mod client;
pub mod error;
pub mod model;
pub mod output;
