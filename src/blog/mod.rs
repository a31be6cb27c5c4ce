// SPDX-License-Identifier: MIT

pub mod config;
pub mod language;
pub mod persist;
pub mod workflow;
