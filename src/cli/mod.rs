//! CLI infrastructure for td2048
//!
//! This module provides the command-line interface for training agents on
//! 2048 and inspecting saved knowledge files.

pub mod commands;
pub mod output;
