// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::blockchain::ClientError;
use crate::config::ConfigError;
use crate::watcher::FetchError;

/// Top-level error for the command-line tool.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Inputs incomplete, no balance fetched")]
    NotReady,
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::NotReady => 2,
            AppError::Client(_) | AppError::Fetch(_) => 1,
            AppError::Output(_) => 1,
        }
    }
}
