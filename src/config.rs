// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use crate::db;
use crate::models::UserId;

pub const DEFAULT_OWNER: &str = "local";

/// Runtime settings resolved from global CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub owner: UserId,
    pub verbosity: u8,
}

impl Settings {
    /// `--db` / `FINTRACK_DB` and `--user` / `FINTRACK_USER` are read by clap;
    /// anything still missing falls back to the platform data dir and `$USER`.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) => PathBuf::from(p),
            None => db::default_db_path()?,
        };
        let owner = m
            .get_one::<String>("user")
            .cloned()
            .or_else(|| std::env::var("USER").ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER.to_string());
        Ok(Settings {
            db_path,
            owner: UserId::new(owner.trim()),
            verbosity: m.get_count("verbose"),
        })
    }
}
