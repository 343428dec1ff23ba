// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use fintrack::{cli, commands, config::Settings, logging, store::SqliteStore};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::from_matches(&matches)?;
    logging::init(settings.verbosity);
    tracing::debug!(?settings, "resolved settings");

    if let Some(("category", sub)) = matches.subcommand() {
        return commands::categories::handle(sub);
    }

    let mut store = SqliteStore::open(&settings.db_path)?;
    let owner = &settings.owner;

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&mut store, owner, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut store, owner, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
