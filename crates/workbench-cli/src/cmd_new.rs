// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `wb n` (create) command.

use clap::Args;
use workbench::{Config, ExecutionMode};

/// Create a new bench and run its creation hook
#[derive(Debug, Args)]
pub struct CmdNew {
    /// Bench name; omit to list all benches
    pub name: Option<String>,

    /// Print the composed session text instead of executing or creating
    #[clap(long)]
    pub dump: bool,

    /// Arguments forwarded to the creation hook
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl CmdNew {
    pub fn run(&self, config: &Config) -> workbench::Result<i32> {
        super::cmd_activate::run_exec(
            config,
            ExecutionMode::New,
            self.name.as_deref(),
            &self.args,
            self.dump,
        )
    }
}
