//! Args command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::build_args::{parse_args, split_tokens, ParseOutcome, USAGE};

/// Validate SCons-style build target and options
#[derive(Args, Debug)]
pub struct ArgsCommand {
    /// Print the options record as JSON
    #[arg(long)]
    pub json: bool,

    /// Build target followed by key=value options, e.g. `run profile=fast`
    pub tokens: Vec<String>,
}

impl ArgsCommand {
    /// Execute the args command
    pub fn execute(self, _verbose: bool) -> Result<()> {
        let (targets, arguments) = split_tokens(&self.tokens);

        let options = match parse_args(&targets, &arguments)? {
            ParseOutcome::Help => {
                println!("{}", USAGE);
                return Ok(());
            }
            ParseOutcome::Options(options) => options,
        };

        if self.json {
            let json = serde_json::to_string_pretty(&options)
                .context("Failed to serialize build options")?;
            println!("{}", json);
        } else {
            for (key, value) in options.to_pairs() {
                println!("{}={}", key, value);
            }
        }
        Ok(())
    }
}
