use crate::output::{format_answers, print_json};
use anyhow::Context;
use clap::Subcommand;
use helmgen_core::paths;
use helmgen_core::store::ConfigStore;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the answers stored in .helmgen.yaml
    Show,

    /// Print the path of the answer store
    Path,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Path => {
            println!("{}", paths::store_path(root).display());
            Ok(())
        }
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = ConfigStore::load(root).context("failed to load .helmgen.yaml")?;
    if json {
        return print_json(&store);
    }
    if store.answers.is_empty() {
        println!("No stored answers. Run 'helmgen app' to create a chart.");
        return Ok(());
    }
    print!("{}", format_answers(&store.answers));
    if let Some(version) = &store.generator_version {
        println!();
        println!("written by helmgen {version}");
    }
    Ok(())
}
