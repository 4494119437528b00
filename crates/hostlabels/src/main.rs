mod cli;

use std::path::Path;

use clap::Parser;
use eyre::{bail, WrapErr};

use hostlabels_core::labels::{format_labels, load_labels, save_labels};
use hostlabels_core::{Expander, FactProvider, Label, LabelStore, StaticFacts, SystemFacts};

use cli::{Cli, Command};

fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let facts: Box<dyn FactProvider> = match &args.facts_file {
        Some(path) => {
            let facts = StaticFacts::load(path).context("load fact fixture")?;
            tracing::info!(path = %path.display(), "using fact fixture");
            Box::new(facts)
        }
        None => Box::new(SystemFacts::new()),
    };

    match args.command {
        Command::Render => {
            let store = open_store(&args.labels_file)?;
            let expander = Expander::new(facts.as_ref());
            let rendered =
                format_labels(&store, &expander, args.capacity).context("render labels")?;
            print!("{rendered}");
        }
        Command::Get { key, expand } => {
            let store = open_store(&args.labels_file)?;
            let Some(label) = store.get_label(&key) else {
                bail!("no label with key `{key}`");
            };
            if expand {
                let value = Expander::new(facts.as_ref())
                    .expand(label)
                    .context("expand label value")?;
                println!("{value}");
            } else {
                println!("{}", label.value);
            }
        }
        Command::Set {
            key,
            value,
            hidden,
            append,
        } => {
            let mut store = open_store(&args.labels_file)?;
            store
                .add(&key, &value, hidden, !append)
                .with_context(|| format!("set label `{key}`"))?;
            save_labels(&args.labels_file, &store).context("save label file")?;
            tracing::info!(
                key = %key,
                labels = store.len(),
                path = %args.labels_file.display(),
                "label saved"
            );
        }
        Command::Expand { template } => {
            let value = Expander::new(facts.as_ref())
                .expand_value(&template)
                .context("expand template")?;
            println!("{value}");
        }
        Command::Facts => {
            let snapshot = StaticFacts::capture(facts.as_ref()).context("gather system facts")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::List { all } => {
            let store = open_store(&args.labels_file)?;
            let labels: Box<dyn Iterator<Item = &Label> + '_> = if all {
                Box::new(store.iter())
            } else {
                Box::new(store.visible())
            };
            for label in labels {
                let marker = if label.hidden { "!" } else { "" };
                println!("{marker}{}", label.key);
            }
        }
    }

    Ok(())
}

/// Load the label file, treating a missing file as an empty store.
fn open_store(path: &Path) -> eyre::Result<LabelStore> {
    let store = load_labels(path).context("load label file")?;
    Ok(store.unwrap_or_else(|| {
        tracing::info!(path = %path.display(), "label file not found, starting empty");
        LabelStore::new()
    }))
}
