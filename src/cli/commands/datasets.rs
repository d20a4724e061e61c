//! Datasets command implementation
//!
//! Prints the dataset registry: ids, labels, backing relations and
//! column definitions. This is the same catalog the platform's column
//! picker is driven by.

use clap::Args;

use crate::registry;

/// Arguments for the datasets command
#[derive(Args, Debug)]
pub struct DatasetsArgs {
    /// Show only this dataset
    #[arg(long)]
    pub dataset: Option<String>,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

impl DatasetsArgs {
    /// Execute the datasets command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let datasets: Vec<_> = match &self.dataset {
            Some(id) => match registry::dataset(id) {
                Some(dataset) => vec![dataset],
                None => {
                    eprintln!("❌ Unknown dataset: {id}");
                    return Ok(2);
                }
            },
            None => registry::all_datasets().iter().collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&datasets)?);
            return Ok(0);
        }

        for dataset in datasets {
            println!(
                "{} ({}) - relation '{}'{}",
                dataset.id,
                dataset.label,
                dataset.relation,
                if dataset.requires_join { ", joined" } else { "" }
            );
            for column in dataset.columns {
                println!(
                    "    {:<14} {:<14} {:?}{}",
                    column.id,
                    column.label,
                    column.column_type,
                    if column.default_selected { "" } else { "  (optional)" }
                );
            }
            println!();
        }

        Ok(0)
    }
}
