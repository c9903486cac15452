// src/cli/mod.rs
// Command line surface and maintenance tools

pub mod check_environment;
pub mod list_fields;
pub mod publish;

use clap::{Parser, Subcommand};

use crate::datasets::DatasetKey;

#[derive(Parser)]
#[command(name = "deq-tanks")]
#[command(version)]
#[command(about = "Copies DEQ petroleum storage tank records from Salesforce into ArcGIS Online", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create, share and fill the hosted feature services (run once)
    Publish,

    /// Print the field mapping and SOQL query for each dataset
    ListFields {
        /// Only this dataset
        #[arg(value_enum)]
        dataset: Option<DatasetKey>,
    },

    /// Show the detected host, cloud/local status and secrets file
    CheckEnvironment,
}
