// src/cli/publish.rs
use tracing::info;

use crate::agol::ArcGisClient;
use crate::notify::ConsoleNotifier;
use crate::salesforce::SalesforceClient;
use crate::settings::io;
use crate::skid::{Skid, SkidError};

pub fn run() -> Result<(), SkidError> {
    let secrets = io::load_secrets()?;
    let extractor = SalesforceClient::from_secrets(&secrets)?;
    let publisher = ArcGisClient::from_secrets(&secrets)?;

    let mut skid = Skid::new(extractor, publisher, ConsoleNotifier, &secrets);
    let published = skid.publish()?;

    println!("\n=== Published Items ===\n");
    for (key, item) in &published {
        println!("{:<14} {}  ({} rows)", key.to_string(), item.item_id, item.rows);
        println!("{:<14} {}", "", item.service_url);
    }
    info!("Published {} items; copy the ids into secrets.json", published.len());
    Ok(())
}
