// src/cli/list_fields.rs
use crate::datasets::{self, DatasetDescriptor, DatasetKey, LayerKind};
use crate::fields::CompositeRule;

pub fn run(dataset: Option<DatasetKey>) {
    let selected = match dataset {
        Some(key) => vec![datasets::by_key(key)],
        None => datasets::all(),
    };

    for dataset in &selected {
        print_dataset(dataset);
    }
}

fn print_dataset(dataset: &DatasetDescriptor) {
    println!("=== {} ({}) ===\n", dataset.title, dataset.table_name);

    match dataset.kind {
        LayerKind::Layer(point) => println!(
            "Point layer from {} / {}, northing {}-{}, easting {}-{}",
            point.easting_field,
            point.northing_field,
            point.bounds.min_northing,
            point.bounds.max_northing,
            point.bounds.min_easting,
            point.bounds.max_easting
        ),
        LayerKind::Table => println!("Table (no geometry)"),
    }
    if let Err(e) = dataset.validate() {
        println!("INVALID: {}", e);
    }
    println!();

    println!("{:<14} {:<40} {:<10} {}", "Field", "Salesforce", "Type", "Alias");
    println!("{}", "-".repeat(100));

    for field in &dataset.fields {
        let source = match (&field.sf_field, &field.static_value, &field.composite) {
            (Some(sf), _, _) if field.flatten => format!("{} (flattened)", sf),
            (Some(sf), _, _) => sf.clone(),
            (None, Some(value), _) => format!("= \"{}\"", value),
            (None, None, Some(CompositeRule::Template(template))) => template.clone(),
            (None, None, None) => "-".to_string(),
        };
        println!(
            "{:<14} {:<40} {:<10} {}",
            field.agol_field,
            source,
            field.kind.as_str(),
            field.alias
        );
    }

    match dataset.soql_query() {
        Some(soql) => println!("\nSOQL: {}\n", soql),
        None => println!("\nSource: Apex REST endpoint\n"),
    }
}
