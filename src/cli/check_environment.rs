// src/cli/check_environment.rs
use crate::settings::{environment, io};

pub fn run() {
    println!("=== Run Environment ===\n");

    let detected = environment::detect();
    println!("Host:        {}", detected.host_name);
    println!(
        "Mode:        {}",
        if detected.is_local_dev { "local development" } else { "cloud" }
    );

    match io::locate_secrets() {
        Ok(path) => {
            println!("Secrets:     {}", path.display());
            match io::load_secrets_from_file(&path) {
                Ok(secrets) => println!("             parsed ({:?})", secrets),
                Err(e) => println!("             unusable: {}", e),
            }
        }
        Err(e) => println!("Secrets:     {}", e),
    }
}
