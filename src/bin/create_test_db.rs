use std::env;
use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use session_ledger::{
    SessionId, Transaction, TransactionTitle, TransactionType, create_cookie_key,
    create_transaction, initialize_db, session_cookie_value,
};

/// A utility for creating a test database for the REST API server of session_ledger.
///
/// The `SECRET` environment variable must hold the same secret the server is
/// started with so that the printed cookie is accepted.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    let Ok(secret) = env::var("SECRET") else {
        eprintln!("The environment variable 'SECRET' must be set");
        exit(1);
    };

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let session_id = SessionId::new();
    let seed = [
        ("Salary", 500_000, TransactionType::Credit),
        ("Groceries", 12_345, TransactionType::Debit),
    ];

    for (title, amount, type_) in seed {
        let amount = type_.signed_amount(amount)?;
        create_transaction(
            Transaction::build(TransactionTitle::new(title)?, amount, session_id),
            &conn,
        )?;
    }

    let Some(cookie_value) = session_cookie_value(create_cookie_key(&secret), session_id) else {
        eprintln!("Could not encrypt the session cookie");
        exit(1);
    };

    println!("Success! Test session ID: {session_id}");
    println!("Send this header to act as the test session:");
    println!("Cookie: session_id={cookie_value}");

    Ok(())
}
