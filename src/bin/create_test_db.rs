use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use spendsight::{
    CategoryName, PasswordHash, Transaction, TransactionKind, UserID, ValidatedPassword,
    create_transaction, create_user, initialize_db,
};

/// A utility for creating a populated test database for spendsight.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_USERNAME: &str = "demo";
const TEST_PASSWORD: &str = "Correct4Horse!BatteryStaple";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let connection = Connection::open(output_path)?;
    initialize_db(&connection)?;

    let password_hash = PasswordHash::new(
        ValidatedPassword::new(TEST_PASSWORD)?,
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(TEST_USERNAME, password_hash, &connection)?;

    let today = OffsetDateTime::now_utc().date();

    // A year of plausible data: salary and rent every month, plus a spread of
    // smaller expenses.
    for months_back in 0..12 {
        let date = today - Duration::days(30 * months_back);

        insert_transaction(&connection, user.id, 4200.0, date, TransactionKind::Income, "Salary", None)?;
        insert_transaction(
            &connection,
            user.id,
            1450.0,
            date - Duration::days(2),
            TransactionKind::Expense,
            "Rent",
            None,
        )?;
        insert_transaction(
            &connection,
            user.id,
            87.5 + (months_back as f64) * 3.0,
            date - Duration::days(5),
            TransactionKind::Expense,
            "Groceries",
            Some("weekly shop"),
        )?;
        insert_transaction(
            &connection,
            user.id,
            15.99,
            date - Duration::days(10),
            TransactionKind::Expense,
            "Streaming Services",
            Some("subscriptions"),
        )?;
    }

    println!(
        "Created test database at {} with user {TEST_USERNAME:?} and password {TEST_PASSWORD:?}.",
        args.output_path
    );

    Ok(())
}

fn insert_transaction(
    connection: &Connection,
    user_id: UserID,
    amount: f64,
    date: Date,
    kind: TransactionKind,
    category: &str,
    tags: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let category = CategoryName::new(kind, category)?;

    create_transaction(
        Transaction::build(user_id, amount, date, kind, category)
            .tags(tags.map(str::to_owned)),
        connection,
    )?;

    Ok(())
}
