use anyhow::Context;
use chrono::NaiveDate;
use tracing::{info, warn};

use stockindex_core::{StockIndex, StockIndexQuote};
use stockindex_storage_sqlite::{
    get_connection, reset_schema, DbPool, DbTransactionExecutor, StockIndexRepository,
};

const DEMO_INDEX_ID: i64 = 1;

pub fn init_db(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = get_connection(pool)?;
    reset_schema(&mut conn).context("Failed to recreate schema")?;
    info!("Schema recreated");
    Ok(())
}

pub fn show(pool: &DbPool, id: i64, pretty: bool) -> anyhow::Result<()> {
    let index = pool.execute(|repo| repo.get_by_id(id))?;
    match index {
        Some(index) => {
            let json = if pretty {
                serde_json::to_string_pretty(&index)?
            } else {
                serde_json::to_string(&index)?
            };
            println!("{}", json);
        }
        None => println!("Stock index {} not found", id),
    }
    Ok(())
}

/// Each step runs in its own scope; a failed step is reported and the
/// walkthrough moves on.
pub fn demo(pool: &DbPool) -> anyhow::Result<()> {
    let wig20 = StockIndex::with_quotes(
        DEMO_INDEX_ID,
        "WIG20",
        quotes(&[(2000.0, (2016, 1, 4)), (1900.0, (2016, 1, 6)), (1800.0, (2016, 1, 7))])?,
    );
    if let Err(e) = pool.execute(|repo| repo.add(&wig20)) {
        warn!("{}", e);
        println!("{}", e);
    }
    print_index(pool)?;

    let wig30 = StockIndex::with_quotes(
        DEMO_INDEX_ID,
        "WIG30",
        quotes(&[
            (22000.0, (2016, 1, 4)),
            (21900.0, (2016, 1, 6)),
            (21800.0, (2016, 1, 7)),
        ])?,
    );
    if let Err(e) = pool.execute(|repo| repo.update(&wig30)) {
        warn!("{}", e);
        println!("{}", e);
    }
    print_index(pool)?;

    if let Err(e) = pool.execute(|repo| repo.delete(DEMO_INDEX_ID)) {
        warn!("{}", e);
        println!("{}", e);
    }
    Ok(())
}

fn print_index(pool: &DbPool) -> anyhow::Result<()> {
    let mut repo = StockIndexRepository::open(pool)?;
    match repo.get_by_id(DEMO_INDEX_ID)? {
        Some(index) => println!("{}", index),
        None => println!("None"),
    }
    repo.close()?;
    Ok(())
}

fn quotes(points: &[(f64, (i32, u32, u32))]) -> anyhow::Result<Vec<StockIndexQuote>> {
    points
        .iter()
        .map(|&(value, (y, m, d))| {
            let date = NaiveDate::from_ymd_opt(y, m, d)
                .with_context(|| format!("Invalid quote date {}-{}-{}", y, m, d))?;
            Ok(StockIndexQuote::new(value, date))
        })
        .collect()
}
