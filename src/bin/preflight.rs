use student_records::{open_store, AppConfig};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads (optional) env vars:\n\
           DATABASE_URL, BIND_ADDR, DB_MAX_CONNECTIONS, PAGE_SIZE\n\
         Without DATABASE_URL the server falls back to an in-memory store.\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if malformed)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", config.db_max_connections);
    println!("  PAGE_SIZE={}", config.page_size);
    match &config.database_url {
        Some(_) => println!("  DATABASE_URL=<set>"),
        None => println!("  DATABASE_URL=<unset> (in-memory store)"),
    }

    let store = open_store(&config).await?;
    store.ping().await?;
    println!("  Store: reachable");

    let page = store.list(&Default::default()).await?;
    println!("  Students on record: {}", page.total);

    println!("> Preflight OK");
    Ok(())
}
