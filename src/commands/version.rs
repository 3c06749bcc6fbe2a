use anyhow::Result;

pub async fn handle_version() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    println!("{} v{}", NAME, VERSION);
    println!("{}", DESCRIPTION);
    Ok(())
}
