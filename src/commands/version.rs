use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("battalert version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
