//! `barrister summarize` — summarize a document.

use anyhow::Result;
use barrister_core::fragment::FragmentSource;

use super::setup::build_session;

pub async fn run(file: &str) -> Result<()> {
    let session = build_session()?;

    let fragments = session.source.load_all(file).await?;
    let summary = session.service.summarize(&fragments).await;
    println!("{summary}");
    Ok(())
}
