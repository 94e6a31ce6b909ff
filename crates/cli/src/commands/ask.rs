//! `barrister ask` — answer a single question about a document.

use anyhow::Result;
use barrister_core::fragment::FragmentSource;

use super::setup::build_session;

pub async fn run(file: &str, question: &str) -> Result<()> {
    let session = build_session()?;

    let fragments = session.source.retrieve(question, file).await?;
    tracing::debug!(fragments = fragments.len(), "Fragments retrieved");

    let answer = session.service.answer(&fragments, question, "").await;
    println!("{answer}");
    Ok(())
}
