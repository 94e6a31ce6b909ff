//! `barrister chat` — interactive QA session over one document.
//!
//! Each turn retrieves fragments for the question, answers with the full
//! conversation history, and records the pair. `/report` exports the PDF
//! transcript; `/quit` ends the session.

use std::io::{BufRead, Write};

use anyhow::Result;
use barrister_core::fragment::FragmentSource;
use barrister_core::model::ModelResponse;
use barrister_report::ReportWriter;

use super::setup::build_session;

pub async fn run(file: &str) -> Result<()> {
    let session = build_session()?;
    let writer = ReportWriter::new(session.config.report.output_dir.clone());

    let mut questions: Vec<String> = Vec::new();
    let mut answers: Vec<ModelResponse> = Vec::new();

    println!("Chatting about {file}. Type /report to export a PDF, /quit to exit.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/report" => {
                if questions.is_empty() {
                    println!("Nothing to report yet.");
                    continue;
                }
                let path = writer.generate(&questions, &answers)?;
                println!("Report written to {}", path.display());
                continue;
            }
            question => {
                let fragments = session.source.retrieve(question, file).await?;
                let history = format_history(&questions, &answers);
                let answer = session.service.answer(&fragments, question, &history).await;

                println!("{answer}");

                questions.push(question.to_string());
                answers.push(ModelResponse::Text(answer));
            }
        }
    }

    Ok(())
}

/// Render prior turns the way the QA template's history section expects.
fn format_history(questions: &[String], answers: &[ModelResponse]) -> String {
    questions
        .iter()
        .zip(answers.iter())
        .map(|(q, a)| format!("User: {q}\nAI: {}", a.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
