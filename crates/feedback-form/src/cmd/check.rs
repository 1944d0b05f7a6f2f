use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::load_form;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Form definition (.json or .toml)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct QuestionSummary {
    number: u32,
    question_type: &'static str,
    recipients: usize,
    recipient_selection: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    id: String,
    title: String,
    questions: Vec<QuestionSummary>,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let loaded = load_form(&args.form, None)?;
    let output = CheckOutput {
        id: loaded.definition.id.clone(),
        title: loaded.definition.title.clone(),
        questions: loaded
            .registry
            .iter()
            .map(|question| QuestionSummary {
                number: question.number.number(),
                question_type: question.kind.wire_label(),
                recipients: question.recipients,
                recipient_selection: question.recipient_selection,
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    println!(
        "{} ({}): {} question(s) ok",
        output.title,
        output.id,
        output.questions.len()
    );
    for question in &output.questions {
        println!(
            "  {:>3}  {:<15} recipients={}{}",
            question.number,
            question.question_type,
            question.recipients,
            if question.recipient_selection {
                " (selectable)"
            } else {
                ""
            }
        );
    }
    Ok(())
}
