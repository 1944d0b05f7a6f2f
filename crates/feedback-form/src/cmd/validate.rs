use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use form_engine::{Severity, ValidationOrchestrator};

use super::load_form;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Form definition (.json or .toml)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
    /// Answer file (.json)
    #[arg(value_name = "ANSWERS")]
    pub answers: PathBuf,
    /// Print the full validation result as JSON
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &ValidateArgs) -> Result<()> {
    let mut loaded = load_form(&args.form, Some(&args.answers))?;
    let validation =
        ValidationOrchestrator::default().validate_all(&loaded.registry, &mut loaded.store);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else {
        for report in &validation.reports {
            for group in &report.groups {
                if let Some(message) = &group.message {
                    println!(
                        "question {} row {} [{}]: {}",
                        report.question,
                        group.group,
                        label(message.severity),
                        message.text
                    );
                }
            }
        }
        for message in &validation.verdict.messages {
            println!("error: {}", message.text);
        }
        if validation.is_valid() {
            println!("ok: answers can be submitted");
        }
    }

    if !validation.is_valid() {
        bail!(
            "submission blocked by {} message(s)",
            validation.verdict.messages.len()
        );
    }
    Ok(())
}

fn label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
    }
}
