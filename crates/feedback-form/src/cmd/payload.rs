use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use form_engine::{
    FeedbackForm, FixedSession, FormMode, RecordingSink, SubmissionCollaborator,
    SubmissionPayload, SubmissionReceipt, SubmitOutcome, TransportError,
};
use tracing::info;

use super::load_form;

#[derive(Args, Debug, Clone)]
pub struct PayloadArgs {
    /// Form definition (.json or .toml)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
    /// Answer file (.json)
    #[arg(value_name = "ANSWERS")]
    pub answers: PathBuf,
}

/// Keeps the payload instead of sending it anywhere.
#[derive(Debug, Default)]
struct CapturedPayload {
    payload: Option<SubmissionPayload>,
}

impl SubmissionCollaborator for CapturedPayload {
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, TransportError> {
        self.payload = Some(payload.clone());
        Ok(SubmissionReceipt {
            status: "Payload captured".to_string(),
            ..Default::default()
        })
    }
}

pub fn run(args: &PayloadArgs) -> Result<()> {
    let loaded = load_form(&args.form, Some(&args.answers))?;
    let mut form = FeedbackForm::new(loaded.registry, loaded.store, FormMode::default());
    let mut sink = RecordingSink::new();
    form.initialize(&FixedSession::open(), &mut sink);

    let mut capture = CapturedPayload::default();
    match form.submit(&mut capture, &mut sink) {
        SubmitOutcome::Submitted { .. } => {}
        SubmitOutcome::Blocked(verdict) => {
            for message in &verdict.messages {
                eprintln!("error: {}", message.text);
            }
            bail!("answers cannot be submitted");
        }
        SubmitOutcome::TransportFailed(err) => return Err(err.into()),
    }

    let Some(payload) = capture.payload else {
        bail!("no payload was produced");
    };
    info!(fields = payload.len(), "payload built");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
