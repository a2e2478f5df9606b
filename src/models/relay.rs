use serde::Serialize;

use crate::models::push::DispatchReport;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessedEmail {
    pub uid: Option<u32>,
    pub notification_id: String,
    pub dispatch: DispatchReport,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RunReport {
    pub processed: Vec<ProcessedEmail>,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoNewEmails,
    Processed(RunReport),
}

impl RunOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::NoNewEmails => "No new emails",
            RunOutcome::Processed(_) => "Emails processed",
        }
    }

    pub fn into_report(self) -> RunReport {
        match self {
            RunOutcome::NoNewEmails => RunReport::default(),
            RunOutcome::Processed(report) => report,
        }
    }
}
