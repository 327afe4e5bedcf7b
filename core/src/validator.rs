//! The validation pipeline.
//!
//! # Design
//! `Validator` holds only immutable policy (the exclusion list and the probe
//! plan) and carries no state between calls, so one instance is shared by
//! every request. Network access goes through the caller's
//! [`ProbeTransport`], keeping the pipeline deterministic under test.
//!
//! The exclusion check runs on the raw candidate before URL validation and
//! swallows parse errors; URL validation then surfaces them. A malformed
//! string is therefore never excluded and always reported as `Invalid URL`.

use tracing::{debug, info};
use url::Url;

use crate::classify::classify;
use crate::error::ClientError;
use crate::exclusion::ExclusionList;
use crate::probe::{ProbeOutcome, ProbePlan};
use crate::transport::ProbeTransport;
use crate::types::{CheckRequest, Verdict};

#[derive(Debug, Clone, Default)]
pub struct Validator {
    exclusions: ExclusionList,
    plan: ProbePlan,
}

impl Validator {
    pub fn new(exclusions: ExclusionList, plan: ProbePlan) -> Self {
        Self { exclusions, plan }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn plan(&self) -> &ProbePlan {
        &self.plan
    }

    /// Parse a raw request body and validate the URL it names.
    pub async fn check<T>(&self, body: &[u8], transport: &T) -> Result<Verdict, ClientError>
    where
        T: ProbeTransport + ?Sized,
    {
        let request = CheckRequest::from_json(body)?;
        self.validate(&request.url, transport).await
    }

    /// Run the pipeline for one candidate URL.
    ///
    /// Only malformed input yields `Err`. Every other outcome, including an
    /// unreachable target, is a `Verdict`.
    pub async fn validate<T>(&self, candidate: &str, transport: &T) -> Result<Verdict, ClientError>
    where
        T: ProbeTransport + ?Sized,
    {
        if let Some(rule) = self.exclusions.matching_rule(candidate) {
            info!(candidate, platform = %rule.platform, "excluded platform");
            return Ok(Verdict::rejected(rule.rejection_reason()));
        }

        let target = Url::parse(candidate).map_err(|e| {
            debug!(candidate, error = %e, "candidate is not an absolute URL");
            ClientError::InvalidUrl
        })?;

        match self.plan.run(&target, transport).await {
            ProbeOutcome::Response { strategy, response } => {
                let verdict = classify(&target, &response);
                info!(
                    %target,
                    final_url = %response.url,
                    status = response.status,
                    ?strategy,
                    ok = verdict.is_ok(),
                    "validated"
                );
                Ok(verdict)
            }
            ProbeOutcome::Failed { strategy, error } => {
                info!(%target, ?strategy, %error, ok = false, "validated");
                Ok(Verdict::rejected(strategy.failure_reason()))
            }
        }
    }
}
