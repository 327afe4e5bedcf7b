//! Ordered probe strategies and the plan that runs them.
//!
//! # Design
//! Each strategy owns two things: the request it sends and the rejection
//! reason reported when that request fails at the transport level. The plan
//! walks the strategies in order and moves on only while it has no usable
//! response (status below 400). This keeps the fallback policy declarative
//! and testable with a scripted transport.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::ProbeTransport;

/// Status at or above which a response triggers the next strategy.
const FALLBACK_STATUS: u16 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStrategy {
    /// `HEAD`: headers only, no body transfer.
    MetadataOnly,
    /// `GET` with `Range: bytes=0-0`, for servers that refuse `HEAD`.
    FirstByte,
}

impl ProbeStrategy {
    pub fn build_request(self, url: &Url) -> HttpRequest {
        match self {
            ProbeStrategy::MetadataOnly => HttpRequest {
                method: HttpMethod::Head,
                url: url.to_string(),
                headers: Vec::new(),
            },
            ProbeStrategy::FirstByte => HttpRequest {
                method: HttpMethod::Get,
                url: url.to_string(),
                headers: vec![("range".to_string(), "bytes=0-0".to_string())],
            },
        }
    }

    pub fn failure_reason(self) -> &'static str {
        match self {
            ProbeStrategy::MetadataOnly => "Could not reach the URL.",
            ProbeStrategy::FirstByte => "Could not fetch the URL.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("probe plan needs at least one strategy")]
    Empty,
}

/// What a plan ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The response to classify, with the strategy that produced it.
    Response {
        strategy: ProbeStrategy,
        response: HttpResponse,
    },
    /// A transport failure that ended the plan.
    Failed {
        strategy: ProbeStrategy,
        error: TransportError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    strategies: Vec<ProbeStrategy>,
    fallback_on_error: bool,
}

/// `HEAD`, then the ranged `GET`, with fallback on transport errors.
///
/// Under this plan an unreachable target always reports the `GET` reason,
/// "Could not fetch the URL.".
impl Default for ProbePlan {
    fn default() -> Self {
        Self {
            strategies: vec![ProbeStrategy::MetadataOnly, ProbeStrategy::FirstByte],
            fallback_on_error: true,
        }
    }
}

impl ProbePlan {
    /// `fallback_on_error` decides whether a transport failure counts as
    /// "no response" (the next strategy runs) or ends the plan immediately.
    ///
    /// A failed plan reports the reason of the strategy that failed last. With
    /// fallback on and `FirstByte` listed last, "Could not reach the URL." is
    /// therefore never returned; it only shows up when fallback is off and
    /// `HEAD` fails, or when `MetadataOnly` is the last strategy.
    pub fn new(strategies: Vec<ProbeStrategy>, fallback_on_error: bool) -> Result<Self, PlanError> {
        if strategies.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(Self {
            strategies,
            fallback_on_error,
        })
    }

    pub fn strategies(&self) -> &[ProbeStrategy] {
        &self.strategies
    }

    pub async fn run<T>(&self, url: &Url, transport: &T) -> ProbeOutcome
    where
        T: ProbeTransport + ?Sized,
    {
        let mut outcome: Option<ProbeOutcome> = None;

        for (i, &strategy) in self.strategies.iter().enumerate() {
            if let Some(ProbeOutcome::Response { response, .. }) = &outcome {
                if response.status < FALLBACK_STATUS {
                    break;
                }
            }

            let request = strategy.build_request(url);
            match transport.execute(&request).await {
                Ok(response) => {
                    debug!(%url, ?strategy, status = response.status, "probe answered");
                    outcome = Some(ProbeOutcome::Response { strategy, response });
                }
                Err(error) => {
                    debug!(%url, ?strategy, %error, "probe failed");
                    let last = i + 1 == self.strategies.len();
                    let failed = ProbeOutcome::Failed { strategy, error };
                    if last || !self.fallback_on_error {
                        return failed;
                    }
                    outcome = Some(failed);
                }
            }
        }

        // Plans are never empty, so at least one strategy has run.
        outcome.unwrap_or_else(|| ProbeOutcome::Failed {
            strategy: ProbeStrategy::MetadataOnly,
            error: TransportError::Other("no probe strategy ran".to_string()),
        })
    }
}
