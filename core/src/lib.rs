//! Direct-link validation pipeline.
//!
//! # Overview
//! Decides whether a URL points at a directly fetchable, non-HTML resource.
//! The pipeline excludes known platforms, validates the URL, probes the
//! target through a caller-supplied transport (host-does-IO pattern) and
//! classifies the final response into a [`Verdict`].
//!
//! # Design
//! - `Validator` is stateless; it holds only the exclusion list and the
//!   probe plan, both immutable after construction.
//! - Malformed input is a [`ClientError`]. Everything that can go wrong with
//!   the target itself is a rejected `Verdict`.
//! - Probes are plain `HttpRequest` / `HttpResponse` data; the crate never
//!   opens a socket.

pub mod classify;
pub mod error;
pub mod exclusion;
pub mod http;
pub mod probe;
pub mod transport;
pub mod types;
pub mod validator;

pub use error::{ClientError, TransportError};
pub use exclusion::{ExclusionList, ExclusionRule};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use probe::{PlanError, ProbeOutcome, ProbePlan, ProbeStrategy};
pub use transport::ProbeTransport;
pub use types::{CheckRequest, DirectFile, Verdict};
pub use validator::Validator;
