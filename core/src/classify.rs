//! Turn a probe response into a verdict.

use url::Url;

use crate::http::HttpResponse;
use crate::types::{DirectFile, Verdict};

pub const HTML_REASON: &str = "This looks like HTML, not a direct file.";

/// Classify the response that ended the probe plan.
///
/// The HTML check runs before the status check, so an HTML error page is
/// reported as HTML rather than by its status.
pub fn classify(target: &Url, response: &HttpResponse) -> Verdict {
    let content_type = response.header("content-type").unwrap_or_default();
    let content_length = response.header("content-length").unwrap_or_default();

    if content_type.to_ascii_lowercase().contains("text/html") {
        return Verdict::rejected(HTML_REASON);
    }

    if response.is_success() {
        return Verdict::Direct(DirectFile {
            direct_url: target.to_string(),
            content_type,
            content_length,
        });
    }

    Verdict::rejected(format!("Upstream status {}", response.status))
}
