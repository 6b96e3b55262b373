use thiserror::Error;

/// Why a single weather fetch did not produce a record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to weather API failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode weather API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather API response contained no weather condition")]
    MissingCondition,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("nope"), "nope");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "가".repeat(100);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
