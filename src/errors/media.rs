use std::cmp::Ordering;
use std::fmt;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";

/// Serializations supported for [`super::ErrorRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Xml,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => APPLICATION_JSON,
            Self::Xml => APPLICATION_XML,
        }
    }

    /// Short label used for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Match a `Content-Type` value byte-for-byte.
    ///
    /// No parameter stripping and no case folding: `application/json; charset=utf-8`
    /// and `Application/JSON` are both rejected.
    pub fn from_exact(content_type: &str) -> Option<Self> {
        match content_type {
            APPLICATION_JSON => Some(Self::Json),
            APPLICATION_XML => Some(Self::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the response media type for an `Accept` header.
///
/// Ranges are weighed by their `q` parameter (ties keep header order, `q=0` is
/// ignored). Wildcards and a missing or unmatched header resolve to JSON.
pub fn negotiate(accept: Option<&str>) -> MediaType {
    let Some(accept) = accept else {
        return MediaType::Json;
    };

    let mut candidates: Vec<(f32, MediaType)> = accept
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let range = parts.next()?.trim().to_ascii_lowercase();
            let quality = parts
                .filter_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    if key.trim().eq_ignore_ascii_case("q") {
                        value.trim().parse::<f32>().ok()
                    } else {
                        None
                    }
                })
                .next()
                .unwrap_or(1.0);

            if quality <= 0.0 {
                return None;
            }

            let media = match range.as_str() {
                "application/json" | "application/*" | "*/*" => MediaType::Json,
                "application/xml" | "text/xml" => MediaType::Xml,
                _ => return None,
            };
            Some((quality, media))
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    candidates
        .first()
        .map(|(_, media)| *media)
        .unwrap_or(MediaType::Json)
}
