// src/relay/candidates.rs
// Candidate model ordering: override, then preferred, then whatever else is available

/// Hand-maintained preference order, most wanted first
pub const PREFERRED_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.0-pro-latest",
    "gemini-1.0-pro",
    "gemini-pro",
];

pub fn default_preferred() -> Vec<String> {
    PREFERRED_MODELS.iter().map(|m| m.to_string()).collect()
}

/// Build the ordered try list.
///
/// `available` is the discovered set. When it is empty, discovery gave us
/// nothing to filter with and the preferred list is used as-is.
/// Duplicates keep their first position.
pub fn build_candidates(
    model_override: Option<&str>,
    preferred: &[String],
    available: &[String],
) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(1 + preferred.len() + available.len());
    let mut push = |id: &str| {
        if !ordered.iter().any(|existing| existing == id) {
            ordered.push(id.to_string());
        }
    };

    if let Some(id) = model_override.map(str::trim).filter(|id| !id.is_empty()) {
        push(id);
    }

    if available.is_empty() {
        preferred.iter().for_each(|id| push(id.as_str()));
    } else {
        preferred
            .iter()
            .filter(|id| available.contains(*id))
            .for_each(|id| push(id.as_str()));
        available.iter().for_each(|id| push(id.as_str()));
    }

    ordered
}
