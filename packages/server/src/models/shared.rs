use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Envelope<T> {
    /// Human-readable outcome.
    #[schema(example = "Categories retrieved successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of items in `data`, present on list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 4)]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            count: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(message: impl Into<String>, items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            message: message.into(),
            data: Some(items),
            count: Some(count),
        }
    }
}

/// Envelope for operations that return no data.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Canonical form of a category name: surrounding whitespace trimmed, inner
/// runs collapsed to one space, lowercased, and each word capitalised.
///
/// A letter is capitalised when it follows anything other than a letter,
/// digit or underscore, so "visual-motion" becomes "Visual-Motion".
pub fn normalize_category_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut at_boundary = true;

    for c in collapsed.chars().flat_map(char::to_lowercase) {
        if at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !(c.is_alphanumeric() || c == '_');
    }

    out
}
