//! Query parameter assembly.

use std::collections::BTreeMap;

/// Builder for request query parameters.
///
/// Keys are unique; setting a key twice keeps the last value. Iteration
/// order is sorted by key, so built URLs are deterministic.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    params: BTreeMap<String, String>,
}

impl RequestParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single parameter.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merges a batch of parameters.
    #[must_use]
    pub fn set_all(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Consumes the builder, yielding the merged parameter map.
    #[must_use]
    pub fn build(self) -> BTreeMap<String, String> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_set_wins() {
        let params = RequestParams::new()
            .set("page", "1")
            .set("page", "2")
            .build();
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn set_all_merges_over_existing() {
        let params = RequestParams::new()
            .set("order_by", "latest")
            .set_all([
                ("order_by".to_string(), "popular".to_string()),
                ("per_page".to_string(), "30".to_string()),
            ])
            .build();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("order_by").map(String::as_str), Some("popular"));
        assert_eq!(params.get("per_page").map(String::as_str), Some("30"));
    }
}
