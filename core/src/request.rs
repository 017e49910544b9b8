use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The slice of an API Gateway proxy event the pipeline reads.
///
/// Both the parameter bag and individual values may be `null` on the wire;
/// every other field of the event is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiRequest {
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<HashMap<String, Option<String>>>,
}

impl ApiRequest {
    /// A request with no parameter bag at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_query<K, V, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query_string_parameters: Some(
                params
                    .into_iter()
                    .map(|(k, v)| (k.into(), Some(v.into())))
                    .collect(),
            ),
        }
    }

    pub fn query_param(&self, key: &str) -> Option<&Option<String>> {
        self.query_string_parameters.as_ref()?.get(key)
    }
}
