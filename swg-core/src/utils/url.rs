//! URL helpers

use url::Url;

use crate::error::{CoreError, CoreResult};

fn parse(url: &str) -> CoreResult<Url> {
    Url::parse(url).map_err(|e| CoreError::InvalidUrl(format!("{url}: {e}")))
}

/// Whether the query string of `url` contains `name`.
pub fn has_query_param(url: &str, name: &str) -> CoreResult<bool> {
    Ok(parse(url)?.query_pairs().any(|(key, _)| key == name))
}

/// Append `name=value` to the query string of `url`.
pub fn add_query_param(url: &str, name: &str, value: &str) -> CoreResult<String> {
    let mut parsed = parse(url)?;
    parsed.query_pairs_mut().append_pair(name, value);
    Ok(parsed.into())
}

/// Serialized origin of `url` (`scheme://host[:port]`), or `None` for
/// opaque origins and unparseable input.
pub fn origin_of(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}
