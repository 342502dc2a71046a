use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use serde_json::Value;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/token/evm/metadata")]
async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, Error> {
    let (chain, addresses) = normalize(query.into_inner());

    let chain =
        chain.ok_or_else(|| Error::MissingParameter("chain".to_owned()))?;
    if addresses.is_empty() {
        return Err(Error::MissingParameter("address".to_owned()));
    }

    let data = state.http.evm_metadata(&chain, &addresses).await?;

    Ok(web::Json(Response {
        success: true,
        data,
    }))
}

/// Collects the chain and the token addresses from the raw query pairs.
/// Accepts the singular `address` key, the plural `addresses` key and its
/// repeated-bracket forms (`addresses[]`, `addresses[0]`, ...).
pub fn normalize(
    pairs: Vec<(String, String)>,
) -> (Option<String>, Vec<String>) {
    let mut chain = None;
    let mut addresses = vec![];

    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "chain" => chain = Some(value),
            "address" => addresses.push(value),
            key if key == "addresses"
                || (key.starts_with("addresses[") && key.ends_with(']')) =>
            {
                addresses.push(value)
            },
            _ => {},
        }
    }

    (chain, addresses)
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub success: bool,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn singular_address_is_collected() {
        let (chain, addresses) =
            normalize(pairs(&[("chain", "eth"), ("address", "0xAbC")]));

        assert_eq!(chain.as_deref(), Some("eth"));
        assert_eq!(addresses, vec!["0xAbC"]);
    }

    #[test]
    fn bracketed_addresses_are_collected_with_singular() {
        let (chain, addresses) = normalize(pairs(&[
            ("chain", "polygon"),
            ("address", "0x1"),
            ("addresses[0]", "0x2"),
            ("addresses[1]", "0x3"),
            ("addresses[]", "0x4"),
        ]));

        assert_eq!(chain.as_deref(), Some("polygon"));
        assert_eq!(addresses, vec!["0x1", "0x2", "0x3", "0x4"]);
    }

    #[test]
    fn unknown_and_empty_values_are_ignored() {
        let (chain, addresses) = normalize(pairs(&[
            ("chain", "eth"),
            ("address", ""),
            ("limit", "5"),
        ]));

        assert_eq!(chain.as_deref(), Some("eth"));
        assert!(addresses.is_empty());
    }

    #[test]
    fn missing_chain_stays_none() {
        let (chain, addresses) = normalize(pairs(&[("address", "0x1")]));

        assert!(chain.is_none());
        assert_eq!(addresses.len(), 1);
    }
}
