use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::{
    configuration::Config,
    error::{self, Error},
    types::{HolderHistory, HolderStats, Token},
};

/// Chain discriminator for the Solana gateway; anything else is treated as
/// an EVM chain identifier and passed through as the `chain` query param.
pub const SOLANA_CHAIN: &str = "solana";

#[derive(Debug)]
pub struct HTTP {
    config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = match Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(error::Error::REQWEST(e));
            },
        };

        Ok(HTTP { config, http })
    }

    pub async fn search_tokens(&self, query: &str) -> Result<Value, Error> {
        let url = self.config.evm_url("/tokens/search");
        self.get(&url, &[("query".to_owned(), query.to_owned())])
            .await
    }

    pub async fn trending(
        &self,
        chain: Option<&str>,
    ) -> Result<Vec<Token>, Error> {
        let url = self.config.evm_url("/tokens/trending");
        let mut params = vec![];

        if let Some(chain) = chain {
            params.push(("chain".to_owned(), chain.to_owned()));
        }

        self.get(&url, &params).await
    }

    pub async fn holder_stats(
        &self,
        chain: &str,
        address: &str,
    ) -> Result<HolderStats, Error> {
        if chain == SOLANA_CHAIN {
            let url = self
                .config
                .solana_url(&format!("/token/mainnet/holders/{}", address));
            return self.get(&url, &[]).await;
        }

        let url = self
            .config
            .evm_url(&format!("/erc20/{}/holders", address));
        self.get(&url, &[("chain".to_owned(), chain.to_owned())])
            .await
    }

    pub async fn holder_history(
        &self,
        chain: &str,
        address: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        time_frame: &str,
    ) -> Result<HolderHistory, Error> {
        let mut params = vec![
            ("fromDate".to_owned(), from.to_rfc3339()),
            ("toDate".to_owned(), to.to_rfc3339()),
            ("timeFrame".to_owned(), time_frame.to_owned()),
        ];

        if chain == SOLANA_CHAIN {
            let url = self.config.solana_url(&format!(
                "/token/mainnet/holders/{}/historical",
                address
            ));
            return self.get(&url, &params).await;
        }

        params.push(("chain".to_owned(), chain.to_owned()));
        let url = self
            .config
            .evm_url(&format!("/erc20/{}/holders/historical", address));
        self.get(&url, &params).await
    }

    pub async fn evm_metadata(
        &self,
        chain: &str,
        addresses: &[String],
    ) -> Result<Value, Error> {
        let url = self.config.evm_url("/erc20/metadata");
        let mut params = vec![("chain".to_owned(), chain.to_owned())];

        // Moralis expects repeated-bracket encoding: addresses[0]=..&addresses[1]=..
        for (index, address) in addresses.iter().enumerate() {
            params.push((format!("addresses[{}]", index), address.to_owned()));
        }

        self.get(&url, &params).await
    }

    pub async fn solana_metadata(
        &self,
        token_address: &str,
    ) -> Result<Value, Error> {
        let url = self
            .config
            .solana_url(&format!("/token/mainnet/{}/metadata", token_address));
        self.get(&url, &[]).await
    }

    pub async fn token_owners(
        &self,
        chain: &str,
        address: &str,
        order: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Value, Error> {
        let url = self.config.evm_url(&format!("/erc20/{}/owners", address));
        let mut params = vec![
            ("chain".to_owned(), chain.to_owned()),
            ("order".to_owned(), order.to_owned()),
            ("limit".to_owned(), limit.to_string()),
        ];

        if let Some(cursor) = cursor {
            params.push(("cursor".to_owned(), cursor.to_owned()));
        }

        self.get(&url, &params).await
    }

    /// Issues an authenticated GET and decodes the body. The API key travels
    /// in a header only and is never part of the logged URL.
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        info!("{}", url);

        let response = self
            .http
            .get(url)
            .query(params)
            .header("X-API-Key", &self.config.api_key)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let json = response.json::<T>().await?;
        Ok(json)
    }
}
