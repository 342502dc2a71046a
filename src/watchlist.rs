use std::{fs, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::Error, types::Token};

pub const WATCHLIST_VERSION: u32 = 1;

/// On-disk payload. Pre-versioning installs persisted a bare token array;
/// `load` still accepts that shape and rewrites it versioned.
#[derive(Debug, Serialize, Deserialize)]
struct Persisted {
    version: u32,
    tokens: Vec<Token>,
}

/// The dashboard watchlist: an ordered set of tokens, unique by the
/// composite `(chainId, tokenAddress)` key with the address compared
/// case-insensitively. Every mutation is written back to disk.
#[derive(Debug)]
pub struct Watchlist {
    path: PathBuf,
    tokens: Vec<Token>,
}

impl Watchlist {
    pub fn load(path: impl Into<PathBuf>) -> Result<Watchlist, Error> {
        let path = path.into();

        if !path.exists() {
            return Ok(Watchlist {
                path,
                tokens: vec![],
            });
        }

        let raw = fs::read_to_string(&path)?;
        let (tokens, legacy) = match serde_json::from_str::<Persisted>(&raw) {
            Ok(persisted) => (persisted.tokens, false),
            Err(_) => {
                let tokens = serde_json::from_str::<Vec<Token>>(&raw)
                    .context("could not parse persisted watchlist")?;
                (tokens, true)
            },
        };

        let watchlist = Watchlist { path, tokens };

        if legacy {
            watchlist.save()?;
        }

        Ok(watchlist)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Appends and persists. A token without an address is refused and a
    /// duplicate key is a silent no-op, so repeated adds are idempotent.
    pub fn add_token(&mut self, token: Token) -> Result<bool, Error> {
        if token.tokenAddress.is_empty() {
            warn!("refusing to watch a token without an address");
            return Ok(false);
        }

        if self.contains(&token.chainId, &token.tokenAddress) {
            return Ok(false);
        }

        self.tokens.push(token);
        self.save()?;

        Ok(true)
    }

    /// Removes by composite key; an absent key leaves the list (and the
    /// file) untouched.
    pub fn remove_token(
        &mut self,
        chain_id: &str,
        address: &str,
    ) -> Result<bool, Error> {
        let before = self.tokens.len();
        self.tokens
            .retain(|token| !same_token(token, chain_id, address));

        if self.tokens.len() == before {
            return Ok(false);
        }

        self.save()?;

        Ok(true)
    }

    /// Removes the token if it is watched, adds it otherwise. Returns
    /// whether the token is watched afterwards.
    pub fn toggle_favorite(&mut self, token: Token) -> Result<bool, Error> {
        if self.contains(&token.chainId, &token.tokenAddress) {
            self.remove_token(&token.chainId, &token.tokenAddress)?;
            return Ok(false);
        }

        self.add_token(token)
    }

    pub fn contains(&self, chain_id: &str, address: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| same_token(token, chain_id, address))
    }

    fn save(&self) -> Result<(), Error> {
        let persisted = Persisted {
            version: WATCHLIST_VERSION,
            tokens: self.tokens.clone(),
        };
        let raw = serde_json::to_string(&persisted)?;
        fs::write(&self.path, raw)?;

        Ok(())
    }
}

fn same_token(token: &Token, chain_id: &str, address: &str) -> bool {
    token.chainId == chain_id
        && token.tokenAddress.eq_ignore_ascii_case(address)
}
