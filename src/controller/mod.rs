pub mod evm_metadata;
pub mod health;
pub mod holders;
pub mod holders_historical;
pub mod search;
pub mod solana_metadata;
pub mod token_owners;
pub mod trending_tokens;
pub mod trends;
