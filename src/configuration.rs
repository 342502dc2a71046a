use std::{env, fs, ops::Deref, sync::Arc};

use crate::{error::Error, provider::HTTP};

pub const DEFAULT_EVM_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";
pub const DEFAULT_SOLANA_API_URL: &str = "https://solana-gateway.moralis.io";

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub http: HTTP,
}

impl State {
    pub fn new(config: Config, http: HTTP) -> State {
        State { config, http }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub evm_api_url: String,
    pub solana_api_url: String,
    pub timeout: u64,
    pub trends_max_concurrency: usize,
    pub trends_request_timeout: u64,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
}

impl Config {
    pub fn evm_url(&self, path: &str) -> String {
        format!("{}{}", self.evm_api_url, path)
    }

    pub fn solana_url(&self, path: &str) -> String {
        format!("{}{}", self.solana_api_url, path)
    }
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string)?;

    Ok(())
}

pub fn get_configuration() -> Result<Config, Error> {
    let api_key = env::var("MORALIS_API_KEY")?;
    let timeout = env::var("TIMEOUT")?.parse()?;
    let trends_max_concurrency = env::var("TRENDS_MAX_CONCURRENCY")?.parse()?;
    let trends_request_timeout = env::var("TRENDS_REQUEST_TIMEOUT")?.parse()?;

    let evm_api_url = env::var("EVM_API_URL")
        .unwrap_or_else(|_| DEFAULT_EVM_API_URL.to_owned());
    let solana_api_url = env::var("SOLANA_API_URL")
        .unwrap_or_else(|_| DEFAULT_SOLANA_API_URL.to_owned());

    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );

    let config = Config {
        api_key,
        evm_api_url,
        solana_api_url,
        timeout,
        trends_max_concurrency,
        trends_request_timeout,
        server_host,
        port,
        allowed_origins,
        static_dir,
    };

    Ok(config)
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        env::set_var(key, value);
    }

    Ok(())
}
