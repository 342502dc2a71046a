use futures::{stream, StreamExt};
use std::time::Duration;
use tokio::time;
use tracing::warn;

use crate::{
    configuration::{AppState, State},
    error::Error,
    provider::HTTP,
    types::{HolderStats, Token, TrendingEntry, Trends},
};

/// Timeframe key used for gainer/loser classification.
const CHANGE_WINDOW: &str = "24h";

/// Each ranked list is cut to this many entries.
const TOP_MOVERS: usize = 15;

/// Fetches the trending listing, enriches every token with holder stats and
/// ranks the result into gainer/loser lists.
///
/// The per-token fetches run through a bounded concurrent stream with a
/// per-request timeout; a failed or timed-out fetch drops that token only
/// and the batch still succeeds.
pub async fn trending_holder_changes(
    state: &AppState<State>,
) -> Result<Trends, Error> {
    let tokens = state.http.trending(None).await?;

    let width = state.config.trends_max_concurrency.max(1);
    let per_request =
        Duration::from_secs(state.config.trends_request_timeout);
    let http = &state.http;

    let entries = stream::iter(tokens)
        .map(|token| async move {
            let stats = fetch_stats(http, &token, per_request).await?;
            Some(TrendingEntry {
                token,
                holderStats: stats,
            })
        })
        .buffer_unordered(width)
        .collect::<Vec<Option<TrendingEntry>>>()
        .await;

    Ok(rank(entries.into_iter().flatten().collect()))
}

async fn fetch_stats(
    http: &HTTP,
    token: &Token,
    per_request: Duration,
) -> Option<HolderStats> {
    let fetch = http.holder_stats(&token.chainId, &token.tokenAddress);

    match time::timeout(per_request, fetch).await {
        Ok(Ok(stats)) => Some(stats),
        Ok(Err(e)) => {
            warn!(
                "holder stats failed for {} on {}: {}",
                token.tokenAddress, token.chainId, e
            );
            None
        },
        Err(_) => {
            warn!(
                "holder stats timed out for {} on {}",
                token.tokenAddress, token.chainId
            );
            None
        },
    }
}

/// Splits entries into gainers and losers by the sign of the 24h holder
/// change, sorts by percent (gainers descending, losers most-negative
/// first) and truncates each list. Entries without a 24h window and
/// entries with a zero change are excluded from both lists.
pub fn rank(entries: Vec<TrendingEntry>) -> Trends {
    let mut gainers = vec![];
    let mut losers = vec![];

    for entry in entries {
        let change = entry
            .holderStats
            .holderChange
            .get(CHANGE_WINDOW)
            .map(|window| window.change);

        match change {
            Some(change) if change > 0 => gainers.push(entry),
            Some(change) if change < 0 => losers.push(entry),
            _ => {},
        }
    }

    gainers.sort_by(|a, b| change_percent(b).total_cmp(&change_percent(a)));
    losers.sort_by(|a, b| change_percent(a).total_cmp(&change_percent(b)));

    gainers.truncate(TOP_MOVERS);
    losers.truncate(TOP_MOVERS);

    Trends { gainers, losers }
}

fn change_percent(entry: &TrendingEntry) -> f64 {
    entry
        .holderStats
        .holderChange
        .get(CHANGE_WINDOW)
        .map(|window| window.changePercent)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::Config,
        types::HolderChange,
    };
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::{json, Map};
    use std::collections::HashMap;
    use std::net::TcpListener;

    fn entry(address: &str, change: i64, percent: f64) -> TrendingEntry {
        let mut holderChange = HashMap::new();
        holderChange.insert(
            CHANGE_WINDOW.to_owned(),
            HolderChange {
                change,
                changePercent: percent,
            },
        );

        TrendingEntry {
            token: Token {
                chainId: "eth".to_owned(),
                tokenAddress: address.to_owned(),
                name: None,
                symbol: None,
                logo: None,
                usdPrice: None,
                marketCap: None,
                extra: Map::new(),
            },
            holderStats: HolderStats {
                totalHolders: 100,
                holderChange,
                extra: Map::new(),
            },
        }
    }

    fn entry_without_window(address: &str) -> TrendingEntry {
        let mut e = entry(address, 1, 1.0);
        e.holderStats.holderChange.clear();
        e
    }

    fn percents(entries: &[TrendingEntry]) -> Vec<f64> {
        entries.iter().map(change_percent).collect()
    }

    #[test]
    fn gainers_sorted_descending_by_percent() {
        let trends = rank(vec![
            entry("a", 10, 12.5),
            entry("b", 3, 3.2),
            entry("c", 90, 44.0),
            entry("d", 1, 1.0),
            entry("e", 7, 7.7),
        ]);

        assert_eq!(percents(&trends.gainers), vec![44.0, 12.5, 7.7, 3.2, 1.0]);
        assert!(trends.losers.is_empty());
    }

    #[test]
    fn losers_sorted_most_negative_first() {
        let trends = rank(vec![
            entry("a", -2, -1.5),
            entry("b", -40, -22.0),
            entry("c", -9, -8.4),
        ]);

        assert_eq!(percents(&trends.losers), vec![-22.0, -8.4, -1.5]);
        assert!(trends.gainers.is_empty());
    }

    #[test]
    fn zero_change_is_in_neither_list() {
        let trends = rank(vec![
            entry("a", 0, 0.0),
            entry("b", 5, 2.0),
            entry("c", -5, -2.0),
        ]);

        assert_eq!(trends.gainers.len(), 1);
        assert_eq!(trends.losers.len(), 1);
        assert_eq!(trends.gainers[0].token.tokenAddress, "b");
        assert_eq!(trends.losers[0].token.tokenAddress, "c");
    }

    #[test]
    fn entries_without_24h_window_are_dropped() {
        let trends = rank(vec![
            entry_without_window("a"),
            entry("b", 5, 2.0),
        ]);

        assert_eq!(trends.gainers.len(), 1);
        assert!(trends.losers.is_empty());
    }

    #[test]
    fn lists_are_truncated_to_top_15() {
        let mut entries = vec![];
        for i in 0..40_i64 {
            entries.push(entry(&format!("g{}", i), 1 + i, i as f64));
            entries.push(entry(&format!("l{}", i), -1 - i, -(i as f64) - 1.0));
        }

        let trends = rank(entries);

        assert_eq!(trends.gainers.len(), TOP_MOVERS);
        assert_eq!(trends.losers.len(), TOP_MOVERS);
        assert_eq!(change_percent(&trends.gainers[0]), 39.0);
        assert_eq!(change_percent(&trends.losers[0]), -40.0);
    }

    // Canned upstream for the fan-out path: six trending tokens, of which
    // one gets a 500 and one stalls past the per-request timeout.

    async fn canned_trending() -> HttpResponse {
        HttpResponse::Ok().json(json!([
            {"chainId": "eth", "tokenAddress": "0xbig"},
            {"chainId": "eth", "tokenAddress": "0xsmall"},
            {"chainId": "eth", "tokenAddress": "0xdown"},
            {"chainId": "eth", "tokenAddress": "0xflat"},
            {"chainId": "eth", "tokenAddress": "0xbroken"},
            {"chainId": "eth", "tokenAddress": "0xstuck"},
        ]))
    }

    async fn canned_holder_stats(path: web::Path<String>) -> HttpResponse {
        let address = path.into_inner();
        let stats = |change: i64, percent: f64| {
            json!({
                "totalHolders": 1000,
                "holderChange": {
                    "24h": {"change": change, "changePercent": percent}
                }
            })
        };

        match address.as_str() {
            "0xbig" => HttpResponse::Ok().json(stats(90, 44.0)),
            "0xsmall" => HttpResponse::Ok().json(stats(1, 1.0)),
            "0xdown" => HttpResponse::Ok().json(stats(-9, -8.4)),
            "0xflat" => HttpResponse::Ok().json(stats(0, 0.0)),
            "0xstuck" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                HttpResponse::Ok().json(stats(50, 20.0))
            },
            _ => HttpResponse::InternalServerError()
                .json(json!({"message": "holder stats unavailable"})),
        }
    }

    fn spawn_upstream() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(|| {
            App::new()
                .route("/tokens/trending", web::get().to(canned_trending))
                .route(
                    "/erc20/{address}/holders",
                    web::get().to(canned_holder_stats),
                )
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .disable_signals()
        .run();

        tokio::spawn(server);

        port
    }

    fn upstream_state(port: u16) -> AppState<State> {
        let config = Config {
            api_key: "test-key".to_owned(),
            evm_api_url: format!("http://127.0.0.1:{}", port),
            solana_api_url: format!("http://127.0.0.1:{}", port),
            timeout: 5,
            trends_max_concurrency: 4,
            trends_request_timeout: 1,
            server_host: "127.0.0.1".to_owned(),
            port: 0,
            allowed_origins: vec!["*".to_owned()],
            static_dir: env!("CARGO_MANIFEST_DIR").to_owned(),
        };
        let http = crate::provider::HTTP::new(config.clone()).unwrap();
        AppState::new(State::new(config, http))
    }

    #[actix_web::test]
    async fn failed_fetches_drop_their_token_only() {
        let port = spawn_upstream();
        let state = upstream_state(port);

        let trends = trending_holder_changes(&state).await.unwrap();

        let gainers: Vec<&str> = trends
            .gainers
            .iter()
            .map(|e| e.token.tokenAddress.as_str())
            .collect();
        let losers: Vec<&str> = trends
            .losers
            .iter()
            .map(|e| e.token.tokenAddress.as_str())
            .collect();

        // the 500 and the stalled fetch drop those tokens, nothing else
        assert_eq!(gainers, vec!["0xbig", "0xsmall"]);
        assert_eq!(losers, vec!["0xdown"]);

        // 6 fetched, 2 failed: classified entries stay within N - K
        assert!(trends.gainers.len() + trends.losers.len() <= 4);

        for entry in trends.gainers.iter().chain(trends.losers.iter()) {
            assert_ne!(entry.token.tokenAddress, "0xbroken");
            assert_ne!(entry.token.tokenAddress, "0xstuck");
        }
    }
}
