use crossbeam_channel::Sender;
use listings::{parse_records, FetchError, ListingRecord};
use std::thread;

pub type FetchResult = Result<Vec<ListingRecord>, FetchError>;

/// Fetches the listing set once on a background thread and posts the
/// outcome to the render thread. No timeout and no retry.
pub fn spawn_units_fetch(url: String, tx: Sender<FetchResult>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let result = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
        {
            Ok(rt) => rt.block_on(fetch_units(&url)),
            Err(e) => Err(FetchError::Network(format!("runtime start failed: {e}"))),
        };

        match &result {
            Ok(units) => log::info!("Fetched {} units from {}", units.len(), url),
            Err(e) => log::error!("Units fetch from {} failed: {}", url, e),
        }

        if tx.send(result).is_err() {
            log::debug!("Render thread gone before units arrived");
        }
    })
}

async fn fetch_units(url: &str) -> FetchResult {
    let response = reqwest::get(url)
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    parse_records(&body).map_err(|e| FetchError::Decode(e.to_string()))
}
