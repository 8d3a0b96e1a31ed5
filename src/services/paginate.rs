use serde_json::Value;
use tracing::debug;
use crate::error::{Error, Result};
use crate::models::StatsPage;
use crate::services::executor::RequestExecutor;

/// Requests consecutive pages, `start` advancing by the records received so
/// far, until a page comes back shorter than `limit` or the reported `total`
/// is reached. Pages are concatenated in request order.
pub async fn paginate<F>(executor: &RequestExecutor, limit: u32, mut url_for: F) -> Result<Vec<Value>>
where
    F: FnMut(u32) -> Result<String>,
{
    if limit == 0 {
        return Err(Error::validation("page limit must be greater than zero"));
    }

    let mut all = Vec::new();
    let mut start = 0u32;

    loop {
        let url = url_for(start)?;
        let page: StatsPage = serde_json::from_value(executor.get_json(&url).await?)?;
        let received = page.data.len();
        all.extend(page.data);

        debug!(
            start = start,
            received = received,
            collected = all.len(),
            total = ?page.total,
            "Fetched page"
        );

        let short_page = received < limit as usize;
        let reached_total = page.total.is_some_and(|total| all.len() as u64 >= total);
        if short_page || reached_total {
            break;
        }

        start = u32::try_from(all.len())
            .map_err(|_| Error::validation("result set exceeds the addressable page range"))?;
    }

    Ok(all)
}
