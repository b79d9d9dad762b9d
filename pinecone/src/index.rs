use crate::{
    client::{send, send_json},
    models::{Hit, Record, SearchRecordsRequest, SearchRecordsResponse},
    PineconeError,
};

/// Data plane client bound to one index host.
#[derive(Clone)]
pub struct IndexClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl IndexClient {
    pub(crate) fn new(http: reqwest::Client, api_key: String, host: &str) -> Self {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };

        Self {
            http,
            api_key,
            base_url,
        }
    }

    fn namespace_url(&self, namespace: &str, action: &str) -> String {
        format!(
            "{}/records/namespaces/{}/{}",
            self.base_url, namespace, action
        )
    }

    /// Upserts records as newline-delimited JSON. Returns the number of records sent.
    pub async fn upsert_records(
        &self,
        namespace: &str,
        records: &[Record],
    ) -> Result<usize, PineconeError> {
        if records.is_empty() {
            return Ok(0);
        }

        let body = to_ndjson(records)?;
        let request = self
            .http
            .post(self.namespace_url(namespace, "upsert"))
            .header("Content-Type", "application/x-ndjson")
            .body(body);
        send(request, &self.api_key).await?;

        Ok(records.len())
    }

    pub async fn search_records(
        &self,
        namespace: &str,
        request: &SearchRecordsRequest,
    ) -> Result<Vec<Hit>, PineconeError> {
        let request = self
            .http
            .post(self.namespace_url(namespace, "search"))
            .json(request);
        let response: SearchRecordsResponse = send_json(request, &self.api_key).await?;

        Ok(response.result.hits)
    }
}

fn to_ndjson(records: &[Record]) -> Result<String, PineconeError> {
    let mut body = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| PineconeError::ParsingError(e.to_string()))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}
