use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub type SdkResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub url: String,
    pub title: String,
    pub completed: bool,
    pub order: Option<i64>,
}

/// Body for create and full update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Body for partial update. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn list_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn detail_url(&self, id: u64) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    pub async fn list(&self) -> SdkResult<Vec<Todo>> {
        let resp = self.client.get(self.list_url()).send().await?;
        parse(resp).await
    }

    pub async fn create(&self, input: &TodoInput) -> SdkResult<Todo> {
        let resp = self.client.post(self.list_url()).json(input).send().await?;
        parse(resp).await
    }

    /// `None` when the item does not exist.
    pub async fn get(&self, id: u64) -> SdkResult<Option<Todo>> {
        let resp = self.client.get(self.detail_url(id)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse(resp).await.map(Some)
    }

    pub async fn update(&self, id: u64, input: &TodoInput) -> SdkResult<Todo> {
        let resp = self.client.put(self.detail_url(id)).json(input).send().await?;
        parse(resp).await
    }

    pub async fn patch(&self, id: u64, patch: &TodoPatch) -> SdkResult<Todo> {
        let resp = self.client.patch(self.detail_url(id)).json(patch).send().await?;
        parse(resp).await
    }

    /// `false` when the item did not exist.
    pub async fn delete(&self, id: u64) -> SdkResult<bool> {
        let resp = self.client.delete(self.detail_url(id)).send().await?;
        match resp.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(format!("API returned error status {}", status).into()),
        }
    }

    /// Send an arbitrary request relative to the API root.
    pub async fn raw(&self, method: reqwest::Method, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

async fn parse<T: for<'de> Deserialize<'de>>(resp: Response) -> SdkResult<T> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("API returned error status {}: {}", status, text).into());
    }

    Ok(serde_json::from_str(&text)?)
}
