// src/source/http.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::QuizError;
use crate::source::{SubjectSource, subject_file_name};

/// Subject files served as static assets under a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// `base` is the folder URL; a trailing slash is added when missing so
    /// that file names resolve inside it.
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn subject_url(&self, subject: &str) -> Result<Url, QuizError> {
        Ok(self.base.join(&subject_file_name(subject))?)
    }
}

#[async_trait]
impl SubjectSource for HttpSource {
    async fn fetch_subject(&self, subject: &str) -> Result<String, QuizError> {
        let url = self.subject_url(subject)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.text().await?),
            StatusCode::NOT_FOUND => Err(QuizError::SubjectNotFound(subject.to_string())),
            status => Err(QuizError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        }
    }

    async fn has_subject(&self, subject: &str) -> Result<bool, QuizError> {
        let url = self.subject_url(subject)?;
        let response = self.client.head(url).send().await?;
        Ok(response.status().is_success())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}
