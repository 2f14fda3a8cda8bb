use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::{ExamQuiz, ExamSubmission, QuizId, SubmissionResult};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::client::ExamApi;
use crate::config::ApiConfig;
use crate::dto::{ExamQuizDto, SubmissionResultDto, SubmitExamRequest};
use crate::error::ApiError;

/// `ExamApi` backed by the quiz REST service.
#[derive(Clone)]
pub struct HttpExamApi {
    client: Client,
    config: ApiConfig,
}

impl HttpExamApi {
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status, &body))
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn fetch_exam_quiz(&self, quiz_id: QuizId) -> Result<ExamQuiz, ApiError> {
        let url = self.config.endpoint(&format!("exams/quizzes/{quiz_id}"));
        debug!(%url, "fetching exam quiz");

        let response = self.authorized(self.client.get(url)).send().await?;
        let body: ExamQuizDto = ensure_success(response).await?.json().await?;
        Ok(body.into_quiz()?)
    }

    async fn submit_exam(&self, submission: &ExamSubmission) -> Result<SubmissionResult, ApiError> {
        let url = self.config.endpoint("exams/submit");
        let payload = SubmitExamRequest::from_submission(submission);
        debug!(%url, answers = payload.answers.len(), "submitting exam");

        let response = self
            .authorized(self.client.post(url))
            .json(&payload)
            .send()
            .await?;
        let body: SubmissionResultDto = ensure_success(response).await?.json().await?;
        Ok(body.into_result(Utc::now()))
    }
}
