//! Feedback Use Case

use std::sync::Arc;

use auth::policy::{self, AdminArea, Identity, Operation, Resource};

use crate::application::config::WorksConfig;
use crate::domain::entities::Feedback;
use crate::domain::repository::FeedbackRepository;
use crate::domain::services::clean_text;
use crate::domain::value_objects::Email;
use crate::error::WorksResult;

pub struct FeedbackInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub struct FeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    repo: Arc<R>,
    config: Arc<WorksConfig>,
}

impl<R> FeedbackUseCase<R>
where
    R: FeedbackRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<WorksConfig>) -> Self {
        Self { repo, config }
    }

    /// Open to anonymous visitors.
    pub async fn submit(&self, input: FeedbackInput) -> WorksResult<Feedback> {
        let feedback = Feedback::new(
            clean_text("Name", &input.name, 1, self.config.feedback_name_max)?,
            Email::new(&input.email)?,
            clean_text("Message", &input.message, 1, self.config.feedback_message_max)?,
        );
        self.repo.create_feedback(&feedback).await?;

        tracing::info!(feedback_id = %feedback.feedback_id, "Feedback received");
        Ok(feedback)
    }

    pub async fn list(&self, identity: &Identity) -> WorksResult<Vec<Feedback>> {
        policy::authorize(
            identity,
            Operation::Read,
            Resource::Admin(AdminArea::Feedback),
        )?;
        self.repo.list_feedback().await
    }
}
