//! Test doubles for the external seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::{AuthError, AuthUser, IdentityProvider};
use crate::llm_client::{LlmError, TextGenerator};

enum Script {
    Replies(Mutex<VecDeque<String>>),
    Failure { status: u16, message: String },
}

/// `TextGenerator` that answers from a fixed script and records every prompt.
/// The last reply repeats once the script runs out.
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            script: Script::Replies(Mutex::new(
                replies.iter().map(|r| r.to_string()).collect(),
            )),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            script: Script::Failure {
                status,
                message: message.to_string(),
            },
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _system_instruction: Option<&str>,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Failure { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
            Script::Replies(replies) => {
                let mut replies = replies.lock().unwrap();
                let reply = if replies.len() > 1 {
                    replies.pop_front()
                } else {
                    replies.front().cloned()
                };
                reply.ok_or(LlmError::EmptyContent)
            }
        }
    }
}

/// Accepts tokens of the form `valid:<uid>`.
pub struct FakeIdentityProvider;

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn verify(&self, id_token: &str) -> Result<AuthUser, AuthError> {
        let uid = id_token
            .strip_prefix("valid:")
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("not a test token".to_string()))?;
        Ok(AuthUser {
            uid: uid.to_string(),
            display_name: Some(format!("User {uid}")),
            email: Some(format!("{uid}@example.com")),
            photo_url: None,
        })
    }
}
