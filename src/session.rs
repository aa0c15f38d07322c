use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::llm::{ChatClient, ChatMessage};
use crate::persona::{Philosopher, ResponseLength};
use crate::prompt::build_prompt;
use crate::retriever::Retriever;
use crate::translate::Translator;
use anyhow::Result;
use ndarray::Array1;
use std::fmt::Write;
use tracing::info;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// The three remote seams a submission passes through. Kept as a trait so
/// the pipeline can run against a recording stub in tests.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
    async fn embed(&self, text: &str) -> Result<Array1<f32>>;
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String>;
}

/// Production backend over the real HTTP adapters.
pub struct RemoteBackend {
    translator: Translator,
    embedder: EmbeddingClient,
    chat: ChatClient,
}

impl RemoteBackend {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(RemoteBackend {
            translator: Translator::new(cfg)?,
            embedder: EmbeddingClient::new(cfg)?,
            chat: ChatClient::new(cfg)?,
        })
    }
}

impl Backend for RemoteBackend {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        self.translator.translate(text, target_lang).await
    }

    async fn embed(&self, text: &str) -> Result<Array1<f32>> {
        self.embedder.embed(text).await
    }

    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String> {
        self.chat.complete(messages, model).await
    }
}

/// One entry of the session log. User and assistant turns carry their
/// display metadata as named fields rather than delimiter-packed strings.
#[derive(Debug, Clone)]
pub enum ConversationMessage {
    System {
        content: String,
    },
    User {
        /// Translated prompt as sent to the model.
        content: String,
        /// What the user actually typed, for display.
        original_text: String,
    },
    Assistant {
        content: String,
        persona_name: String,
    },
}

impl ConversationMessage {
    fn as_wire(&self) -> ChatMessage {
        match self {
            ConversationMessage::System { content } => ChatMessage::new("system", content.clone()),
            ConversationMessage::User { content, .. } => ChatMessage::new("user", content.clone()),
            ConversationMessage::Assistant { content, .. } => {
                ChatMessage::new("assistant", content.clone())
            }
        }
    }
}

/// Per-client conversation state. Owned by the transport that created it;
/// there is no process-wide session storage.
pub struct ChatSession {
    id: Uuid,
    conversation: Vec<ConversationMessage>,
    philosopher: Philosopher,
    length: ResponseLength,
    model: &'static str,
    model_lang: String,
    display_lang: String,
}

impl ChatSession {
    /// Opens a session: builds the persona instruction for `philosopher`,
    /// translates it to the model language, and seeds the conversation with
    /// it. The system message is set exactly once here and never altered.
    pub async fn start<B: Backend>(
        backend: &B,
        philosopher: Philosopher,
        length: ResponseLength,
        model: &'static str,
        model_lang: &str,
        display_lang: &str,
    ) -> Result<Self> {
        let id = Uuid::new_v4();
        let system = backend
            .translate(&philosopher.system_message(), model_lang)
            .await?;
        info!(session = %id, %philosopher, "session started");
        Ok(ChatSession {
            id,
            conversation: vec![ConversationMessage::System { content: system }],
            philosopher,
            length,
            model,
            model_lang: model_lang.to_string(),
            display_lang: display_lang.to_string(),
        })
    }

    pub fn philosopher(&self) -> Philosopher {
        self.philosopher
    }

    pub fn set_philosopher(&mut self, philosopher: Philosopher) {
        self.philosopher = philosopher;
    }

    pub fn set_length(&mut self, length: ResponseLength) {
        self.length = length;
    }

    pub fn set_model(&mut self, model: &'static str) {
        self.model = model;
    }

    pub fn conversation(&self) -> &[ConversationMessage] {
        &self.conversation
    }

    /// Clears the log entirely. The persona system message is not
    /// reinserted; persona framing only returns with a fresh session.
    pub fn reset(&mut self) {
        info!(session = %self.id, "conversation reset");
        self.conversation.clear();
    }

    fn wire_history(&self) -> Vec<ChatMessage> {
        self.conversation.iter().map(|m| m.as_wire()).collect()
    }

    /// Runs one submission through the pipeline: translate the input, embed
    /// it, rank passages, build and translate the prompt, complete, translate
    /// the reply. Returns `false` without touching any backend when the
    /// input is empty. On failure nothing is appended; the log keeps the
    /// state prior to the failed turn.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        retriever: &Retriever<'_>,
        text: &str,
    ) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let text: String = text.nfc().collect();
        info!(session = %self.id, philosopher = %self.philosopher, "submission received");

        let normalized = backend.translate(&text, &self.model_lang).await?;
        let query_embedding = backend.embed(&normalized).await?;
        let passages = retriever.rank(&query_embedding, self.philosopher);
        info!(session = %self.id, passages = passages.len(), "passages retrieved");

        let prompt = build_prompt(&text, self.philosopher, &passages, self.length.budget());
        let prompt = backend.translate(&prompt, &self.model_lang).await?;

        let mut history = self.wire_history();
        history.push(ChatMessage::new("user", prompt.clone()));
        let reply = backend.complete(&history, self.model).await?;
        let reply = backend.translate(&reply, &self.display_lang).await?;

        self.conversation.push(ConversationMessage::User {
            content: prompt,
            original_text: text,
        });
        self.conversation.push(ConversationMessage::Assistant {
            content: reply,
            persona_name: self.philosopher.display_name().to_string(),
        });
        Ok(true)
    }

    /// Renders the log in insertion order with role-specific labels. System
    /// messages are bookkeeping, not display.
    pub fn render(&self) -> String {
        const RULE: &str =
            "_________________________________________________________________________";
        let mut out = String::new();
        let _ = writeln!(out, "📝 대화 로그");
        let _ = writeln!(out, "{RULE}");
        for message in &self.conversation {
            match message {
                ConversationMessage::System { .. } => {}
                ConversationMessage::User { original_text, .. } => {
                    let _ = writeln!(out, "🙋‍♂ 나:");
                    let _ = writeln!(out, "{original_text}");
                    let _ = writeln!(out, "{RULE}");
                }
                ConversationMessage::Assistant {
                    content,
                    persona_name,
                } => {
                    let _ = writeln!(out, "🧔 {persona_name}:");
                    let _ = writeln!(out, "{content}");
                    let _ = writeln!(out, "{RULE}");
                }
            }
        }
        out
    }
}
