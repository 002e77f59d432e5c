pub mod history;
pub mod patterns;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::{CompletionError, FallbackReason};
use crate::models::Turn;

pub use history::{ConversationHistory, HISTORY_CAP};
pub use patterns::resolve_locally;

const MAX_TOKENS: u32 = 250;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;

/// Persona sent as the system turn of every completion request.
pub const SYSTEM_PROMPT: &str = r#"Tu ES Chronos, guide temporel de TimeTravel Agency. Tu n'es PAS une IA, tu es un personnage vivant.

RÈGLES ABSOLUES (ne jamais enfreindre) :
1. Tu ne dis JAMAIS que tu es une IA, un assistant, un modèle de langage ou un programme.
2. Tu ne dis JAMAIS "je ne peux pas" ou "je n'ai pas accès à". Tu ES Chronos, tu SAIS tout sur le voyage temporel.
3. Tu vouvoies TOUJOURS l'utilisateur avec élégance.
4. Tes réponses font 2-4 phrases MAXIMUM sauf demande explicite de détails.
5. Si question hors-sujet, ramène SUBTILEMENT vers les voyages temporels.

TON IDENTITÉ :
- Tu travailles pour TimeTravel Agency (Heisenberg Prod.), 12 bis Cour de Verdun Gensoul, 69002 Lyon (Perrache).
- L'agence existe depuis 1986. 40 ans d'excellence, zéro incident.
- Tu es érudit, mystérieux, légèrement poétique. Tu adores les détails historiques.
- Tu ponctues parfois d'un emoji discret : ⏳ ✨ 🕰️

TES 3 DESTINATIONS :
PARIS 1889, l'Exposition Universelle
- La Tour Eiffel peinte en ROUGE vénitien (sa couleur d'origine)
- 32 millions de visiteurs, électricité partout, Thomas Edison présent
- Prix : 15,000 Crédits Temporels | Inclus : costume Belle Époque, guide francophone

CRÉTACÉ, il y a 66 millions d'années
- Safari au coucher du soleil parmi les Tyrannosaures et Tricératops
- Protocole "Bouclier Temporel" : invisibilité totale, sécurité absolue
- Prix : 22,000 Crédits Temporels | Inclus : combinaison camouflage, drone d'observation

FLORENCE 1504, la Renaissance
- Michel-Ange sculpte le David, Léonard de Vinci peint la Joconde dans son atelier
- Piazza della Signoria, ateliers d'orfèvres, banquets Médicis
- Prix : 18,000 Crédits Temporels | Inclus : costume Renaissance, introduction à un artiste

CONTACT :
- Email : contact@heisenberg-prod.com
- Téléphone : +33 (0)4 78 41 41 41
- Adresse : 12 bis Cour de Verdun Gensoul, 69002 Lyon"#;

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if it carries any text.
    pub fn into_reply(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
    }
}

// ── Backends ──────────────────────────────────────────────────────────────────

/// A chat-completion endpoint.
///
/// `messages` is the full request transcript, system turn first.
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        messages: &[Turn],
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// Mistral chat-completions client.
#[derive(Clone)]
pub struct MistralClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl MistralClient {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionBackend for MistralClient {
    async fn complete(&self, messages: &[Turn]) -> Result<String, CompletionError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status: status.as_u16(), body });
        }

        let text = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;
        parsed.into_reply().ok_or(CompletionError::EmptyReply)
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Outcome of resolving one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Remote(String),
    Fallback { reply: &'static str, reason: FallbackReason },
}

impl Resolution {
    pub fn reply(&self) -> &str {
        match self {
            Resolution::Remote(reply) => reply,
            Resolution::Fallback { reply, .. } => reply,
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Resolution::Remote(_) => None,
            Resolution::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Sends `utterance` with `history` as context.
///
/// On success the user and agent turns are both recorded and the history is
/// trimmed to its cap. On failure the history is left exactly as it was.
pub async fn resolve_remotely<B: CompletionBackend>(
    backend: &B,
    utterance: &str,
    history: &mut ConversationHistory,
) -> Result<String, CompletionError> {
    history.push(Turn::user(utterance));

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Turn::system(SYSTEM_PROMPT));
    messages.extend_from_slice(history.turns());

    match backend.complete(&messages).await {
        Ok(reply) => {
            history.push(Turn::agent(reply.clone()));
            history.trim();
            Ok(reply)
        }
        Err(e) => {
            history.rollback_user_turn();
            Err(e)
        }
    }
}

/// Picks the remote model when configured and falls back to the pattern table.
pub struct Resolver<B> {
    backend: Option<B>,
}

impl Resolver<MistralClient> {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let backend = match &config.api_key {
            Some(key) => {
                let client =
                    MistralClient::new(key, &config.api_url, &config.model, config.request_timeout)?;
                info!("Completions endpoint {} ({})", client.endpoint(), client.model());
                Some(client)
            }
            None => None,
        };
        Ok(Self::new(backend))
    }
}

impl<B: CompletionBackend> Resolver<B> {
    pub fn new(backend: Option<B>) -> Self {
        Self { backend }
    }

    pub fn local_only() -> Self {
        Self { backend: None }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Always produces a reply; remote failures degrade to [`resolve_locally`].
    pub async fn resolve(&self, utterance: &str, history: &mut ConversationHistory) -> Resolution {
        let Some(backend) = &self.backend else {
            debug!("No completion credential; answering locally");
            return Resolution::Fallback {
                reply: resolve_locally(utterance),
                reason: FallbackReason::ConfigurationAbsent,
            };
        };

        match resolve_remotely(backend, utterance, history).await {
            Ok(reply) => Resolution::Remote(reply),
            Err(e) => {
                let reason = FallbackReason::from(&e);
                match reason {
                    FallbackReason::Transport => error!("Remote completion unreachable ({reason}): {e}"),
                    _ => warn!("Remote completion rejected ({reason}): {e}"),
                }
                Resolution::Fallback { reply: resolve_locally(utterance), reason }
            }
        }
    }
}
