//! Voice intake - turn a dater's spoken request into a gig.
//!
//! The clip is transcribed, the assistant decides whether a gig was asked for
//! and what to pick up, and the gig goes through the regular create path.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::gig_service::GigService;
use crate::config::VOICE_ITEMS_UNKNOWN;
use crate::domain::{GeoPoint, Gig, NewQuest, Principal, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ChatResponder, Geocoder, PlacesLookup, Transcriber, UnitOfWork};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AudioClip {
    /// Container format, e.g. `wav`
    #[serde(rename = "type")]
    #[schema(example = "wav")]
    pub format: String,
    /// Base64-encoded audio bytes
    pub data: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoiceOutcome {
    pub gig_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gig: Option<Gig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VoiceOutcome {
    fn not_created(message: Option<&str>, error: Option<&str>) -> Self {
        Self {
            gig_created: false,
            gig: None,
            message: message.map(str::to_string),
            error: error.map(str::to_string),
        }
    }
}

/// What the assistant made of the transcript.
#[derive(Debug, PartialEq, Eq)]
struct Intent {
    create_gig: bool,
    items: Option<String>,
}

fn intake_prompt(budget_cents: i64, transcript: &str) -> String {
    format!(
        "The following text is transcribed from an audio file.\n\
         Analyze the text to determine if a gig should be created.\n\
         A gig can be created by saying 'create gig'.\n\
         The purpose of a gig is to tell a Cupid what to do to save the date.\n\
         A gig needs to know what items are requested for the date.\n\
         The budget for the gig is the amount the Dater is willing to spend.\n\
         Budget: ${}.{:02}\n\
         Please give your response in the following form:\n\
         Create gig: True or False\n\
         Items requested: Flowers, Chocolate, etc. or {} if no items are requested\n\
         The text is:\n\n{}",
        budget_cents / 100,
        budget_cents % 100,
        VOICE_ITEMS_UNKNOWN,
        transcript
    )
}

fn parse_intent(reply: &str) -> Intent {
    let mut intent = Intent {
        create_gig: false,
        items: None,
    };

    for line in reply.lines().map(str::trim) {
        if let Some(answer) = field(line, "create gig:") {
            intent.create_gig = answer.eq_ignore_ascii_case("true");
        } else if let Some(items) = field(line, "items requested:") {
            if !items.is_empty() && items != VOICE_ITEMS_UNKNOWN {
                intent.items = Some(items.to_string());
            }
        }
    }
    intent
}

/// Value after a case-insensitive `label` prefix.
fn field<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| line[label.len()..].trim())
}

#[async_trait]
pub trait VoiceService: Send + Sync {
    async fn intake(&self, principal: Principal, clip: AudioClip) -> AppResult<VoiceOutcome>;
}

pub struct VoiceManager<U: UnitOfWork> {
    uow: Arc<U>,
    transcriber: Arc<dyn Transcriber>,
    chat: Arc<dyn ChatResponder>,
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlacesLookup>,
    gigs: Arc<dyn GigService>,
}

impl<U: UnitOfWork> VoiceManager<U> {
    pub fn new(
        uow: Arc<U>,
        transcriber: Arc<dyn Transcriber>,
        chat: Arc<dyn ChatResponder>,
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlacesLookup>,
        gigs: Arc<dyn GigService>,
    ) -> Self {
        Self {
            uow,
            transcriber,
            chat,
            geocoder,
            places,
            gigs,
        }
    }

    /// Address of the first matching place near the dater, if one is found.
    async fn pickup_for(&self, location: &str, items: &str) -> AppResult<Option<String>> {
        let origin: Option<GeoPoint> = match self.geocoder.geocode(location).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(location, error = %e, "Geocoding failed");
                None
            }
        };
        let Some(origin) = origin else {
            return Ok(None);
        };

        let places = self.places.search(origin, items).await?;
        Ok(places.into_iter().next().map(|p| p.address))
    }
}

#[async_trait]
impl<U: UnitOfWork> VoiceService for VoiceManager<U> {
    async fn intake(&self, principal: Principal, clip: AudioClip) -> AppResult<VoiceOutcome> {
        principal.require_role(UserRole::Dater)?;
        let dater = self
            .uow
            .accounts()
            .find_dater(principal.user_id)
            .await?
            .ok_or_not_found()?;

        let audio = STANDARD
            .decode(clip.data.trim())
            .map_err(|_| AppError::bad_request("Audio is not valid base64"))?;

        let transcript = self.transcriber.transcribe(&audio, &clip.format).await?;
        tracing::debug!(user_id = %principal.user_id, chars = transcript.len(), "Audio transcribed");

        let reply = self
            .chat
            .respond(&intake_prompt(dater.budget_cents, &transcript))
            .await?;
        let intent = parse_intent(&reply);

        if !intent.create_gig {
            return Ok(VoiceOutcome::not_created(Some("gig creation not needed"), None));
        }
        let Some(items) = intent.items else {
            return Ok(VoiceOutcome::not_created(
                None,
                Some("gig creation failed. no specified pickup items"),
            ));
        };

        let pickup_location = self
            .pickup_for(&dater.location, &items)
            .await?
            .unwrap_or_else(|| dater.location.clone());

        let quest = NewQuest {
            budget_cents: dater.budget_cents,
            items_requested: items,
            pickup_location,
        };
        let gig = self.gigs.create(principal, quest).await?;

        tracing::info!(user_id = %principal.user_id, gig_id = %gig.id, "Gig created from voice request");
        Ok(VoiceOutcome {
            gig_created: true,
            gig: Some(gig),
            message: Some("gig was created".to_string()),
            error: None,
        })
    }
}
