//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    chat_handler, cupid_handler, dater_handler, geo_handler, gig_handler, manager_handler,
    notify_handler, user_handler, voice_handler,
};
use crate::domain::{
    AccountResponse, BankAccount, CommunicationPreference, CupidProfile, CupidProfileInput,
    CupidStatus, DaterProfile, DaterProfileInput, Feedback, GeoPoint, Gig, GigStatus,
    LedgerEntry, LedgerKind, Message, NewBankAccount, NewCard, NewOuting, NewQuest, Outing,
    OutingStatus, PaymentCard, Quest, RatingTarget, UserRole,
};
use crate::infra::Place;
use crate::services::{
    AudioClip, Channel, Deposit, Moderation, NotificationReceipt, Payout, PlaceCategory, Rating,
    SignInResponse, TokenResponse, VoiceOutcome,
};
use crate::types::{
    AverageRatingResponse, BalanceResponse, CountResponse, MessageResponse, PaginationMeta,
    RateResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cupid Concierge API",
        version = "0.1.0",
        description = "Daters request date-saving gigs; cupids claim and fulfil them"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        user_handler::create_account,
        user_handler::sign_in,
        user_handler::sign_out,
        user_handler::get_account,
        user_handler::delete_account,
        dater_handler::get_profile,
        dater_handler::update_profile,
        dater_handler::get_balance,
        dater_handler::rate_dater,
        dater_handler::get_ratings,
        dater_handler::get_average_rating,
        dater_handler::save_card,
        dater_handler::deposit,
        dater_handler::get_calendar,
        dater_handler::schedule_date,
        cupid_handler::get_profile,
        cupid_handler::update_profile,
        cupid_handler::get_balance,
        cupid_handler::get_gigs,
        cupid_handler::rate_cupid,
        cupid_handler::get_ratings,
        cupid_handler::get_average_rating,
        cupid_handler::save_bank_account,
        cupid_handler::payout,
        gig_handler::create_gig,
        gig_handler::accept_gig,
        gig_handler::complete_gig,
        gig_handler::drop_gig,
        gig_handler::nearby_gigs,
        geo_handler::user_location,
        geo_handler::places_near_user,
        manager_handler::list_daters,
        manager_handler::list_cupids,
        manager_handler::dater_count,
        manager_handler::cupid_count,
        manager_handler::gig_count,
        manager_handler::active_daters,
        manager_handler::active_cupids,
        manager_handler::gig_rate,
        manager_handler::gig_drop_rate,
        manager_handler::gig_complete_rate,
        manager_handler::suspend,
        manager_handler::unsuspend,
        chat_handler::send_message,
        chat_handler::recent_messages,
        voice_handler::speech_to_gig,
        notify_handler::notify_user,
    ),
    components(
        schemas(
            UserRole,
            AccountResponse,
            DaterProfile,
            DaterProfileInput,
            CupidProfile,
            CupidProfileInput,
            CommunicationPreference,
            CupidStatus,
            GeoPoint,
            Gig,
            GigStatus,
            Quest,
            NewQuest,
            Feedback,
            RatingTarget,
            Message,
            Outing,
            NewOuting,
            OutingStatus,
            PaymentCard,
            NewCard,
            BankAccount,
            NewBankAccount,
            LedgerEntry,
            LedgerKind,
            Place,
            PlaceCategory,
            SignInResponse,
            TokenResponse,
            Rating,
            Deposit,
            Payout,
            Moderation,
            AudioClip,
            VoiceOutcome,
            Channel,
            NotificationReceipt,
            MessageResponse,
            BalanceResponse,
            AverageRatingResponse,
            CountResponse,
            RateResponse,
            PaginationMeta,
            user_handler::CreateAccountRequest,
            user_handler::SignInRequest,
            gig_handler::CreateGigRequest,
            gig_handler::GigAction,
            geo_handler::LocationResponse,
            chat_handler::ChatRequest,
            voice_handler::SpeechRequest,
            notify_handler::NotifyRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Sign-up, sign-in and account access"),
        (name = "Daters", description = "Dater profiles, ratings and calendar"),
        (name = "Cupids", description = "Cupid profiles, ratings and held gigs"),
        (name = "Gigs", description = "Gig lifecycle and the nearby-gig feed"),
        (name = "Wallet", description = "Cards, bank accounts and transfers"),
        (name = "Places", description = "Locations and points of interest"),
        (name = "Managers", description = "Platform metrics and moderation"),
        (name = "Assistant", description = "Chat, speech intake and notifications")
    )
)]
pub struct ApiDoc;

/// Registers the bearer and basic security schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /user/sign_in/"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}
