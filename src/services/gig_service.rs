//! Gig service - requesting, claiming, finishing and abandoning gigs.
//!
//! Every transition runs as a conditional update inside a transaction, so the
//! gig row itself arbitrates races. Adapter calls (geocoding, notifications)
//! stay outside the transaction and never fail the request.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::matching::GigMatcher;
use super::notification_service::{dispatch, NotificationService};
use crate::config::MAX_NEARBY_GIGS;
use crate::domain::{CupidStatus, DropPolicy, GeoPoint, Gig, GigStatus, NewQuest, Principal, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Geocoder, UnitOfWork};
use crate::with_transaction;

#[async_trait]
pub trait GigService: Send + Sync {
    /// Open a new unclaimed gig for the calling dater.
    async fn create(&self, principal: Principal, quest: NewQuest) -> AppResult<Gig>;

    /// Claim an unclaimed gig for the calling cupid.
    async fn accept(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig>;

    async fn complete(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig>;

    /// Hand a claimed gig back. Only its cupid may drop it.
    async fn drop_gig(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig>;

    async fn get(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig>;

    /// Up to `count` unclaimed gigs within the cupid's range.
    async fn nearby(&self, principal: Principal, cupid_id: Uuid, count: u32) -> AppResult<Vec<Gig>>;

    /// Gigs held by the cupid
    async fn cupid_gigs(&self, principal: Principal, cupid_id: Uuid) -> AppResult<Vec<Gig>>;
}

pub struct GigManager<U: UnitOfWork> {
    uow: Arc<U>,
    geocoder: Arc<dyn Geocoder>,
    matcher: Arc<dyn GigMatcher>,
    notifier: Arc<dyn NotificationService>,
    drop_policy: DropPolicy,
}

impl<U: UnitOfWork> GigManager<U> {
    pub fn new(
        uow: Arc<U>,
        geocoder: Arc<dyn Geocoder>,
        matcher: Arc<dyn GigMatcher>,
        notifier: Arc<dyn NotificationService>,
        drop_policy: DropPolicy,
    ) -> Self {
        Self {
            uow,
            geocoder,
            matcher,
            notifier,
            drop_policy,
        }
    }

    /// Resolve a location string, treating adapter failure as "unknown".
    async fn resolve(&self, location: &str) -> Option<GeoPoint> {
        match self.geocoder.geocode(location).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(location, error = %e, "Geocoding failed");
                None
            }
        }
    }

    async fn load(&self, gig_id: Uuid) -> AppResult<Gig> {
        self.uow.gigs().find_by_id(gig_id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> GigService for GigManager<U> {
    async fn create(&self, principal: Principal, quest: NewQuest) -> AppResult<Gig> {
        principal.require_role(UserRole::Dater)?;
        quest.validate()?;

        let dater = self
            .uow
            .accounts()
            .find_dater(principal.user_id)
            .await?
            .ok_or_not_found()?;
        if dater.suspended {
            return Err(AppError::Forbidden);
        }

        let pickup = self.resolve(&quest.pickup_location).await;
        let dater_id = principal.user_id;
        let now = Utc::now();

        let gig = with_transaction!(self.uow, |ctx| {
            let gigs = ctx.gigs();
            gigs.insert(dater_id, quest, pickup, now).await
        })?;

        tracing::info!(gig_id = %gig.id, dater_id = %dater_id, resolved = pickup.is_some(), "Gig requested");
        Ok(gig)
    }

    async fn accept(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig> {
        principal.require_role(UserRole::Cupid)?;

        let cupid = self
            .uow
            .accounts()
            .find_cupid(principal.user_id)
            .await?
            .ok_or_not_found()?;
        if cupid.suspended {
            return Err(AppError::Forbidden);
        }

        let cupid_id = principal.user_id;
        let now = Utc::now();

        let gig = with_transaction!(self.uow, |ctx| {
            let gigs = ctx.gigs();
            if !gigs.claim(gig_id, cupid_id, now).await? {
                return match gigs.find_by_id(gig_id).await? {
                    None => Err(AppError::NotFound),
                    Some(_) => Err(AppError::bad_request("Gig is not available to claim")),
                };
            }

            ctx.accounts()
                .set_cupid_status(cupid_id, CupidStatus::Gigging)
                .await?;
            gigs.find_by_id(gig_id).await?.ok_or_not_found()
        })?;

        tracing::info!(gig_id = %gig.id, cupid_id = %cupid_id, "Gig claimed");
        dispatch(
            self.notifier.clone(),
            gig.dater_id,
            format!("A cupid accepted your gig for {}.", gig.quest.items_requested),
        );
        Ok(gig)
    }

    async fn complete(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig> {
        let current = self.load(gig_id).await?;
        if !current.is_party(principal.user_id) {
            return Err(AppError::Forbidden);
        }
        let cupid_id = match (current.status, current.cupid_id) {
            (GigStatus::Claimed, Some(cupid_id)) => cupid_id,
            _ => return Err(AppError::bad_request("Only a claimed gig can be completed")),
        };
        let now = Utc::now();

        let gig = with_transaction!(self.uow, |ctx| {
            let gigs = ctx.gigs();
            if !gigs.complete(gig_id, cupid_id, now).await? {
                return Err(AppError::bad_request("Only a claimed gig can be completed"));
            }

            ctx.accounts().record_cupid_outcome(cupid_id, true).await?;
            gigs.find_by_id(gig_id).await?.ok_or_not_found()
        })?;

        tracing::info!(gig_id = %gig.id, cupid_id = %cupid_id, "Gig completed");
        dispatch(
            self.notifier.clone(),
            gig.dater_id,
            format!("Your gig for {} is complete.", gig.quest.items_requested),
        );
        Ok(gig)
    }

    async fn drop_gig(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig> {
        let current = self.load(gig_id).await?;
        if !current.is_assigned_to(principal.user_id) {
            return Err(AppError::Forbidden);
        }
        if current.status != GigStatus::Claimed {
            return Err(AppError::bad_request("Only a claimed gig can be dropped"));
        }

        let cupid_id = principal.user_id;
        let released_to = self.drop_policy.released_status();

        let gig = with_transaction!(self.uow, |ctx| {
            let gigs = ctx.gigs();
            if !gigs.release(gig_id, cupid_id, released_to).await? {
                return Err(AppError::bad_request("Only a claimed gig can be dropped"));
            }

            ctx.accounts().record_cupid_outcome(cupid_id, false).await?;
            gigs.find_by_id(gig_id).await?.ok_or_not_found()
        })?;

        tracing::info!(gig_id = %gig.id, cupid_id = %cupid_id, status = %gig.status, "Gig dropped");
        Ok(gig)
    }

    async fn get(&self, principal: Principal, gig_id: Uuid) -> AppResult<Gig> {
        let gig = self.load(gig_id).await?;
        if gig.is_party(principal.user_id) || principal.is_manager() {
            Ok(gig)
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn nearby(&self, principal: Principal, cupid_id: Uuid, count: u32) -> AppResult<Vec<Gig>> {
        principal.require_self_or_staff(cupid_id)?;

        let cupid = self
            .uow
            .accounts()
            .find_cupid(cupid_id)
            .await?
            .ok_or_not_found()?;

        let Some(origin) = self.resolve(&cupid.location).await else {
            tracing::debug!(cupid_id = %cupid_id, "Cupid location unresolved, nothing nearby");
            return Ok(Vec::new());
        };

        let candidates = self.uow.gigs().list_unclaimed().await?;
        let limit = count.min(MAX_NEARBY_GIGS) as usize;

        Ok(self
            .matcher
            .nearby(origin, cupid.gig_range_km, candidates, limit))
    }

    async fn cupid_gigs(&self, principal: Principal, cupid_id: Uuid) -> AppResult<Vec<Gig>> {
        principal.require_self_or_staff(cupid_id)?;
        self.uow.gigs().list_for_cupid(cupid_id).await
    }
}
