//! Assignment and notification engine.
//!
//! One run goes through four steps:
//! 1. capture the enrollment snapshot (read once, never re-queried);
//! 2. draw the assignment;
//! 3. probe every giver's private channel (open + preliminary notice), all
//!    probes joined before anything else is sent;
//! 4. commit (disclose every recipient) when nobody is undeliverable,
//!    otherwise abort (cancellation notices + group report).
//!
//! Recipient names are only ever sent in step 4's commit branch.

use crate::domain::constants::GENERATION_SUCCESS_REPLY;
use crate::domain::models::{
    Assignment, ChannelHandle, DeliveryOutcome, EnrollmentSnapshot, GroupId, Pairing, Participant,
    RunReport, RunResult,
};
use crate::error::SantaError;
use crate::platform::{EnrollmentRegistry, Notifier};
use crate::services::assignment::draw_assignment;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DISCLOSURE_PREFIX: &str = "You are the Secret Santa for";

pub fn preliminary_notice(group: &GroupId) -> String {
    format!(
        "Secret Santa generation in progress for {}. Your assignment will follow shortly.",
        group
    )
}

pub fn disclosure_text(recipient: &Participant) -> String {
    format!(
        "{} {} ({})! Keep it secret.",
        DISCLOSURE_PREFIX,
        recipient.display_name,
        recipient.mention()
    )
}

pub fn cancellation_notice(group: &GroupId) -> String {
    format!(
        "Secret Santa generation for {} was halted because some members cannot receive private messages. No assignments were made.",
        group
    )
}

fn mentions(participants: &[Participant]) -> String {
    participants
        .iter()
        .map(Participant::mention)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn abort_report(undeliverable: &[Participant]) -> String {
    format!(
        "Secret Santa generation failed. These members must enable private messages from server members before the next draw: {}",
        mentions(undeliverable)
    )
}

pub fn disclosure_failure_note(failed: &[Participant]) -> String {
    format!(
        "Some assignments could not be delivered to: {}. Please contact the organiser.",
        mentions(failed)
    )
}

pub struct Engine<'a, R: ?Sized, N: ?Sized> {
    registry: &'a R,
    notifier: &'a N,
    seed: Option<u64>,
}

impl<'a, R, N> Engine<'a, R, N>
where
    R: EnrollmentRegistry + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(registry: &'a R, notifier: &'a N) -> Self {
        Self {
            registry,
            notifier,
            seed: None,
        }
    }

    /// Fixes the shuffle so a run is reproducible.
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn run(&self, group: &GroupId) -> Result<RunReport, SantaError> {
        let snapshot = self.capture(group).await?;
        let assignment = self.draw(&snapshot)?;
        tracing::info!(group = %group, participants = assignment.len(), "assignment drawn");

        let probes = self.probe_all(group, &assignment).await;

        let undeliverable: Vec<Participant> = probes
            .iter()
            .filter_map(|(pairing, outcome)| match outcome {
                DeliveryOutcome::Undeliverable { reason } => {
                    tracing::debug!(
                        participant = %pairing.giver.handle,
                        reason = %reason,
                        "undeliverable"
                    );
                    Some(pairing.giver.clone())
                }
                DeliveryOutcome::Delivered(_) => None,
            })
            .collect();
        let retained: Vec<(&Pairing, &ChannelHandle)> = probes
            .iter()
            .filter_map(|(pairing, outcome)| match outcome {
                DeliveryOutcome::Delivered(channel) => Some((*pairing, channel)),
                DeliveryOutcome::Undeliverable { .. } => None,
            })
            .collect();

        if undeliverable.is_empty() {
            let disclosure_failures = self.commit(group, &retained).await;
            Ok(RunReport {
                result: RunResult::Completed,
                participants: assignment.len(),
                disclosure_failures,
            })
        } else {
            self.abort(group, &retained, &undeliverable).await;
            Ok(RunReport {
                result: RunResult::Aborted(undeliverable),
                participants: assignment.len(),
                disclosure_failures: Vec::new(),
            })
        }
    }

    async fn capture(&self, group: &GroupId) -> Result<EnrollmentSnapshot, SantaError> {
        let participants = self.registry.snapshot(group).await.map_err(|err| {
            tracing::error!(group = %group, error = %err, "membership unavailable");
            SantaError::GroupUnavailable(err.to_string())
        })?;
        Ok(EnrollmentSnapshot::new(participants))
    }

    fn draw(&self, snapshot: &EnrollmentSnapshot) -> Result<Assignment, SantaError> {
        match self.seed {
            Some(seed) => draw_assignment(snapshot, &mut StdRng::seed_from_u64(seed)),
            None => draw_assignment(snapshot, &mut rand::thread_rng()),
        }
    }

    /// Probes every giver and waits for all of them.
    async fn probe_all<'p>(
        &self,
        group: &GroupId,
        assignment: &'p Assignment,
    ) -> Vec<(&'p Pairing, DeliveryOutcome)> {
        let notice = preliminary_notice(group);
        join_all(assignment.pairs().iter().map(|pairing| {
            let notice = notice.as_str();
            async move { (pairing, self.probe(&pairing.giver, notice).await) }
        }))
        .await
    }

    async fn probe(&self, giver: &Participant, notice: &str) -> DeliveryOutcome {
        let channel = match self.notifier.open_private_channel(giver).await {
            Ok(channel) => channel,
            Err(err) => {
                tracing::warn!(
                    participant = %giver.handle,
                    error = %err,
                    "private channel refused"
                );
                return DeliveryOutcome::Undeliverable {
                    reason: err.to_string(),
                };
            }
        };
        match self.notifier.send(&channel, notice).await {
            Ok(_) => DeliveryOutcome::Delivered(channel),
            Err(err) => {
                tracing::warn!(
                    participant = %giver.handle,
                    error = %err,
                    "preliminary notice rejected"
                );
                DeliveryOutcome::Undeliverable {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Discloses every recipient. Failures past this point are reported, not undone.
    async fn commit(
        &self,
        group: &GroupId,
        retained: &[(&Pairing, &ChannelHandle)],
    ) -> Vec<Participant> {
        let mut failed = Vec::new();
        for (pairing, channel) in retained {
            if let Err(err) = self
                .notifier
                .send(channel, &disclosure_text(&pairing.recipient))
                .await
            {
                tracing::error!(
                    participant = %pairing.giver.handle,
                    error = %err,
                    "disclosure not delivered"
                );
                failed.push(pairing.giver.clone());
            }
        }

        if !failed.is_empty() {
            self.post_best_effort(group, &disclosure_failure_note(&failed)).await;
        }
        self.post_best_effort(group, GENERATION_SUCCESS_REPLY).await;
        tracing::info!(
            group = %group,
            outcome = "completed",
            failed = failed.len(),
            "run finished"
        );
        failed
    }

    async fn abort(
        &self,
        group: &GroupId,
        retained: &[(&Pairing, &ChannelHandle)],
        undeliverable: &[Participant],
    ) {
        let notice = cancellation_notice(group);
        for (pairing, channel) in retained {
            if let Err(err) = self.notifier.send(channel, &notice).await {
                tracing::warn!(
                    participant = %pairing.giver.handle,
                    error = %err,
                    "cancellation notice not delivered"
                );
            }
        }
        self.post_best_effort(group, &abort_report(undeliverable)).await;
        tracing::info!(
            group = %group,
            outcome = "aborted",
            undeliverable = undeliverable.len(),
            "run finished"
        );
    }

    async fn post_best_effort(&self, group: &GroupId, text: &str) {
        if let Err(err) = self.notifier.post_to_group(group, text).await {
            tracing::warn!(group = %group, error = %err, "group post failed");
        }
    }
}
