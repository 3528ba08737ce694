//! Dispatcher - The Routing and Dispatch Core
//!
//! The dispatcher sequences one complete cycle per user utterance:
//! classify, resolve, invoke, record. It is the only writer of session
//! state and enforces the single concurrency invariant of the whole
//! core: at most one cycle in flight per session.
//!
//! # Cycle state machine
//!
//! ```text
//! Idle --(submit, non-empty, not busy)--> Classifying
//! Classifying --(decision)--> Dispatching --(narration)--> Idle
//! Classifying --(failure)--------------------------------> Idle
//! Dispatching --(failure)--------------------------------> Idle
//! ```
//!
//! Both failure edges append the same fixed coordinator apology to the
//! transcript; the underlying error detail goes to the operational log
//! only. A submission that arrives while a cycle is in flight is a
//! no-op, not an error.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::classifier::IntentClassifier;
use crate::config::CoreConfig;
use crate::handlers::SpecialistHandler;
use crate::messages::{CoreMessage, CyclePhase, NotifyLevel};
use crate::registry::AgentId;
use crate::resolver::resolve_agent_label;
use crate::session::Session;

/// A session shared between the dispatcher and presentation surfaces
///
/// Surfaces read through the lock; only the dispatcher writes. The busy
/// guard is checked and set under a single acquisition, so racing
/// submissions serialize correctly.
pub type SharedSession = Arc<Mutex<Session>>;

/// Result of a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The cycle completed; the named specialist replied
    Completed {
        /// The specialist that handled the request
        agent: AgentId,
    },
    /// Classification or invocation failed; the fallback apology was
    /// appended and the session is back at rest
    Recovered,
    /// A cycle was already in flight; nothing changed
    RejectedWhileBusy,
    /// The utterance was empty after trimming; nothing changed
    EmptyUtterance,
}

/// The dispatcher - headless routing and dispatch core
pub struct Dispatcher<C, H> {
    /// Configuration
    config: CoreConfig,
    /// Classification oracle adapter
    classifier: Arc<C>,
    /// Specialist invocation adapter
    specialists: Arc<H>,
    /// Channel to presentation surfaces
    tx: mpsc::Sender<CoreMessage>,
}

impl<C, H> Clone for Dispatcher<C, H> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            classifier: Arc::clone(&self.classifier),
            specialists: Arc::clone(&self.specialists),
            tx: self.tx.clone(),
        }
    }
}

impl<C, H> Dispatcher<C, H>
where
    C: IntentClassifier + 'static,
    H: SpecialistHandler + 'static,
{
    /// Create a new dispatcher
    pub fn new(classifier: C, specialists: H, config: CoreConfig, tx: mpsc::Sender<CoreMessage>) -> Self {
        Self {
            config,
            classifier: Arc::new(classifier),
            specialists: Arc::new(specialists),
            tx,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Create a new shared session seeded with the welcome notice
    #[must_use]
    pub fn new_session(&self) -> SharedSession {
        Arc::new(Mutex::new(Session::with_welcome(
            self.config.welcome_notice.clone(),
        )))
    }

    /// Submit a user utterance and run one full cycle
    ///
    /// Runs to completion (success or recovered failure) before
    /// returning; there is no cancellation and no retry. Exactly two
    /// transcript entries are appended per accepted submission: the
    /// user utterance and a terminal handler entry.
    pub async fn submit(&self, session: &SharedSession, utterance: &str) -> SubmitOutcome {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            tracing::debug!("Ignoring empty utterance");
            return SubmitOutcome::EmptyUtterance;
        }

        let cycle_id = Uuid::new_v4();

        // Guard and accept under a single lock acquisition so racing
        // submissions can never both open a cycle.
        let user_entry = {
            let mut session = session.lock().await;
            if session.request_in_flight() {
                tracing::debug!(
                    cycle_id = %cycle_id,
                    "Submission rejected: a cycle is already in flight"
                );
                return SubmitOutcome::RejectedWhileBusy;
            }
            let id = session.begin_cycle(utterance.to_string());
            session.entry(&id).cloned()
        };

        if let Some(entry) = user_entry {
            self.send(CoreMessage::EntryAppended { entry }).await;
        }
        self.send(CoreMessage::AgentActivated {
            agent: AgentId::Coordinator,
        })
        .await;
        self.send(CoreMessage::PhaseChanged {
            phase: CyclePhase::Classifying,
        })
        .await;

        tracing::info!(
            cycle_id = %cycle_id,
            classifier = self.classifier.name(),
            "Classifying utterance"
        );

        let routing = match self.classifier.classify(utterance).await {
            Ok(routing) => routing,
            Err(e) => {
                tracing::warn!(cycle_id = %cycle_id, error = %e, "Classification unavailable");
                return self.recover(session).await;
            }
        };

        let agent = resolve_agent_label(&routing.chosen_subagent);
        tracing::info!(
            cycle_id = %cycle_id,
            label = %routing.chosen_subagent,
            agent = ?agent,
            "Resolved specialist"
        );

        {
            session.lock().await.activate(agent);
        }
        self.send(CoreMessage::AgentActivated { agent }).await;
        self.send(CoreMessage::PhaseChanged {
            phase: CyclePhase::Dispatching,
        })
        .await;

        // Hand-off pause so surfaces can show the routing before the
        // specialist starts working.
        if !self.config.handoff.is_zero() {
            tokio::time::sleep(self.config.handoff).await;
        }

        match self.specialists.invoke(agent, &routing.context_passed).await {
            Ok(narration) => {
                let entry = {
                    let mut session = session.lock().await;
                    let id = session.finish_cycle(narration, agent, Some(routing));
                    session.entry(&id).cloned()
                };
                if let Some(entry) = entry {
                    self.send(CoreMessage::EntryAppended { entry }).await;
                }
                self.send(CoreMessage::AgentActivated {
                    agent: AgentId::Coordinator,
                })
                .await;
                self.send(CoreMessage::PhaseChanged {
                    phase: CyclePhase::Idle,
                })
                .await;

                tracing::info!(cycle_id = %cycle_id, agent = ?agent, "Cycle completed");
                SubmitOutcome::Completed { agent }
            }
            Err(e) => {
                tracing::warn!(
                    cycle_id = %cycle_id,
                    agent = ?agent,
                    error = %e,
                    "Specialist unavailable"
                );
                self.recover(session).await
            }
        }
    }

    /// Terminal fallback for both failure edges
    ///
    /// Appends the fixed apology attributed to the coordinator and
    /// returns the session to rest. The user sees no difference between
    /// a classifier failure and a specialist failure.
    async fn recover(&self, session: &SharedSession) -> SubmitOutcome {
        let entry = {
            let mut session = session.lock().await;
            let id = session.finish_cycle(
                self.config.fallback_notice.clone(),
                AgentId::Coordinator,
                None,
            );
            session.entry(&id).cloned()
        };
        if let Some(entry) = entry {
            self.send(CoreMessage::EntryAppended { entry }).await;
        }
        self.send(CoreMessage::AgentActivated {
            agent: AgentId::Coordinator,
        })
        .await;
        self.send(CoreMessage::PhaseChanged {
            phase: CyclePhase::Idle,
        })
        .await;
        self.send(CoreMessage::Notify {
            level: NotifyLevel::Error,
            message: self.config.fallback_notice.clone(),
        })
        .await;

        SubmitOutcome::Recovered
    }

    /// Send a message to the surface channel
    ///
    /// A slow or disconnected surface never blocks or fails a cycle.
    async fn send(&self, msg: CoreMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classifier::{ClassifyError, RoutingDecision};
    use crate::handlers::{HandlerError, SimulatedSpecialists};
    use crate::session::Speaker;

    // Mock classifier for testing
    struct MockClassifier {
        label: String,
        fail: bool,
        delay: Duration,
    }

    impl MockClassifier {
        fn routing_to(label: &str) -> Self {
            Self {
                label: label.to_string(),
                fail: false,
                delay: Duration::ZERO,
            }
        }

        fn failing() -> Self {
            Self {
                label: String::new(),
                fail: true,
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait::async_trait]
    impl IntentClassifier for MockClassifier {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn classify(&self, utterance: &str) -> Result<RoutingDecision, ClassifyError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(ClassifyError::EmptyResponse);
            }
            Ok(RoutingDecision {
                routing_decision: "dirutekan berdasarkan fungsi inti".to_string(),
                chosen_subagent: self.label.clone(),
                core_function_match: "fungsi inti".to_string(),
                context_passed: utterance.to_string(),
            })
        }
    }

    fn dispatcher<C, H>(
        classifier: C,
        specialists: H,
    ) -> (Dispatcher<C, H>, mpsc::Receiver<CoreMessage>)
    where
        C: IntentClassifier + 'static,
        H: SpecialistHandler + 'static,
    {
        let (tx, rx) = mpsc::channel(100);
        (
            Dispatcher::new(classifier, specialists, CoreConfig::instant(), tx),
            rx,
        )
    }

    fn bare_session() -> SharedSession {
        Arc::new(Mutex::new(Session::empty()))
    }

    #[tokio::test]
    async fn test_successful_cycle() {
        let (dispatcher, _rx) = dispatcher(
            MockClassifier::routing_to("Penjadwalan Janji Temu"),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let session = bare_session();

        let outcome = dispatcher
            .submit(&session, "Jadwalkan janji temu dengan Dr. Sari")
            .await;
        assert_eq!(
            outcome,
            SubmitOutcome::Completed {
                agent: AgentId::Scheduling
            }
        );

        let session = session.lock().await;
        assert_eq!(session.entry_count(), 2);
        assert!(!session.request_in_flight());
        assert_eq!(session.active_agent(), AgentId::Coordinator);

        let user = &session.transcript()[0];
        assert_eq!(user.speaker, Speaker::User);
        assert_eq!(user.text, "Jadwalkan janji temu dengan Dr. Sari");

        let reply = &session.transcript()[1];
        assert_eq!(reply.speaker, Speaker::Handler);
        assert_eq!(reply.responding_agent, Some(AgentId::Scheduling));
        assert!(reply.text.contains("Penjadwalan Janji Temu"));

        let routing = reply.routing.as_ref().expect("routing attached for audit");
        assert!(routing.chosen_subagent.contains("Penjadwalan"));
        assert_eq!(routing.context_passed, "Jadwalkan janji temu dengan Dr. Sari");
    }

    #[tokio::test]
    async fn test_classifier_failure_recovers() {
        let (dispatcher, _rx) = dispatcher(
            MockClassifier::failing(),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let session = bare_session();

        let outcome = dispatcher.submit(&session, "Daftarkan pasien baru").await;
        assert_eq!(outcome, SubmitOutcome::Recovered);

        let session = session.lock().await;
        assert_eq!(session.entry_count(), 2);
        assert!(!session.request_in_flight());
        assert_eq!(session.active_agent(), AgentId::Coordinator);

        let reply = session.last_entry().unwrap();
        assert_eq!(reply.text, dispatcher.config().fallback_notice);
        assert_eq!(reply.responding_agent, Some(AgentId::Coordinator));
        assert!(reply.routing.is_none());
    }

    #[tokio::test]
    async fn test_handler_failure_matches_classifier_failure() {
        struct FailingSpecialists;

        #[async_trait::async_trait]
        impl SpecialistHandler for FailingSpecialists {
            fn name(&self) -> &str {
                "Failing"
            }

            async fn invoke(&self, agent: AgentId, _: &str) -> Result<String, HandlerError> {
                Err(HandlerError::Unavailable {
                    agent: agent.display_name().to_string(),
                    reason: "connection reset".to_string(),
                })
            }
        }

        let (dispatcher, _rx) =
            dispatcher(MockClassifier::routing_to("Rekam Medis"), FailingSpecialists);
        let session = bare_session();

        let outcome = dispatcher.submit(&session, "Ambil riwayat pasien Budi").await;
        assert_eq!(outcome, SubmitOutcome::Recovered);

        let session = session.lock().await;
        let reply = session.last_entry().unwrap();
        // Same apology as a classifier failure: the user sees no
        // difference between the two failure kinds.
        assert_eq!(reply.text, dispatcher.config().fallback_notice);
        assert_eq!(reply.responding_agent, Some(AgentId::Coordinator));
        assert!(reply.routing.is_none());
        assert!(!session.request_in_flight());
    }

    #[tokio::test]
    async fn test_busy_rejection_is_a_no_op() {
        let (dispatcher, _rx) = dispatcher(
            MockClassifier::routing_to("Penagihan dan Pembayaran")
                .with_delay(Duration::from_millis(100)),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let dispatcher = Arc::new(dispatcher);
        let session = bare_session();

        let first = {
            let dispatcher = Arc::clone(&dispatcher);
            let session = Arc::clone(&session);
            tokio::spawn(async move { dispatcher.submit(&session, "Proses pembayaran klaim").await })
        };

        // Let the first submission pass the guard and start classifying.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let len_before = session.lock().await.entry_count();
        let second = dispatcher.submit(&session, "Cek tagihan pasien").await;
        assert_eq!(second, SubmitOutcome::RejectedWhileBusy);
        assert_eq!(session.lock().await.entry_count(), len_before);

        let first = first.await.unwrap();
        assert_eq!(
            first,
            SubmitOutcome::Completed {
                agent: AgentId::Billing
            }
        );
        // Only the accepted submission left entries behind.
        assert_eq!(session.lock().await.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_utterance_changes_nothing() {
        let (dispatcher, mut rx) = dispatcher(
            MockClassifier::routing_to("Manajemen Pasien"),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let session = bare_session();

        let outcome = dispatcher.submit(&session, "   \n\t  ").await;
        assert_eq!(outcome, SubmitOutcome::EmptyUtterance);
        assert_eq!(session.lock().await.entry_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_transcript_grows_by_two_per_cycle() {
        let (dispatcher, _rx) = dispatcher(
            MockClassifier::routing_to("Manajemen Pasien"),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        // Welcome entry sits outside cycle accounting.
        let session = dispatcher.new_session();
        assert_eq!(session.lock().await.entry_count(), 1);

        dispatcher.submit(&session, "Daftarkan pasien Andi").await;
        assert_eq!(session.lock().await.entry_count(), 3);

        dispatcher.submit(&session, "Ubah alamat pasien ID 123").await;
        assert_eq!(session.lock().await.entry_count(), 5);
    }

    #[tokio::test]
    async fn test_unresolvable_label_dispatches_to_coordinator() {
        let (dispatcher, _rx) = dispatcher(
            MockClassifier::routing_to("Gudang Farmasi"),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let session = bare_session();

        let outcome = dispatcher.submit(&session, "Stok obat paracetamol?").await;
        assert_eq!(
            outcome,
            SubmitOutcome::Completed {
                agent: AgentId::Coordinator
            }
        );

        let session = session.lock().await;
        let reply = session.last_entry().unwrap();
        assert_eq!(reply.responding_agent, Some(AgentId::Coordinator));
        assert!(reply.routing.is_some());
    }

    #[tokio::test]
    async fn test_message_stream_choreography() {
        let (dispatcher, mut rx) = dispatcher(
            MockClassifier::routing_to("Penjadwalan Janji Temu"),
            SimulatedSpecialists::new(Duration::ZERO),
        );
        let session = bare_session();

        dispatcher.submit(&session, "Jadwalkan janji temu").await;

        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }

        // User entry, coordinator takes over, classifying, specialist
        // activated, dispatching, terminal entry, coordinator restored,
        // idle again.
        assert!(matches!(
            messages[0],
            CoreMessage::EntryAppended { ref entry } if entry.speaker == Speaker::User
        ));
        assert!(matches!(
            messages[1],
            CoreMessage::AgentActivated {
                agent: AgentId::Coordinator
            }
        ));
        assert!(matches!(
            messages[2],
            CoreMessage::PhaseChanged {
                phase: CyclePhase::Classifying
            }
        ));
        assert!(matches!(
            messages[3],
            CoreMessage::AgentActivated {
                agent: AgentId::Scheduling
            }
        ));
        assert!(matches!(
            messages[4],
            CoreMessage::PhaseChanged {
                phase: CyclePhase::Dispatching
            }
        ));
        assert!(matches!(
            messages[5],
            CoreMessage::EntryAppended { ref entry } if entry.speaker == Speaker::Handler
        ));
        assert!(matches!(
            messages[6],
            CoreMessage::AgentActivated {
                agent: AgentId::Coordinator
            }
        ));
        assert!(matches!(
            messages[7],
            CoreMessage::PhaseChanged {
                phase: CyclePhase::Idle
            }
        ));
        assert_eq!(messages.len(), 8);
    }
}
