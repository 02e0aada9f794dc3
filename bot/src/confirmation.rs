//! Pending tip intents awaiting a yes/no from their sender.
//!
//! Each sender has at most one pending intent. An intent ends exactly once:
//! confirmed, canceled, or expired by its timer. Every path ends with an
//! atomic take from the [`IntentStore`], so whichever path takes the
//! intent first wins and the others become no-ops.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nastip_types::{MessageId, NasAmount, UserId};
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::commands::Response;
use crate::replies;
use crate::transport::Transport;

/// How long a sender has to answer before the tip defaults to "no".
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A tip parsed from a mention, before it is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipRequest {
    /// The mention that asked for the tip.
    pub message_id: MessageId,
    pub sender_id: UserId,
    pub sender_handle: String,
    pub recipient_id: UserId,
    pub recipient_handle: String,
    pub amount: NasAmount,
}

/// A tip waiting for its sender's confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingIntent {
    /// Unique per proposal; lets a timer recognise its own intent.
    pub id: u64,
    pub message_id: MessageId,
    pub sender_id: UserId,
    pub sender_handle: String,
    pub recipient_id: UserId,
    pub recipient_handle: String,
    pub amount: NasAmount,
}

/// Storage for pending intents, keyed by sender.
#[async_trait]
pub trait IntentStore: Send + Sync {
    /// Store `intent` unless its sender already has one. Returns whether it
    /// was stored.
    async fn insert_new(&self, intent: PendingIntent) -> bool;

    /// Remove and return the sender's intent.
    async fn take(&self, sender: UserId) -> Option<PendingIntent>;

    /// Remove and return the sender's intent only if it is intent `id`.
    async fn take_if(&self, sender: UserId, id: u64) -> Option<PendingIntent>;

    async fn contains(&self, sender: UserId) -> bool;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Default)]
pub struct InMemoryIntentStore {
    intents: Mutex<HashMap<UserId, PendingIntent>>,
}

impl InMemoryIntentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IntentStore for InMemoryIntentStore {
    async fn insert_new(&self, intent: PendingIntent) -> bool {
        let mut intents = self.intents.lock().await;
        if intents.contains_key(&intent.sender_id) {
            return false;
        }
        intents.insert(intent.sender_id, intent);
        true
    }

    async fn take(&self, sender: UserId) -> Option<PendingIntent> {
        self.intents.lock().await.remove(&sender)
    }

    async fn take_if(&self, sender: UserId, id: u64) -> Option<PendingIntent> {
        let mut intents = self.intents.lock().await;
        match intents.get(&sender) {
            Some(intent) if intent.id == id => intents.remove(&sender),
            _ => None,
        }
    }

    async fn contains(&self, sender: UserId) -> bool {
        self.intents.lock().await.contains_key(&sender)
    }

    async fn len(&self) -> usize {
        self.intents.lock().await.len()
    }
}

/// Outcome of [`Confirmations::propose`].
#[derive(Debug)]
pub enum Proposal {
    /// The intent is pending and `prompt` is asking the sender to confirm.
    Accepted {
        intent: PendingIntent,
        prompt: JoinHandle<()>,
    },
    /// The sender already had a pending intent; `notice` tells them so.
    Rejected { notice: JoinHandle<()> },
}

impl Proposal {
    /// The spawned messaging task.
    pub fn into_task(self) -> JoinHandle<()> {
        match self {
            Self::Accepted { prompt, .. } => prompt,
            Self::Rejected { notice } => notice,
        }
    }
}

/// Outcome of [`Confirmations::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Confirmed(PendingIntent),
    Canceled(PendingIntent),
    /// No intent was pending for the sender.
    Unmatched,
}

pub struct Confirmations {
    store: Arc<dyn IntentStore>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
    timers: Mutex<HashMap<UserId, (u64, AbortHandle)>>,
    next_id: AtomicU64,
}

impl Confirmations {
    pub fn new(
        store: Arc<dyn IntentStore>,
        transport: Arc<dyn Transport>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            timeout,
            timers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn IntentStore> {
        &self.store
    }

    /// Register a tip and ask its sender to confirm it.
    ///
    /// The store is updated before this returns; the prompt and the expiry
    /// timer run on spawned tasks.
    pub async fn propose(self: &Arc<Self>, request: TipRequest) -> Proposal {
        let sender = request.sender_id;
        let intent = PendingIntent {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message_id: request.message_id,
            sender_id: sender,
            sender_handle: request.sender_handle,
            recipient_id: request.recipient_id,
            recipient_handle: request.recipient_handle,
            amount: request.amount,
        };

        if !self.store.insert_new(intent.clone()).await {
            tracing::info!(%sender, "tip rejected, another one is pending");
            let notice = self.spawn_direct(sender, replies::ALREADY_PENDING.to_string());
            return Proposal::Rejected { notice };
        }

        tracing::info!(
            %sender,
            recipient = %intent.recipient_id,
            amount = %intent.amount,
            intent_id = intent.id,
            "tip awaiting confirmation"
        );

        let timer = {
            let this = Arc::clone(self);
            let id = intent.id;
            tokio::spawn(async move {
                tokio::time::sleep(this.timeout).await;
                this.expire(sender, id).await;
            })
        };
        self.timers
            .lock()
            .await
            .insert(sender, (intent.id, timer.abort_handle()));

        let prompt = self.spawn_direct(
            sender,
            replies::confirmation_prompt(intent.amount, &intent.recipient_handle),
        );
        Proposal::Accepted { intent, prompt }
    }

    /// Settle the sender's pending intent with their reply.
    ///
    /// Side effects of the outcome are left to the caller.
    pub async fn resolve(&self, sender: UserId, response: Response) -> Resolution {
        let Some(intent) = self.store.take(sender).await else {
            tracing::debug!(%sender, ?response, "reply with no pending tip");
            return Resolution::Unmatched;
        };
        self.cancel_timer(sender, intent.id).await;

        tracing::info!(%sender, intent_id = intent.id, ?response, "tip resolved");
        match response {
            Response::Yes => Resolution::Confirmed(intent),
            Response::No => Resolution::Canceled(intent),
        }
    }

    async fn expire(&self, sender: UserId, id: u64) {
        let Some(intent) = self.store.take_if(sender, id).await else {
            return;
        };
        {
            let mut timers = self.timers.lock().await;
            if matches!(timers.get(&sender), Some((timer_id, _)) if *timer_id == id) {
                timers.remove(&sender);
            }
        }
        tracing::info!(%sender, intent_id = intent.id, "tip expired");
        if let Err(e) = self.transport.send_direct(sender, replies::TIMED_OUT).await {
            tracing::warn!(%sender, error = %e, "failed to send expiry notice");
        }
    }

    async fn cancel_timer(&self, sender: UserId, id: u64) {
        let mut timers = self.timers.lock().await;
        if matches!(timers.get(&sender), Some((timer_id, _)) if *timer_id == id) {
            if let Some((_, handle)) = timers.remove(&sender) {
                handle.abort();
            }
        }
    }

    fn spawn_direct(&self, user: UserId, text: String) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.send_direct(user, &text).await {
                tracing::warn!(%user, error = %e, "failed to send direct message");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::NullTransport;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    fn request(amount: u64) -> TipRequest {
        TipRequest {
            message_id: MessageId(100),
            sender_id: ALICE,
            sender_handle: "alice".into(),
            recipient_id: BOB,
            recipient_handle: "bob".into(),
            amount: NasAmount::from_nas(amount),
        }
    }

    fn setup() -> (Arc<Confirmations>, Arc<NullTransport>) {
        let transport = Arc::new(NullTransport::new());
        let confirmations = Arc::new(Confirmations::new(
            Arc::new(InMemoryIntentStore::new()),
            transport.clone(),
            DEFAULT_CONFIRMATION_TIMEOUT,
        ));
        (confirmations, transport)
    }

    fn intent(sender: UserId, id: u64) -> PendingIntent {
        PendingIntent {
            id,
            message_id: MessageId(1),
            sender_id: sender,
            sender_handle: "s".into(),
            recipient_id: BOB,
            recipient_handle: "bob".into(),
            amount: NasAmount::from_nas(1),
        }
    }

    #[tokio::test]
    async fn store_insert_is_exclusive_per_sender() {
        let store = InMemoryIntentStore::new();
        assert!(store.insert_new(intent(ALICE, 1)).await);
        assert!(!store.insert_new(intent(ALICE, 2)).await);
        assert!(store.insert_new(intent(BOB, 3)).await);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.take(ALICE).await.map(|i| i.id), Some(1));
        assert!(store.take(ALICE).await.is_none());
    }

    #[tokio::test]
    async fn take_if_ignores_other_intents() {
        let store = InMemoryIntentStore::new();
        store.insert_new(intent(ALICE, 7)).await;
        assert!(store.take_if(ALICE, 6).await.is_none());
        assert!(store.contains(ALICE).await);
        assert_eq!(store.take_if(ALICE, 7).await.map(|i| i.id), Some(7));
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn propose_prompts_the_sender() {
        let (confirmations, transport) = setup();
        let proposal = confirmations.propose(request(5)).await;
        assert!(matches!(proposal, Proposal::Accepted { .. }));
        proposal.into_task().await.unwrap();

        assert!(confirmations.store().contains(ALICE).await);
        assert_eq!(
            transport.directs_to(ALICE),
            vec!["CONFIRMATION: Send 5 NAS to @bob? (yes/NO)".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_proposal_is_rejected() {
        let (confirmations, transport) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();
        let second = confirmations.propose(request(9)).await;
        assert!(matches!(second, Proposal::Rejected { .. }));
        second.into_task().await.unwrap();

        assert_eq!(transport.directs_to(ALICE)[1], replies::ALREADY_PENDING);
        match confirmations.resolve(ALICE, Response::Yes).await {
            Resolution::Confirmed(intent) => assert_eq!(intent.amount, NasAmount::from_nas(5)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_intent_expires() {
        let (confirmations, transport) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();

        tokio::time::sleep(DEFAULT_CONFIRMATION_TIMEOUT + Duration::from_secs(1)).await;

        assert!(!confirmations.store().contains(ALICE).await);
        assert_eq!(
            transport.directs_to(ALICE).last().map(String::as_str),
            Some(replies::TIMED_OUT)
        );
        assert_eq!(
            confirmations.resolve(ALICE, Response::Yes).await,
            Resolution::Unmatched
        );
    }

    #[tokio::test(start_paused = true)]
    async fn resolved_intent_does_not_expire() {
        let (confirmations, transport) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();

        assert!(matches!(
            confirmations.resolve(ALICE, Response::No).await,
            Resolution::Canceled(_)
        ));
        tokio::time::sleep(DEFAULT_CONFIRMATION_TIMEOUT * 2).await;

        assert_eq!(transport.directs_to(ALICE).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_reply_is_unmatched() {
        let (confirmations, _) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();
        assert!(matches!(
            confirmations.resolve(ALICE, Response::Yes).await,
            Resolution::Confirmed(_)
        ));
        assert_eq!(
            confirmations.resolve(ALICE, Response::Yes).await,
            Resolution::Unmatched
        );
    }

    #[tokio::test(start_paused = true)]
    async fn old_timer_leaves_newer_intent_alone() {
        let (confirmations, transport) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();
        confirmations.resolve(ALICE, Response::No).await;

        tokio::time::sleep(Duration::from_secs(200)).await;
        confirmations.propose(request(6)).await.into_task().await.unwrap();

        // Past the first intent's deadline, before the second's.
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert!(confirmations.store().contains(ALICE).await);
        assert!(!transport
            .directs_to(ALICE)
            .iter()
            .any(|m| m == replies::TIMED_OUT));
    }

    #[tokio::test(start_paused = true)]
    async fn racing_reply_and_timeout_settle_once() {
        let (confirmations, transport) = setup();
        confirmations.propose(request(5)).await.into_task().await.unwrap();

        // Wake at the same instant as the timer.
        tokio::time::sleep(DEFAULT_CONFIRMATION_TIMEOUT).await;
        let resolution = confirmations.resolve(ALICE, Response::Yes).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let expired = transport
            .directs_to(ALICE)
            .iter()
            .filter(|m| *m == replies::TIMED_OUT)
            .count();
        let confirmed = usize::from(matches!(resolution, Resolution::Confirmed(_)));
        assert_eq!(expired + confirmed, 1);
        assert!(confirmations.store().is_empty().await);
    }
}
