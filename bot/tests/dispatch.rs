use std::sync::Arc;
use std::time::Duration;

use futures_util::stream;
use nastip_bot::confirmation::DEFAULT_CONFIRMATION_TIMEOUT;
use nastip_bot::{
    event_stream, replies, BotConfig, BotError, Event, NullTransport, ShutdownController,
    TipBot, TransportError,
};
use nastip_crypto::{derive_address, generate_keypair, parse_address, KeyCipher};
use nastip_nullables::NullNode;
use nastip_types::{Address, ChainId, MessageId, NasAmount, UserId};
use nastip_vault::Account;

const SECRET: &[u8; 16] = b"0123456789abcdef";
const BOT_ID: UserId = UserId(999);
const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

struct Fixture {
    node: Arc<NullNode>,
    transport: Arc<NullTransport>,
    bot: TipBot,
}

impl Fixture {
    fn new() -> Self {
        let config = BotConfig {
            bot_user_id: BOT_ID,
            ..BotConfig::default()
        };
        let node = Arc::new(NullNode::new(config.chain_id));
        let bot_account = Account::generate();
        let contract = parse_address(&config.contract_address).unwrap();
        node.deploy_key_contract(contract, *bot_account.address());

        let transport = Arc::new(NullTransport::new());
        let bot = TipBot::new(
            &config,
            node.clone(),
            KeyCipher::new(SECRET).unwrap(),
            bot_account,
            transport.clone(),
        )
        .unwrap();
        Self {
            node,
            transport,
            bot,
        }
    }

    /// Register `user` and give their account `nas` NAS.
    async fn funded(&self, user: UserId, nas: u64) -> Address {
        let resolved = self.bot.vault().resolve_account(user, user).await.unwrap();
        let address = *resolved.account.address();
        self.node.set_balance(address, NasAmount::from_nas(nas));
        address
    }

    async fn send(&self, event: Event) {
        if let Some(task) = self.bot.dispatcher().handle(event).await {
            task.await.unwrap();
        }
    }

    async fn dm(&self, user: UserId, text: &str) {
        self.send(Event::direct_message(user, "user", text)).await;
    }

    fn transfers_from(&self, address: &Address) -> usize {
        self.node
            .submissions()
            .iter()
            .filter(|tx| tx.from() == address)
            .count()
    }
}

fn tip_mention(text: &str) -> Event {
    Event::mention(
        MessageId(500),
        (ALICE, "alice"),
        (BOB, "bob"),
        MessageId(400),
        text,
    )
}

#[tokio::test]
async fn mention_then_yes_tips_the_recipient() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot send 2.5 NAS")).await;
    assert_eq!(
        f.transport.directs_to(ALICE),
        vec!["CONFIRMATION: Send 2.5 NAS to @bob? (yes/NO)".to_string()]
    );
    assert!(f.bot.confirmations().store().contains(ALICE).await);

    f.dm(ALICE, "yes").await;

    let bob = *f
        .bot
        .vault()
        .existing_account(BOB)
        .await
        .unwrap()
        .address();
    let tip = f.node.submissions().pop().unwrap();
    assert_eq!(tip.from(), &alice);
    assert_eq!(tip.to(), &bob);
    assert_eq!(tip.value().wei(), 2_500_000_000_000_000_000);
    assert_eq!(tip.nonce(), 1);
    assert!(tip.is_signed());
    assert_eq!(f.node.state_of(&bob).balance, NasAmount::parse_nas("2.5").unwrap());

    let to_alice = f.transport.directs_to(ALICE);
    assert_eq!(to_alice[1], replies::STARTING);
    assert!(to_alice[2].starts_with("Transaction sent. TX: "));
    assert!(to_alice[2].contains(&tip.hash().to_string()));

    let to_bob = f.transport.directs_to(BOB);
    assert_eq!(to_bob.len(), 1);
    assert!(to_bob[0].starts_with("@alice sent you 2.5 NAS!"));

    let posts = f.transport.public_posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].0.contains("@alice sent 2.5 NAS to @bob"));
    assert_eq!(posts[0].1, Some(MessageId(500)));

    assert!(f.bot.confirmations().store().is_empty().await);
}

#[tokio::test]
async fn duplicate_yes_submits_once() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot tip 1 NAS")).await;
    f.dm(ALICE, "yes").await;
    f.dm(ALICE, "YES").await;

    assert_eq!(f.transfers_from(&alice), 1);
    assert_eq!(f.transport.public_posts().len(), 1);
}

#[tokio::test]
async fn no_cancels_the_tip() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot give 1 NAS")).await;
    f.dm(ALICE, "no").await;

    assert_eq!(f.transfers_from(&alice), 0);
    assert_eq!(
        f.transport.directs_to(ALICE).last().map(String::as_str),
        Some(replies::CANCELED)
    );
    assert!(f.bot.confirmations().store().is_empty().await);
}

#[tokio::test]
async fn second_mention_while_pending_is_rejected() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot send 1 NAS")).await;
    f.send(tip_mention("@NebBot send 4 NAS")).await;
    assert_eq!(f.transport.directs_to(ALICE)[1], replies::ALREADY_PENDING);

    f.dm(ALICE, "yes").await;
    let tip = f.node.submissions().pop().unwrap();
    assert_eq!(tip.from(), &alice);
    assert_eq!(tip.value(), NasAmount::from_nas(1));
}

#[tokio::test]
async fn failed_tip_reports_reason_and_posts_nothing() {
    let f = Fixture::new();
    f.funded(ALICE, 0).await;

    f.send(tip_mention("@NebBot send 3 NAS")).await;
    f.dm(ALICE, "yes").await;

    let last = f.transport.directs_to(ALICE).pop().unwrap();
    assert!(last.starts_with("Transaction failed.\nReason: "));
    assert!(last.contains("insufficient balance"));
    assert!(f.transport.public_posts().is_empty());
    assert!(f.transport.directs_to(BOB).is_empty());
}

#[tokio::test]
async fn nonce_conflict_asks_user_to_retry() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;
    f.funded(BOB, 0).await;
    f.node
        .fail_next_submission("transaction's nonce is invalid, should bigger than the from's nonce 0");

    f.send(tip_mention("@NebBot send 1 NAS")).await;
    f.dm(ALICE, "yes").await;

    let last = f.transport.directs_to(ALICE).pop().unwrap();
    assert!(last.starts_with("Transaction failed.\nReason: "));
    assert!(last.contains("nonce"));
    assert!(last.ends_with("\nPlease try again in a moment."));
    assert_eq!(f.transfers_from(&alice), 0);
    assert!(f.transport.public_posts().is_empty());

    // The retry goes through.
    f.send(tip_mention("@NebBot send 1 NAS")).await;
    f.dm(ALICE, "yes").await;
    assert_eq!(f.transfers_from(&alice), 1);
    assert!(f
        .transport
        .directs_to(ALICE)
        .pop()
        .unwrap()
        .starts_with("Transaction sent."));
}

#[tokio::test(start_paused = true)]
async fn racing_yes_and_timeout_have_one_effect() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot send 1 NAS")).await;
    tokio::time::sleep(DEFAULT_CONFIRMATION_TIMEOUT).await;
    f.dm(ALICE, "yes").await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let expired = f
        .transport
        .directs_to(ALICE)
        .iter()
        .filter(|m| *m == replies::TIMED_OUT)
        .count();
    assert_eq!(expired + f.transfers_from(&alice), 1);
}

#[tokio::test(start_paused = true)]
async fn unanswered_tip_times_out() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 10).await;

    f.send(tip_mention("@NebBot send 1 NAS")).await;
    tokio::time::sleep(DEFAULT_CONFIRMATION_TIMEOUT + Duration::from_secs(1)).await;
    f.dm(ALICE, "yes").await;

    assert_eq!(
        f.transport.directs_to(ALICE).last().map(String::as_str),
        Some(replies::TIMED_OUT)
    );
    assert_eq!(f.transfers_from(&alice), 0);
}

#[tokio::test]
async fn ignored_mentions() {
    let f = Fixture::new();

    // Not a reply.
    let mut no_target = tip_mention("@NebBot send 1 NAS");
    no_target.reply_to_message_id = None;
    no_target.recipient_id = None;
    f.send(no_target).await;

    // Tipping oneself.
    f.send(Event::mention(
        MessageId(1),
        (ALICE, "alice"),
        (ALICE, "alice"),
        MessageId(2),
        "@NebBot send 1 NAS",
    ))
    .await;

    // The bot's own post.
    f.send(Event::mention(
        MessageId(3),
        (BOT_ID, "NebBot"),
        (BOB, "bob"),
        MessageId(4),
        "@NebBot send 1 NAS",
    ))
    .await;

    // Malformed.
    f.send(tip_mention("@NebBot send some NAS")).await;
    f.send(tip_mention("@NebBot send 5")).await;

    assert!(f.transport.sent().is_empty());
    assert_eq!(f.node.request_count(), 0);
    assert!(f.bot.confirmations().store().is_empty().await);
}

#[tokio::test]
async fn transfer_with_bad_address_fails_before_any_request() {
    let f = Fixture::new();
    let bad = format!("n1{}", "z".repeat(33));
    assert_eq!(bad.len(), 35);

    f.dm(ALICE, &format!("transfer {bad} 1.0")).await;

    assert_eq!(f.node.request_count(), 0);
    let reply = f.transport.directs_to(ALICE).pop().unwrap();
    assert!(reply.starts_with("Sorry, something went wrong. Error: invalid address"));
}

#[tokio::test]
async fn transfer_sends_without_confirmation() {
    let f = Fixture::new();
    let alice = f.funded(ALICE, 5).await;
    let target = derive_address(&generate_keypair().public);

    f.dm(ALICE, &format!("transfer {target} 1.5")).await;

    let tx = f.node.submissions().pop().unwrap();
    assert_eq!(tx.from(), &alice);
    assert_eq!(tx.to(), &target);
    assert_eq!(tx.value(), NasAmount::parse_nas("1.5").unwrap());
    assert_eq!(tx.chain_id(), ChainId::MAINNET);
    assert!(f
        .transport
        .directs_to(ALICE)
        .pop()
        .unwrap()
        .starts_with("Transaction sent."));
}

#[tokio::test]
async fn help_usage_and_unknown_commands() {
    let f = Fixture::new();
    f.dm(ALICE, "help").await;
    f.dm(ALICE, "transfer").await;
    f.dm(ALICE, "what can you do?").await;
    f.dm(ALICE, "yes").await;

    assert_eq!(
        f.transport.directs_to(ALICE),
        vec![
            replies::HELP.to_string(),
            replies::TRANSFER_USAGE.to_string(),
            replies::HELP.to_string(),
        ]
    );
    assert_eq!(f.node.request_count(), 0);
}

#[tokio::test]
async fn address_creates_an_account_once() {
    let f = Fixture::new();
    f.dm(ALICE, "address").await;
    f.dm(ALICE, "address").await;

    let replies = f.transport.directs_to(ALICE);
    assert_eq!(replies.len(), 2);
    assert!(replies[0].starts_with("Your NAS address is: n"));
    assert_eq!(replies[0], replies[1]);
    // Only the first lookup registers.
    assert_eq!(f.node.submissions().len(), 1);
}

#[tokio::test]
async fn balance_reports_registered_accounts_only() {
    let f = Fixture::new();
    f.dm(ALICE, "balance").await;
    assert_eq!(f.transport.directs_to(ALICE), vec![replies::NO_ACCOUNT.to_string()]);
    assert!(f.node.submissions().is_empty());

    let alice = f.funded(ALICE, 3).await;
    f.dm(ALICE, "balance").await;
    assert_eq!(
        f.transport.directs_to(ALICE)[1],
        format!("Your NAS address is: {alice}\nBalance: 3 NAS")
    );
}

#[tokio::test]
async fn run_fails_when_the_stream_ends() {
    let f = Fixture::new();
    let events = stream::iter(vec![Ok(Event::direct_message(ALICE, "alice", "help"))]);
    let result = f.bot.dispatcher().run(events).await;
    assert!(matches!(result, Err(BotError::StreamEnded)));
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let f = Fixture::new();
    let shutdown = ShutdownController::new();
    let trigger = async {
        tokio::task::yield_now().await;
        shutdown.shutdown();
    };
    let events = stream::pending::<Result<Event, TransportError>>();
    let (result, ()) = tokio::join!(f.bot.run(events, &shutdown), trigger);
    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn run_skips_malformed_event_lines() {
    let f = Fixture::new();
    let input = [
        r#"{"kind":"direct_message","message_id":1,"sender_id":1,"sender_handle":"alice","text":"help"}"#,
        r#"{"kind":"like","message_id":2,"sender_id":1,"sender_handle":"alice","text":"x"}"#,
        r#"{"kind":"direct_message","message_id":3,"sender_id":1,"sender_handle":"alice","text":"help"}"#,
    ]
    .join("\n");

    let result = f.bot.dispatcher().run(event_stream(input.as_bytes())).await;
    assert!(matches!(result, Err(BotError::StreamEnded)));

    // Replies are detached; let them finish.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        f.transport.directs_to(ALICE),
        vec![replies::HELP.to_string(), replies::HELP.to_string()]
    );
}

#[tokio::test]
async fn run_fails_on_transport_errors() {
    let f = Fixture::new();
    let events = stream::iter(vec![
        Err(TransportError::Closed),
        Ok(Event::direct_message(ALICE, "alice", "help")),
    ]);
    let result = f.bot.dispatcher().run(events).await;
    assert!(matches!(
        result,
        Err(BotError::Transport(TransportError::Closed))
    ));
}
