use std::sync::Arc;
use std::time::Duration;

use nastip_crypto::{parse_address, KeyCipher};
use nastip_nullables::NullNode;
use nastip_types::{ChainId, NasAmount, UserId};
use nastip_vault::{Account, EncryptedKeyRecord, Vault, VaultConfig, VaultError};

const CONTRACT: &str = "n1kWMooMHDAnLQXe6pLdZ6xDRBXCVJHuPcJ";
const SECRET: &[u8; 16] = b"0123456789abcdef";

struct Fixture {
    node: Arc<NullNode>,
    vault: Vault,
    contract: nastip_types::Address,
}

fn fixture() -> Fixture {
    let node = Arc::new(NullNode::new(ChainId::MAINNET));
    let contract = parse_address(CONTRACT).unwrap();
    let bot = Account::generate();
    node.deploy_key_contract(contract, *bot.address());
    let vault = Vault::new(
        node.clone(),
        KeyCipher::new(SECRET).unwrap(),
        bot,
        VaultConfig::new(ChainId::MAINNET, contract),
    )
    .unwrap();
    Fixture {
        node,
        vault,
        contract,
    }
}

#[tokio::test]
async fn first_lookup_generates_and_registers() {
    let f = fixture();
    let resolved = f.vault.resolve_account(UserId(42), UserId(42)).await.unwrap();
    assert!(resolved.created);
    assert_eq!(resolved.nonce, 0);

    let submissions = f.node.submissions();
    assert_eq!(submissions.len(), 1);
    let tx = &submissions[0];
    assert_eq!(tx.from(), f.vault.bot_address());
    assert_eq!(tx.to(), &f.contract);
    assert_eq!(tx.nonce(), 1);

    let stored = f.node.stored(&f.contract, "42").unwrap();
    let reopened = EncryptedKeyRecord::from_stored(stored)
        .open(&KeyCipher::new(SECRET).unwrap())
        .unwrap();
    assert_eq!(reopened.address(), resolved.account.address());
}

#[tokio::test]
async fn second_lookup_returns_same_account_with_nonce() {
    let f = fixture();
    let first = f.vault.resolve_account(UserId(7), UserId(7)).await.unwrap();
    f.node.set_nonce(*first.account.address(), 12);

    let second = f.vault.resolve_account(UserId(7), UserId(8)).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.account.address(), first.account.address());
    assert_eq!(second.nonce, 12);
    assert_eq!(f.node.submissions().len(), 1);
}

#[tokio::test]
async fn lookup_during_unmined_registration_is_retryable() {
    let f = fixture();
    f.node.set_mine_immediately(false);
    f.vault.resolve_account(UserId(3), UserId(3)).await.unwrap();

    let err = f.vault.resolve_account(UserId(3), UserId(4)).await.unwrap_err();
    assert!(matches!(err, VaultError::GenerationInProgress(UserId(3))));
    assert!(err.is_retryable());
    assert_eq!(f.node.submissions().len(), 1);

    f.node.mine_pending();
    let resolved = f.vault.resolve_account(UserId(3), UserId(3)).await.unwrap();
    assert!(!resolved.created);
}

#[tokio::test]
async fn concurrent_first_lookups_register_once() {
    let f = Arc::new(fixture());
    f.node.set_mine_immediately(false);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let f = Arc::clone(&f);
        handles.push(tokio::spawn(async move {
            f.vault.resolve_account(UserId(11), UserId(11)).await
        }));
    }
    let mut created = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(resolved) => {
                assert!(resolved.created);
                created += 1;
            }
            Err(e) => assert!(matches!(e, VaultError::GenerationInProgress(_))),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(f.node.submissions().len(), 1);
}

#[tokio::test]
async fn failed_registration_releases_lock() {
    let f = fixture();
    f.node.fail_next_submission("insufficient gas");

    let err = f.vault.resolve_account(UserId(5), UserId(5)).await.unwrap_err();
    assert!(matches!(err, VaultError::Rpc(_)));
    assert!(!f.vault.generation_lock().is_held(UserId(5)).await);

    let resolved = f.vault.resolve_account(UserId(5), UserId(5)).await.unwrap();
    assert!(resolved.created);
}

#[tokio::test]
async fn malformed_record_is_decode_error() {
    let f = fixture();
    f.node.set_call_result(r#"{"account":12}"#);
    let err = f.vault.resolve_account(UserId(1), UserId(1)).await.unwrap_err();
    assert!(matches!(err, VaultError::Decode(_)));
    assert!(f.node.submissions().is_empty());
}

#[tokio::test]
async fn corrupt_ciphertext_is_rejected() {
    let f = fixture();
    f.node.store(f.contract, "9", "abcd");
    let err = f.vault.resolve_account(UserId(9), UserId(9)).await.unwrap_err();
    assert!(matches!(err, VaultError::Crypto(_)));
}

#[tokio::test]
async fn balance_of_registered_user() {
    let f = fixture();
    let resolved = f.vault.resolve_account(UserId(20), UserId(20)).await.unwrap();
    f.node.set_balance(*resolved.account.address(), NasAmount::from_nas(3));

    let (address, balance) = f.vault.account_balance(UserId(20)).await.unwrap();
    assert_eq!(&address, resolved.account.address());
    assert_eq!(balance, NasAmount::from_nas(3));
}

#[tokio::test]
async fn balance_of_unknown_user_is_not_registered() {
    let f = fixture();
    assert!(matches!(
        f.vault.account_balance(UserId(77)).await,
        Err(VaultError::NotRegistered(UserId(77)))
    ));
}

#[tokio::test(start_paused = true)]
async fn lock_expires_after_window() {
    let f = fixture();
    f.node.set_mine_immediately(false);
    f.vault.resolve_account(UserId(30), UserId(30)).await.unwrap();
    assert!(f.vault.generation_lock().is_held(UserId(30)).await);

    tokio::time::advance(Duration::from_secs(91)).await;
    assert!(!f.vault.generation_lock().is_held(UserId(30)).await);
}

#[test]
fn contract_must_be_contract_address() {
    let node = Arc::new(NullNode::new(ChainId::MAINNET));
    let not_contract = *Account::generate().address();
    let result = Vault::new(
        node,
        KeyCipher::new(SECRET).unwrap(),
        Account::generate(),
        VaultConfig::new(ChainId::MAINNET, not_contract),
    );
    assert!(matches!(result, Err(VaultError::NotAContract(_))));
}
