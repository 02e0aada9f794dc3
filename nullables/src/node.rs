//! Nullable node: an in-memory Nebulas node.
//!
//! Submitted transactions are decoded from their wire form and checked the
//! way the real node checks them (integrity, nonce, balance) before being
//! applied. `setAccount` calls against a known contract update that
//! contract's storage, either immediately or when [`NullNode::mine_pending`]
//! is called.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use nastip_rpc::{AccountState, CallRequest, CallResult, NodeRpc, RpcError, SubmitReceipt};
use nastip_transactions::{Payload, RawTransaction, Transaction};
use nastip_types::{Address, ChainId, NasAmount};

#[derive(Default)]
struct NodeState {
    accounts: HashMap<Address, AccountState>,
    contracts: HashMap<Address, HashMap<String, String>>,
    contract_owner: Option<Address>,
    submitted: Vec<Transaction>,
    pending_writes: Vec<(Address, String, String)>,
    requests: usize,
    call_override: Option<String>,
    fail_next_submission: Option<String>,
    mine_immediately: bool,
}

/// A test node that keeps accounts and contract storage in memory.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullNode {
    chain_id: ChainId,
    state: Mutex<NodeState>,
}

impl NullNode {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            state: Mutex::new(NodeState {
                mine_immediately: true,
                ..NodeState::default()
            }),
        }
    }

    /// Register a storage contract. Only `owner` may call it.
    pub fn deploy_key_contract(&self, contract: Address, owner: Address) {
        let mut state = self.state.lock().unwrap();
        state.contracts.entry(contract).or_default();
        state.contract_owner = Some(owner);
    }

    /// Write a slot directly, as if a `setAccount` had already been mined.
    pub fn store(&self, contract: Address, key: impl Into<String>, value: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .contracts
            .entry(contract)
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn stored(&self, contract: &Address, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .contracts
            .get(contract)
            .and_then(|slots| slots.get(key).cloned())
    }

    pub fn set_balance(&self, address: Address, balance: NasAmount) {
        let mut state = self.state.lock().unwrap();
        let entry = state.accounts.entry(address).or_insert(AccountState {
            balance: NasAmount::ZERO,
            nonce: 0,
        });
        entry.balance = balance;
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        let mut state = self.state.lock().unwrap();
        let entry = state.accounts.entry(address).or_insert(AccountState {
            balance: NasAmount::ZERO,
            nonce: 0,
        });
        entry.nonce = nonce;
    }

    pub fn state_of(&self, address: &Address) -> AccountState {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(address)
            .copied()
            .unwrap_or(AccountState {
                balance: NasAmount::ZERO,
                nonce: 0,
            })
    }

    /// Answer every subsequent `call` with this raw result string.
    pub fn set_call_result(&self, result: impl Into<String>) {
        self.state.lock().unwrap().call_override = Some(result.into());
    }

    /// Reject the next submission with `error`.
    pub fn fail_next_submission(&self, error: impl Into<String>) {
        self.state.lock().unwrap().fail_next_submission = Some(error.into());
    }

    /// When disabled, contract writes are accepted but only applied by
    /// [`NullNode::mine_pending`].
    pub fn set_mine_immediately(&self, mine: bool) {
        self.state.lock().unwrap().mine_immediately = mine;
    }

    pub fn mine_pending(&self) {
        let mut state = self.state.lock().unwrap();
        let writes = std::mem::take(&mut state.pending_writes);
        for (contract, key, value) in writes {
            state.contracts.entry(contract).or_default().insert(key, value);
        }
    }

    /// All accepted transactions, in submission order.
    pub fn submissions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Number of RPC requests of any kind received so far.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests
    }
}

fn first_string_args(args: &str) -> Result<Vec<String>, RpcError> {
    serde_json::from_str(args).map_err(|e| RpcError::Execution(format!("invalid args: {e}")))
}

#[async_trait]
impl NodeRpc for NullNode {
    async fn account_state(&self, address: &Address) -> Result<AccountState, RpcError> {
        self.state.lock().unwrap().requests += 1;
        Ok(self.state_of(address))
    }

    async fn call(&self, request: &CallRequest) -> Result<CallResult, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        if let Some(result) = &state.call_override {
            return Ok(CallResult {
                result: result.clone(),
                ..CallResult::default()
            });
        }
        if state.contract_owner.is_some_and(|owner| owner != request.from) {
            return Err(RpcError::Execution("Error: unauthorized".into()));
        }
        let slots = state
            .contracts
            .get(&request.to)
            .ok_or_else(|| RpcError::Execution("contract not found".into()))?;

        match request.contract.function.as_str() {
            "getAccount" => {
                let args = first_string_args(&request.contract.args)?;
                let key = args.first().map(String::as_str).unwrap_or_default();
                let result = match slots.get(key) {
                    Some(value) => serde_json::Value::String(value.clone()).to_string(),
                    None => "null".to_string(),
                };
                Ok(CallResult {
                    result,
                    estimate_gas: "20000".into(),
                    ..CallResult::default()
                })
            }
            "setAccount" => Ok(CallResult {
                result: "\"\"".into(),
                ..CallResult::default()
            }),
            other => Err(RpcError::Execution(format!("function {other} not found"))),
        }
    }

    async fn send_raw_transaction(&self, raw: &RawTransaction) -> Result<SubmitReceipt, RpcError> {
        let tx = Transaction::from_raw(raw).map_err(|e| RpcError::Remote(e.to_string()))?;
        tx.verify_integrity(self.chain_id)
            .map_err(|e| RpcError::Remote(e.to_string()))?;

        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        if let Some(error) = state.fail_next_submission.take() {
            return Err(RpcError::Remote(error));
        }

        let sender = state.accounts.get(tx.from()).copied().unwrap_or(AccountState {
            balance: NasAmount::ZERO,
            nonce: 0,
        });
        if tx.nonce() != sender.nonce + 1 {
            return Err(RpcError::Remote(format!(
                "transaction's nonce is invalid, should bigger than the from's nonce {}",
                sender.nonce
            )));
        }
        if tx.value() > sender.balance {
            return Err(RpcError::Remote("insufficient balance".into()));
        }

        if let Ok(Payload::Call(call)) = tx.payload() {
            if call.function == "setAccount" && state.contracts.contains_key(tx.to()) {
                let args = first_string_args(&call.args)?;
                if let [key, value] = args.as_slice() {
                    let write = (*tx.to(), key.clone(), value.clone());
                    if state.mine_immediately {
                        state.contracts.entry(write.0).or_default().insert(write.1, write.2);
                    } else {
                        state.pending_writes.push(write);
                    }
                }
            }
        }

        let remaining = NasAmount::from_wei(sender.balance.wei() - tx.value().wei());
        state.accounts.insert(
            *tx.from(),
            AccountState {
                balance: remaining,
                nonce: tx.nonce(),
            },
        );
        let receiver = state.accounts.entry(*tx.to()).or_insert(AccountState {
            balance: NasAmount::ZERO,
            nonce: 0,
        });
        receiver.balance = NasAmount::from_wei(receiver.balance.wei().saturating_add(tx.value().wei()));

        let tx_hash = tx.hash();
        state.submitted.push(tx);
        Ok(SubmitReceipt { tx_hash })
    }
}
