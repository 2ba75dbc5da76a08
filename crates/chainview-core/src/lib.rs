use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod constants;
pub mod mine;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

/// One record in the chain. Field order matches the exported JSON document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub timestamp: u64,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        timestamp: u64,
        previous_hash: String,
    ) -> Self {
        let mut block = Self {
            index,
            transactions,
            timestamp,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash();
        block
    }

    pub fn compute_hash(&self) -> String {
        block_hash(
            self.index,
            self.nonce,
            &self.previous_hash,
            self.timestamp,
            &self.transactions,
        )
    }
}

/// SHA-256 over the canonical JSON form of the hashed block fields.
/// The stored hash itself is never part of the input.
pub fn block_hash(
    index: u64,
    nonce: u64,
    previous_hash: &str,
    timestamp: u64,
    transactions: &[Transaction],
) -> String {
    let payload = json!({
        "index": index,
        "nonce": nonce,
        "previous_hash": previous_hash,
        "timestamp": timestamp,
        "transactions": transactions,
    });
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(&payload).as_bytes());
    hex::encode(hasher.finalize())
}

/// Compact JSON with object keys sorted recursively, so equal values hash to
/// equal digests regardless of field order.
pub fn canonical_json(value: &Value) -> String {
    fn sorted(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let mut out = Map::new();
                for key in keys {
                    out.insert(key.clone(), sorted(&map[key]));
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
            other => other.clone(),
        }
    }
    sorted(value).to_string()
}

pub mod pow {
    use super::Block;

    /// Mine the block by incrementing the nonce until the hex hash carries at
    /// least `difficulty` leading zero digits.
    pub fn mine_block(mut block: Block, difficulty: usize) -> Block {
        loop {
            if count_leading_zero_digits(&block.hash) >= difficulty {
                return block;
            }
            block.nonce = block.nonce.wrapping_add(1);
            block.hash = block.compute_hash();
        }
    }

    pub fn count_leading_zero_digits(hash_hex: &str) -> usize {
        hash_hex.bytes().take_while(|b| *b == b'0').count()
    }
}

pub mod chain {
    use super::*;
    use anyhow::Result;
    use tracing::info;

    pub struct Blockchain {
        chain: Vec<Block>,
        difficulty: usize,
        pending_transactions: Vec<Transaction>,
    }

    impl Blockchain {
        /// Start a chain with its genesis block. Genesis is never mined.
        pub fn new(difficulty: usize) -> Self {
            Self {
                chain: vec![genesis_block()],
                difficulty,
                pending_transactions: Vec::new(),
            }
        }

        pub fn blocks(&self) -> &[Block] {
            &self.chain
        }

        pub fn latest_block(&self) -> &Block {
            self.chain.last().expect("chain always holds genesis")
        }

        pub fn difficulty(&self) -> usize {
            self.difficulty
        }

        pub fn pending_transactions(&self) -> &[Transaction] {
            &self.pending_transactions
        }

        pub fn add_transaction(
            &mut self,
            sender: impl Into<String>,
            recipient: impl Into<String>,
            amount: u64,
        ) {
            self.pending_transactions.push(Transaction {
                sender: sender.into(),
                recipient: recipient.into(),
                amount,
            });
        }

        /// Drain the pending pool into a new mined block and append it.
        pub fn add_block(&mut self) -> &Block {
            let txs = std::mem::take(&mut self.pending_transactions);
            let block = Block::new(
                self.chain.len() as u64,
                txs,
                now_secs(),
                self.latest_block().hash.clone(),
            );
            let mined = pow::mine_block(block, self.difficulty);
            info!(
                "mined block {} with nonce {} and hash {}",
                mined.index, mined.nonce, mined.hash
            );
            self.chain.push(mined);
            self.latest_block()
        }

        /// Same as `add_block`, searching the nonce space across threads.
        pub fn add_block_parallel(&mut self) -> &Block {
            let txs = std::mem::take(&mut self.pending_transactions);
            let mined = mine::mine_block_parallel(
                self.chain.len() as u64,
                txs,
                now_secs(),
                self.latest_block().hash.clone(),
                self.difficulty,
            );
            self.chain.push(mined);
            self.latest_block()
        }

        /// Export the chain as a pretty-printed JSON array of blocks.
        pub fn to_json(&self) -> Result<String> {
            Ok(serde_json::to_string_pretty(&self.chain)?)
        }
    }

    impl Default for Blockchain {
        fn default() -> Self {
            Self::new(constants::DEFAULT_DIFFICULTY)
        }
    }

    /// Index 0, no transactions, previous hash "0", nonce 0.
    pub fn genesis_block() -> Block {
        Block::new(0, vec![], now_secs(), constants::GENESIS_PREVIOUS_HASH.to_string())
    }

    pub(crate) fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_secs()
    }
}
