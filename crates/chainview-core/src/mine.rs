use crate::pow::count_leading_zero_digits;
use crate::{block_hash, Block, Transaction};
use rayon::prelude::*;
use tracing::info;

/// Mines a block by searching nonces in parallel until a hash has at least
/// `difficulty` leading zero digits. Returns the mined block.
pub fn mine_block_parallel(
    index: u64,
    transactions: Vec<Transaction>,
    timestamp: u64,
    previous_hash: String,
    difficulty: usize,
) -> Block {
    // Rayon splits the nonce range across threads; each attempt rehashes the
    // fixed fields with its candidate nonce.
    let found = (0u64..u64::MAX)
        .into_par_iter()
        .find_any(|nonce| {
            let hash = block_hash(index, *nonce, &previous_hash, timestamp, &transactions);
            count_leading_zero_digits(&hash) >= difficulty
        })
        .expect("nonce space exhausted (practically impossible)");

    let mut block = Block::new(index, transactions, timestamp, previous_hash);
    block.nonce = found;
    block.hash = block.compute_hash();

    info!(
        "mined block {} with nonce {} and hash {}",
        block.index, block.nonce, block.hash
    );
    block
}
