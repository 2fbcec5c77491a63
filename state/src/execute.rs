// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! Ordered application of transactions to a state root.
//!
//! This is the commit half of the snapshot-read contract: [`apply`] never
//! touches the snapshot it was given. It returns the root to adopt together
//! with the transaction's receipt. A soft failure (stale nonce, execution
//! fault, dispatch mismatch) still yields a new root, with the sender's
//! nonce bumped where the nonce matched, but no other state change.

use crate::contract::{CallContext, CallError, ContractState, Fault, MethodCall};
use crate::receipt::Receipt;
use crate::root::StateRoot;
use crate::transaction::Transaction;

/// Apply one transaction against `root`, returning the successor root and
/// the receipt. The input snapshot is never mutated.
pub fn apply(root: &StateRoot, tx: &Transaction) -> (StateRoot, Receipt) {
    let mut next = root.clone();
    next.advance_epoch();

    let sender = match next.get_actor(&tx.from) {
        Ok(actor) => actor.clone(),
        Err(e) => return (next, Receipt::soft_failure(e.to_string())),
    };

    // At most one transaction per nonce value per sender.
    if tx.nonce != sender.nonce {
        let fault = Fault::StaleNonce {
            expected: sender.nonce,
            got: tx.nonce,
        };
        return (next, Receipt::soft_failure(fault.to_string()));
    }

    // The nonce matched, so the transaction is accepted whatever its method
    // does; from here on every failure is soft and costs the sender a nonce.
    if let Err(e) = next.bump_nonce(&tx.from) {
        return (next, Receipt::soft_failure(e.to_string()));
    }

    match execute(&mut next, tx) {
        Ok(receipt) => (next, receipt),
        Err(e) => {
            // Discard the faulted scratch, keep only the nonce bump.
            let mut rolled_back = root.clone();
            rolled_back.advance_epoch();
            if let Err(e) = rolled_back.bump_nonce(&tx.from) {
                return (rolled_back, Receipt::soft_failure(e.to_string()));
            }
            (rolled_back, Receipt::soft_failure(e.to_string()))
        }
    }
}

fn execute(next: &mut StateRoot, tx: &Transaction) -> Result<Receipt, CallError> {
    let recipient = next.get_actor(&tx.to)?.clone();
    let contract = next.get_contract(&recipient.code)?;
    let mut state = next.load_contract_state(&recipient.code, recipient.memory.as_ref())?;
    let call = MethodCall::parse(&contract, &tx.method, &tx.params)?;

    let epoch = next.epoch();
    let ret = {
        let mut cctx = CallContext::transacting(tx.from, epoch, next);
        contract.apply(&mut cctx, &mut state, &call)?
    };

    // Persist the method's state changes, except for the account contract
    // which has no memory.
    if !matches!(state, ContractState::Account) {
        next.set_actor_memory(&tx.to, &state)?;
    }
    Ok(Receipt::ok(ret))
}
