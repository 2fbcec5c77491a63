// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT
#[cfg(test)]
mod tests {
    use more_asserts::assert_gt;

    use garner_provider::tx::{TxProvider, WaitOptions};
    use garner_sdk::account::Account;
    use garner_sdk::TxParams;
    use garner_state::address::Address;
    use garner_wallet::Sender;

    use crate::test_utils;

    #[tokio::test]
    async fn fresh_account_sequence_is_zero() {
        let (provider, wallets) = test_utils::fresh_chain();
        let sequence = Account::sequence(&provider, &wallets[0].address())
            .await
            .unwrap();
        assert_eq!(sequence, 0);

        let stranger = Address::new_random(&mut rand::thread_rng());
        assert!(Account::sequence(&provider, &stranger).await.is_err());
    }

    #[tokio::test]
    async fn balance_distinguishes_missing_entry_from_zero() {
        let (provider, wallets) = test_utils::fresh_chain();
        let balance = Account::balance(&provider, &wallets[0].address())
            .await
            .unwrap();
        assert_gt!(balance, 0);

        // An address the ledger has never seen is an error, not zero.
        let stranger = Address::new_random(&mut rand::thread_rng());
        assert!(Account::balance(&provider, &stranger).await.is_err());
    }

    #[tokio::test]
    async fn transfer_moves_funds() {
        let (provider, mut wallets) = test_utils::fresh_chain();
        let to = wallets[1].address();
        let funded = Account::balance(&provider, &wallets[0].address())
            .await
            .unwrap();

        let receipt = Account::transfer_and_wait(
            &provider,
            &mut wallets[0],
            to,
            100,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();
        assert!(receipt.success, "{}", receipt.info);

        let from_balance = Account::balance(&provider, &wallets[0].address())
            .await
            .unwrap();
        let to_balance = Account::balance(&provider, &to).await.unwrap();
        assert_eq!(from_balance, funded - 100);
        assert_eq!(to_balance, funded + 100);
        assert_eq!(
            Account::sequence(&provider, &wallets[0].address())
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn insufficient_transfer_soft_fails_and_moves_nothing() {
        let (provider, mut wallets) = test_utils::fresh_chain();
        let to = wallets[1].address();
        let funded = Account::balance(&provider, &wallets[0].address())
            .await
            .unwrap();

        let receipt = Account::transfer_and_wait(
            &provider,
            &mut wallets[0],
            to,
            funded + 1,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();
        assert!(!receipt.success);
        assert!(receipt.info.contains("insufficient balance"));

        // Both balances are unchanged; the failed attempt still cost a nonce.
        let from_balance = Account::balance(&provider, &wallets[0].address())
            .await
            .unwrap();
        let to_balance = Account::balance(&provider, &to).await.unwrap();
        assert_eq!(from_balance, funded);
        assert_eq!(to_balance, funded);
        assert_eq!(
            Account::sequence(&provider, &wallets[0].address())
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn receipt_observation_is_idempotent() {
        let (provider, mut wallets) = test_utils::fresh_chain();
        let to = wallets[1].address();

        let tx = Account::transfer(&provider, &mut wallets[0], to, 10, TxParams::default())
            .await
            .unwrap();
        let first = provider
            .wait_for_receipt(tx, WaitOptions::default())
            .await
            .unwrap();
        let second = provider
            .wait_for_receipt(tx, WaitOptions::default())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn same_sequence_is_accepted_at_most_once() {
        let (provider, mut wallets) = test_utils::fresh_chain();
        let to = wallets[1].address();
        let pinned = TxParams { sequence: Some(0) };

        let a = Account::transfer(&provider, &mut wallets[0], to, 100, pinned.clone())
            .await
            .unwrap();
        let b = Account::transfer(&provider, &mut wallets[0], to, 200, pinned)
            .await
            .unwrap();

        let ra = provider.wait_for_receipt(a, WaitOptions::default()).await.unwrap();
        let rb = provider.wait_for_receipt(b, WaitOptions::default()).await.unwrap();
        assert!(ra.success != rb.success, "exactly one may win the nonce");
        assert_eq!(
            Account::sequence(&provider, &wallets[0].address())
                .await
                .unwrap(),
            1
        );
    }
}
