// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT
#[cfg(test)]
mod tests {
    use garner_provider::tx::{TxProvider, WaitOptions};
    use garner_provider::{LocalConfig, LocalProvider};
    use garner_sdk::account::Account;
    use garner_sdk::market::Market;
    use garner_sdk::miner::Miner;
    use garner_sdk::TxParams;
    use garner_state::address::Address;
    use garner_state::encoding::Cid;
    use garner_wallet::{Sender, Wallet};

    use crate::test_utils;

    #[tokio::test]
    async fn bid_round_trip() {
        let (provider, mut wallets) = test_utils::fresh_chain();

        let tx = Market::add_bid(&provider, &mut wallets[0], 10, 100, TxParams::default())
            .await
            .unwrap();
        let receipt = provider
            .wait_for_receipt(tx, WaitOptions::default())
            .await
            .unwrap();
        assert!(receipt.success, "{}", receipt.info);

        let bids = Market::list_bids(&provider).await.unwrap();
        assert_eq!(bids.len(), 1);
        let (id, bid) = &bids[0];
        assert_eq!(*id, 0);
        assert_eq!(bid.owner, wallets[0].address());
        assert_eq!(bid.price, 10);
        assert_eq!(bid.size, 100);
        assert_eq!(bid.collateral, 1000);
    }

    #[tokio::test]
    async fn miner_creation_moves_the_pledge() {
        let (provider, mut wallets) = test_utils::fresh_chain();
        let owner = wallets[0].address();
        let funded = Account::balance(&provider, &owner).await.unwrap();

        let miner = Miner::create(
            &provider,
            &mut wallets[0],
            400,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();

        let info = miner.info(&provider).await.unwrap();
        assert_eq!(info.owner, owner);
        assert_eq!(info.pledge, 400);
        assert_eq!(Account::balance(&provider, &owner).await.unwrap(), funded - 400);
        assert_eq!(
            Account::balance(&provider, &miner.address()).await.unwrap(),
            400
        );
    }

    #[tokio::test]
    async fn ask_requires_a_registered_miner() {
        let (provider, mut wallets) = test_utils::fresh_chain();

        let impostor = Address::new_random(&mut rand::thread_rng());
        let tx = Market::add_ask(
            &provider,
            &mut wallets[0],
            impostor,
            5,
            512,
            TxParams::default(),
        )
        .await
        .unwrap();
        let receipt = provider
            .wait_for_receipt(tx, WaitOptions::default())
            .await
            .unwrap();
        assert!(!receipt.success);
        assert!(receipt.info.contains("not registered"));
        assert!(Market::list_asks(&provider).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deal_consumes_orders_exactly_once() {
        let (provider, wallets) = test_utils::fresh_chain();
        let mut seller = wallets[0].clone();
        let mut buyer = wallets[1].clone();

        let miner = Miner::create(
            &provider,
            &mut seller,
            100,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();

        let ask_tx = Market::add_ask(
            &provider,
            &mut seller,
            miner.address(),
            2,
            512,
            TxParams::default(),
        )
        .await
        .unwrap();
        let bid_tx = Market::add_bid(&provider, &mut buyer, 2, 512, TxParams::default())
            .await
            .unwrap();
        for tx in [ask_tx, bid_tx] {
            let receipt = provider
                .wait_for_receipt(tx, WaitOptions::default())
                .await
                .unwrap();
            assert!(receipt.success, "{}", receipt.info);
        }

        let payload = b"the stored data";
        let deal = Market::make_deal(
            &provider,
            &mut buyer,
            0,
            0,
            payload,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(deal.data, Cid::from_content(payload));

        let deals = Market::list_deals(&provider).await.unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].bid, 0);
        assert_eq!(deals[0].ask, 0);
        assert_eq!(deals[0].data, deal.data);

        // The matched pair is consumed.
        assert!(Market::list_bids(&provider).await.unwrap().is_empty());
        assert!(Market::list_asks(&provider).await.unwrap().is_empty());

        // A second match against either order fails.
        let err = Market::make_deal(
            &provider,
            &mut buyer,
            0,
            0,
            payload,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not live"));
        assert_eq!(Market::list_deals(&provider).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn expired_ask_cannot_be_matched() {
        // A one-epoch TTL: the ask expires before a deal can reach it.
        let mut wallet = Wallet::new_random(&mut rand::thread_rng());
        let provider = LocalProvider::new(LocalConfig {
            accounts: vec![(wallet.address(), 1000)],
            ask_ttl: 1,
            ..Default::default()
        })
        .unwrap();

        let miner = Miner::create(
            &provider,
            &mut wallet,
            100,
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap();
        let ask_tx = Market::add_ask(
            &provider,
            &mut wallet,
            miner.address(),
            2,
            512,
            TxParams::default(),
        )
        .await
        .unwrap();
        let bid_tx = Market::add_bid(&provider, &mut wallet, 2, 512, TxParams::default())
            .await
            .unwrap();
        for tx in [ask_tx, bid_tx] {
            let receipt = provider
                .wait_for_receipt(tx, WaitOptions::default())
                .await
                .unwrap();
            assert!(receipt.success, "{}", receipt.info);
        }

        let err = Market::make_deal(
            &provider,
            &mut wallet,
            0,
            0,
            b"too late",
            TxParams::default(),
            WaitOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("expired"));

        // The failed match consumed nothing.
        assert_eq!(Market::list_bids(&provider).await.unwrap().len(), 1);
        assert_eq!(Market::list_asks(&provider).await.unwrap().len(), 1);
    }
}
