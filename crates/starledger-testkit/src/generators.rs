//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use starledger_core::{Chain, Keypair, WalletAddress};

use crate::fixtures::build_chain;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate the address of a random wallet.
pub fn wallet_address() -> impl Strategy<Value = WalletAddress> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate a reasonable Unix timestamp in seconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_000_000_000i64
}

fn star_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 .°'-]{0,24}".prop_map(Value::String),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

/// Generate a star document: a scalar or a flat object of scalars.
pub fn star() -> impl Strategy<Value = Value> {
    prop_oneof![
        star_leaf(),
        prop::collection::btree_map("[a-z]{1,8}", star_leaf(), 0..5)
            .prop_map(|fields| Value::Object(fields.into_iter().collect::<Map<_, _>>())),
    ]
}

/// Parameters for generating a chain.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub owners: Vec<WalletAddress>,
    /// Each star names its owner by index into `owners`.
    pub stars: Vec<(usize, Value)>,
    pub start_time: i64,
}

impl ChainParams {
    /// Build the chain these parameters describe.
    pub fn build(&self) -> Chain {
        let stars: Vec<_> = self
            .stars
            .iter()
            .map(|(owner, star)| (self.owners[*owner].clone(), star.clone()))
            .collect();
        build_chain(&stars, self.start_time)
    }
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(wallet_address(), 1..4),
            prop::collection::vec((any::<prop::sample::Index>(), star()), 0..16),
            0i64..=1_700_000_000i64,
        )
            .prop_map(|(owners, stars, start_time)| {
                let stars = stars
                    .into_iter()
                    .map(|(index, star)| (index.index(owners.len()), star))
                    .collect();
                ChainParams {
                    owners,
                    stars,
                    start_time,
                }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starledger_core::{challenge_message, validate_chain, OwnershipVerifier};

    proptest! {
        #[test]
        fn test_every_block_hash_is_self_consistent(params: ChainParams) {
            let chain = params.build();
            for block in chain.blocks() {
                prop_assert_eq!(block.compute_hash(), block.hash);
            }
        }

        #[test]
        fn test_links_and_heights(params: ChainParams) {
            let chain = params.build();
            prop_assert_eq!(chain.height(), Some(params.stars.len() as u64));
            prop_assert_eq!(chain.blocks()[0].previous_block_hash, None);

            for (position, block) in chain.blocks().iter().enumerate() {
                prop_assert_eq!(block.height, position as u64);
            }
            for pair in chain.blocks().windows(2) {
                prop_assert_eq!(pair[1].previous_block_hash, Some(pair[0].hash));
            }
            prop_assert!(validate_chain(&chain).is_empty());
        }

        #[test]
        fn test_validator_reports_tampered_block(
            params: ChainParams,
            index: prop::sample::Index,
        ) {
            prop_assume!(!params.stars.is_empty());
            let chain = params.build();
            let height = index.index(params.stars.len()) as u64 + 1;

            let tampered = crate::fixtures::tamper_block(&chain, height, |block| block.time += 1);
            let defects = validate_chain(&tampered);

            prop_assert_eq!(defects.len(), 1);
            prop_assert_eq!(defects[0].height(), height);
        }

        #[test]
        fn test_listing_matches_owner_counts(params: ChainParams) {
            let chain = params.build();
            for (owner_index, owner) in params.owners.iter().enumerate() {
                let expected: Vec<_> = params
                    .stars
                    .iter()
                    .filter(|(i, _)| params.owners[*i] == *owner)
                    .map(|(_, star)| star.clone())
                    .collect();
                let listing = chain.stars_owned_by(owner);
                let found: Vec<_> = listing.stars.into_iter().map(|r| r.star).collect();
                prop_assert_eq!(found, expected, "owner {}", owner_index);
            }
        }

        #[test]
        fn test_fresh_signature_verifies(
            kp in keypair(),
            issued_at in timestamp(),
            delay in 0i64..=300,
        ) {
            let message = challenge_message(&kp.address(), issued_at);
            let signature = kp.sign(message.as_bytes()).to_hex();
            prop_assert!(OwnershipVerifier::default()
                .verify_at(&message, &kp.address(), &signature, issued_at + delay)
                .is_ok());
        }

        #[test]
        fn test_stale_signature_expires(
            kp in keypair(),
            issued_at in timestamp(),
            delay in 301i64..=100_000,
        ) {
            let message = challenge_message(&kp.address(), issued_at);
            let signature = kp.sign(message.as_bytes()).to_hex();
            prop_assert!(OwnershipVerifier::default()
                .verify_at(&message, &kp.address(), &signature, issued_at + delay)
                .is_err());
        }
    }
}
