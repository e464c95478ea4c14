//! end-to-end scenarios across the whole core

use k256::elliptic_curve::Field;
use k256::Scalar;
use rand::rngs::OsRng;

use crate::bank::{Bank, MintPolicy, DEFAULT_TOKEN_TTL};
use crate::commitment::commit;
use crate::curve::random_scalar;
use crate::device::{BankAuthority, DeviceCertificate, DeviceIdentity};
use crate::state::ProofState;
use crate::token::TokenState;
use crate::transaction::{
    accept_offline_transaction, authorize_spend, verify_offline_transaction, ReceiverState,
};
use crate::wallet::TokenLifecycle;
use crate::zkp::{
    prove_minting, verify_minting, verify_recursive_invariant, ALLOWED_DENOMINATIONS,
};
use crate::Error;

const NOW: u64 = 1_700_000_000;

struct Network {
    bank: Bank,
    authority: BankAuthority,
    device: DeviceIdentity,
    certificate: DeviceCertificate,
    wallet: TokenLifecycle,
}

fn setup() -> Network {
    let mut rng = OsRng;
    let bank = Bank::generate(MintPolicy::default(), &mut rng);
    let authority = BankAuthority::generate(&mut rng).unwrap();
    let device = DeviceIdentity::generate(&mut rng).unwrap();
    let certificate = authority
        .issue_device_certificate(
            &device.pk_device,
            b"device-001",
            NOW,
            NOW + 365 * 24 * 60 * 60,
            &mut rng,
        )
        .unwrap();

    Network {
        bank,
        authority,
        device,
        certificate,
        wallet: TokenLifecycle::new(),
    }
}

#[test]
fn test_mint_then_verify() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(20, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();

    assert_eq!(
        net.wallet.store.get_token_state(&token.serial).unwrap(),
        TokenState::Unspent
    );
    assert!(token.verify_bank_signature(net.bank.verifying_key()));
    assert_eq!(token.expiry, NOW + DEFAULT_TOKEN_TTL);
    assert_eq!(net.wallet.store.get_unspent_tokens(NOW).len(), 1);
}

#[test]
fn test_offline_spend_end_to_end() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(50, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    let bundle = net
        .wallet
        .spend(&token.serial, 30, 20, NOW + 1_000, NOW, &mut rng)
        .unwrap();

    let values: Vec<u64> = bundle.tokens.iter().map(|t| t.v).collect();
    assert_eq!(values, vec![30, 20]);
    assert_eq!(
        net.wallet.store.get_token_state(&token.serial).unwrap(),
        TokenState::Spent
    );
    assert!(verify_recursive_invariant(
        &net.wallet.proof_state,
        &bundle.recursive_proof
    ));

    // device authorizes, receiver verifies and accepts
    let tx = authorize_spend(
        &bundle,
        &net.device,
        net.certificate.clone(),
        &[11u8; 32],
        NOW,
        &mut rng,
    )
    .unwrap();

    let mut receiver = ReceiverState::new();
    receiver.proof_state = Some(ProofState::new());

    assert!(verify_offline_transaction(
        &tx,
        &net.authority.pk_bank,
        &receiver.seen_nullifiers,
        NOW,
    ));
    accept_offline_transaction(&tx, &mut receiver).unwrap();

    assert_eq!(receiver.owned_tokens.len(), 2);
    assert_eq!(receiver.seen_nullifiers.len(), 1);
}

#[test]
fn test_double_spend_refused_both_sides() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(50, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    let bundle = net
        .wallet
        .spend(&token.serial, 30, 20, NOW + 1_000, NOW, &mut rng)
        .unwrap();

    // sender side: same input serial cannot be spent again
    assert!(matches!(
        net.wallet.spend(&token.serial, 30, 20, NOW + 1_000, NOW, &mut rng),
        Err(Error::NotSpendable)
    ));

    // receiver side: the same transaction is rejected on second delivery
    let tx = authorize_spend(
        &bundle,
        &net.device,
        net.certificate.clone(),
        &[17u8; 32],
        NOW,
        &mut rng,
    )
    .unwrap();

    let mut receiver = ReceiverState::new();
    assert!(verify_offline_transaction(
        &tx,
        &net.authority.pk_bank,
        &receiver.seen_nullifiers,
        NOW,
    ));
    accept_offline_transaction(&tx, &mut receiver).unwrap();

    assert!(!verify_offline_transaction(
        &tx,
        &net.authority.pk_bank,
        &receiver.seen_nullifiers,
        NOW,
    ));
}

#[test]
fn test_denomination_proof_hides_value() {
    let mut rng = OsRng;

    // same blinding factor, different denominations: both verify, and the
    // proof shape is identical across branches
    let r = random_scalar(&mut rng);

    let c_small = commit(5, &r);
    let proof_small = prove_minting(5, &r, &c_small, &mut rng).unwrap();
    assert!(verify_minting(&c_small, &proof_small));

    let c_large = commit(100, &r);
    let proof_large = prove_minting(100, &r, &c_large, &mut rng).unwrap();
    assert!(verify_minting(&c_large, &proof_large));

    // every branch carries a full (a, z1, z2, e) tuple; nothing structural
    // marks the real denomination
    assert_eq!(proof_small.branches.len(), ALLOWED_DENOMINATIONS.len());
    assert_eq!(proof_large.branches.len(), ALLOWED_DENOMINATIONS.len());
    for branch in proof_small.branches.iter().chain(&proof_large.branches) {
        assert_ne!(branch.e, Scalar::ZERO);
    }
}

#[test]
fn test_value_mismatch_rejected_end_to_end() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(50, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    // 40 + 20 != 50
    assert!(matches!(
        net.wallet.spend(&token.serial, 40, 20, NOW + 1_000, NOW, &mut rng),
        Err(Error::InvalidInput(_))
    ));
    assert_eq!(
        net.wallet.store.get_token_state(&token.serial).unwrap(),
        TokenState::Unspent
    );
}

#[test]
fn test_tamper_detection() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(50, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    let bundle = net
        .wallet
        .spend(&token.serial, 30, 20, NOW + 1_000, NOW, &mut rng)
        .unwrap();

    // tampering with the value proof is caught by the receiver
    let tx = authorize_spend(
        &bundle,
        &net.device,
        net.certificate.clone(),
        &[23u8; 32],
        NOW,
        &mut rng,
    )
    .unwrap();
    let mut tampered = tx.clone();
    tampered.value_bundle.proof.z_r += Scalar::ONE;
    let receiver = ReceiverState::new();
    assert!(!verify_offline_transaction(
        &tampered,
        &net.authority.pk_bank,
        &receiver.seen_nullifiers,
        NOW,
    ));

    // negating a point in the proof-state breaks the recursive invariant
    let mut state = net.wallet.proof_state.clone();
    state.c_out_total = -state.c_out_total;
    assert!(!verify_recursive_invariant(&state, &bundle.recursive_proof));
}

#[test]
fn test_expired_certificate_blocks_authorization() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(50, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    let bundle = net
        .wallet
        .spend(&token.serial, 30, 20, NOW + 1_000, NOW, &mut rng)
        .unwrap();

    // sender refuses to authorize under an expired certificate
    let expired = net.certificate.expires_at + 1;
    assert!(matches!(
        authorize_spend(
            &bundle,
            &net.device,
            net.certificate.clone(),
            &[5u8; 32],
            expired,
            &mut rng,
        ),
        Err(Error::ExpiredCertificate)
    ));

    // a receiver at that time rejects even a previously signed transaction
    let tx = authorize_spend(
        &bundle,
        &net.device,
        net.certificate.clone(),
        &[5u8; 32],
        NOW,
        &mut rng,
    )
    .unwrap();
    let receiver = ReceiverState::new();
    assert!(!verify_offline_transaction(
        &tx,
        &net.authority.pk_bank,
        &receiver.seen_nullifiers,
        expired,
    ));
}

#[test]
fn test_received_tokens_are_spendable_onward() {
    let mut rng = OsRng;
    let mut net = setup();

    let key = *net.bank.verifying_key();
    let token = net
        .wallet
        .mint(100, &mut net.bank, &key, NOW, &mut rng)
        .unwrap();
    net.wallet.proof_state = ProofState::init_from_mint(std::slice::from_ref(&token));

    let bundle = net
        .wallet
        .spend(&token.serial, 60, 40, NOW + 1_000, NOW, &mut rng)
        .unwrap();

    // the receiver imports the transferred token into its own wallet and
    // spends it onward
    let received = bundle.tokens[0].clone();
    let mut receiver_wallet = TokenLifecycle::new();
    receiver_wallet.store.add_token(received.clone()).unwrap();
    receiver_wallet.proof_state =
        ProofState::init_from_mint(std::slice::from_ref(&received));

    let onward = receiver_wallet
        .spend(&received.serial, 25, 35, NOW + 2_000, NOW, &mut rng)
        .unwrap();
    assert!(verify_recursive_invariant(
        &receiver_wallet.proof_state,
        &onward.recursive_proof
    ));
}
