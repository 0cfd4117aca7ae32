// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use devlink_env_core::{FormatOptions, Formatter, Parser};
use devlink_env_crypto::{CryptoError, EncryptedEnvelope, EncryptionManager};

const CODE: &str = "happy-tiger-42";

fn manager() -> EncryptionManager {
	EncryptionManager::with_iterations(2_000)
}

#[test]
fn test_document_survives_the_wire() {
	let doc = Parser::new()
		.parse_content("DATABASE_URL=postgres://db/app\nAPI_KEY=sk-live-abcdef\nPORT=8080\n", "app.env")
		.unwrap();

	let wire = manager().encrypt_document(&doc, CODE).unwrap().to_json().unwrap();
	assert!(!wire.contains("sk-live-abcdef"));

	let envelope = EncryptedEnvelope::from_json(&wire).unwrap();
	envelope.validate().unwrap();
	let received = manager().decrypt_document(&envelope, CODE).unwrap();

	assert_eq!(received, doc);
	let rendered = Formatter::new()
		.format(&received, &FormatOptions::default())
		.unwrap();
	assert!(rendered.contains("s************f"));
}

#[test]
fn test_wrong_code_and_corruption_are_distinguishable() {
	let envelope = manager().encrypt(b"PORT=1", CODE).unwrap();

	let wrong = manager().decrypt(&envelope, "happy-tiger-43").unwrap_err();
	assert!(matches!(wrong, CryptoError::Authentication));

	let truncated = EncryptedEnvelope {
		salt: "AAAA".to_string(),
		..envelope
	};
	let malformed = manager().decrypt(&truncated, CODE).unwrap_err();
	assert!(matches!(malformed, CryptoError::MalformedEnvelope(_)));
}

#[test]
fn test_non_document_plaintext_fails_document_decrypt() {
	let envelope = manager().encrypt(b"not json", CODE).unwrap();
	let err = manager().decrypt_document(&envelope, CODE).unwrap_err();
	assert!(matches!(err, CryptoError::Serialization(_)));
}
