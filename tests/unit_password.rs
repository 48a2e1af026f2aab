use colegio::colegio_core::{hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "secreto123";
    let hash = hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(verify_password(password, &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password("secreto123").unwrap();

    assert!(!verify_password("otraclave", &hash).unwrap());
    assert!(!verify_password("SECRETO123", &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    assert!(verify_password("secreto123", "no_es_un_hash_bcrypt").is_err());
}

#[test]
fn test_hash_generates_unique_hashes() {
    let password = "misma-clave";
    let hash1 = hash_password(password).unwrap();
    let hash2 = hash_password(password).unwrap();

    assert_ne!(hash1, hash2);
    assert!(verify_password(password, &hash1).unwrap());
    assert!(verify_password(password, &hash2).unwrap());
}

#[test]
fn test_hash_accented_characters() {
    let password = "contraseñaÁÉÍÓÚ";
    let hash = hash_password(password).unwrap();

    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("contrasenaAEIOU", &hash).unwrap());
}
